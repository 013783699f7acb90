// Query cache for backend reads, keyed by the request it answers

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::api::{ApiError, HotelApi};
use crate::booking::BookingRecord;
use crate::hotel::{Hotel, HotelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Hotels,
    Hotel(HotelId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Hotels => write!(f, "hotels"),
            QueryKey::Hotel(id) => write!(f, "hotel:{}", id),
        }
    }
}

#[derive(Debug, Default)]
pub struct CacheStats {
    pub items_count: AtomicUsize,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub eviction_count: AtomicUsize,
    pub expired_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub eviction_count: usize,
    pub expired_count: usize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub default_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            default_ttl_seconds: 300,
        }
    }
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
    last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

pub struct QueryCache<V> {
    entries: DashMap<QueryKey, CacheEntry<V>>,
    config: CacheConfig,
    stats: CacheStats,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn store(&self, key: QueryKey, value: V) {
        let ttl = Duration::from_secs(self.config.default_ttl_seconds);
        self.store_with_ttl(key, value, ttl);
    }

    pub fn store_with_ttl(&self, key: QueryKey, value: V, ttl: Duration) {
        if self.config.max_entries == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_entries {
            self.evict_least_recently_used();
        }

        let now = Instant::now();
        let entry = CacheEntry {
            value,
            created_at: now,
            ttl,
            last_accessed: now,
        };
        if self.entries.insert(key, entry).is_none() {
            self.stats.items_count.fetch_add(1, Ordering::SeqCst);
        }
        debug!(%key, "cached query");
    }

    // Fresh value for the key; expired entries are dropped and count as misses
    pub fn get(&self, key: &QueryKey) -> Option<V> {
        let expired = match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired() => {
                entry.last_accessed = Instant::now();
                self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired && self.entries.remove(key).is_some() {
            self.stats.items_count.fetch_sub(1, Ordering::SeqCst);
            self.stats.expired_count.fetch_add(1, Ordering::SeqCst);
        }
        self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
        None
    }

    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.items_count.fetch_sub(1, Ordering::SeqCst);
            debug!(%key, "invalidated query");
        }
        removed
    }

    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.items_count.store(0, Ordering::SeqCst);
        count
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.stats.items_count.load(Ordering::SeqCst),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            eviction_count: self.stats.eviction_count.load(Ordering::SeqCst),
            expired_count: self.stats.expired_count.load(Ordering::SeqCst),
        }
    }

    fn evict_least_recently_used(&self) {
        let oldest_key = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_accessed)
            .map(|entry| *entry.key());

        if let Some(key) = oldest_key {
            if self.entries.remove(&key).is_some() {
                self.stats.items_count.fetch_sub(1, Ordering::SeqCst);
                self.stats.eviction_count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

// HotelApi that answers reads from the cache and refreshes the listing after bookings
pub struct CachedHotelApi<A> {
    inner: A,
    hotels: QueryCache<Vec<Hotel>>,
    details: QueryCache<Hotel>,
}

impl<A: HotelApi> CachedHotelApi<A> {
    pub fn new(inner: A, config: CacheConfig) -> Self {
        Self {
            inner,
            hotels: QueryCache::new(config.clone()),
            details: QueryCache::new(config),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn listing_stats(&self) -> CacheStatsReport {
        self.hotels.stats()
    }

    pub fn detail_stats(&self) -> CacheStatsReport {
        self.details.stats()
    }
}

#[async_trait]
impl<A: HotelApi> HotelApi for CachedHotelApi<A> {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError> {
        if let Some(hotels) = self.hotels.get(&QueryKey::Hotels) {
            return Ok(hotels);
        }
        let hotels = self.inner.list_hotels().await?;
        self.hotels.store(QueryKey::Hotels, hotels.clone());
        Ok(hotels)
    }

    async fn get_hotel(&self, id: HotelId) -> Result<Hotel, ApiError> {
        let key = QueryKey::Hotel(id);
        if let Some(hotel) = self.details.get(&key) {
            return Ok(hotel);
        }
        let hotel = self.inner.get_hotel(id).await?;
        self.details.store(key, hotel.clone());
        Ok(hotel)
    }

    async fn create_booking(&self, booking: &BookingRecord) -> Result<BookingRecord, ApiError> {
        let created = self.inner.create_booking(booking).await?;
        // Room availability changed on the backend
        self.hotels.invalidate(&QueryKey::Hotels);
        self.details.invalidate(&QueryKey::Hotel(booking.hotel_id));
        Ok(created)
    }
}
