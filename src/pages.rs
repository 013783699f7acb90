// Page-level state for the listing and hotel detail routes

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::HotelApi;
use crate::filter::{filter_hotels, FilterChange, FilterCriteria};
use crate::hotel::{Hotel, HotelId};
use crate::store::HotelStore;
use crate::wizard::BookingWizard;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("No route for path: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing,
    HotelDetail(HotelId),
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Listing);
        }

        trimmed
            .strip_prefix("/hotel/")
            .and_then(|id| id.parse().ok())
            .map(Route::HotelDetail)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Listing => write!(f, "/"),
            Route::HotelDetail(id) => write!(f, "/hotel/{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    // The fetch failed; nothing is rendered below the filters
    Unavailable,
    Empty,
    Hotels(Vec<&'a Hotel>),
}

#[derive(Debug, Default)]
pub struct ListingPage {
    hotels: FetchState<Vec<Hotel>>,
    criteria: FilterCriteria,
}

impl ListingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A: HotelApi + ?Sized>(&mut self, api: &A) {
        self.hotels = FetchState::Loading;
        self.hotels = match api.list_hotels().await {
            Ok(hotels) => {
                info!(count = hotels.len(), "hotels loaded");
                FetchState::Ready(hotels)
            }
            Err(e) => {
                warn!(error = %e, "failed to load hotels");
                FetchState::Failed(e.to_string())
            }
        };
    }

    pub fn hotels(&self) -> &FetchState<Vec<Hotel>> {
        &self.hotels
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn on_filter_change(&mut self, change: FilterChange) {
        self.criteria.apply(change);
    }

    pub fn view(&self) -> ListingView<'_> {
        match &self.hotels {
            FetchState::Loading => ListingView::Loading,
            FetchState::Failed(_) => ListingView::Unavailable,
            FetchState::Ready(hotels) => {
                let visible = filter_hotels(hotels, &self.criteria);
                if visible.is_empty() {
                    ListingView::Empty
                } else {
                    ListingView::Hotels(visible)
                }
            }
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    Ready(&'a Hotel),
}

pub struct DetailPage {
    hotel_id: HotelId,
    hotel: FetchState<Hotel>,
    wizard: Option<BookingWizard>,
    store: &'static HotelStore,
}

impl DetailPage {
    pub fn new(hotel_id: HotelId) -> Self {
        Self::with_store(hotel_id, HotelStore::global())
    }

    pub fn with_store(hotel_id: HotelId, store: &'static HotelStore) -> Self {
        Self {
            hotel_id,
            hotel: FetchState::Loading,
            wizard: None,
            store,
        }
    }

    pub fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }

    pub async fn load<A: HotelApi + ?Sized>(&mut self, api: &A) {
        self.hotel = FetchState::Loading;
        self.wizard = None;

        match api.get_hotel(self.hotel_id).await {
            Ok(hotel) => {
                info!(hotel_id = hotel.id, name = %hotel.name, "hotel loaded");
                self.store.set_selected_hotel(hotel.clone());
                self.wizard = Some(BookingWizard::new(hotel.clone()).with_store(self.store));
                self.hotel = FetchState::Ready(hotel);
            }
            Err(e) => {
                warn!(hotel_id = self.hotel_id, error = %e, "failed to load hotel");
                self.hotel = FetchState::Failed(e.to_string());
            }
        }
    }

    pub fn hotel(&self) -> &FetchState<Hotel> {
        &self.hotel
    }

    // A failed fetch keeps showing the loading indicator
    pub fn view(&self) -> DetailView<'_> {
        match &self.hotel {
            FetchState::Ready(hotel) => DetailView::Ready(hotel),
            _ => DetailView::Loading,
        }
    }

    pub fn wizard(&self) -> Option<&BookingWizard> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut BookingWizard> {
        self.wizard.as_mut()
    }
}
