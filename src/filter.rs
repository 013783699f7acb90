// Client-side hotel filtering for the listing page
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::hotel::Hotel;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid price range: {0}")]
    InvalidPriceRange(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}

// Inclusive price bounds; no upper bound means open-ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    // The options offered by the price dropdown
    pub const PRESETS: [PriceRange; 3] = [
        PriceRange {
            min: 0.0,
            max: Some(100.0),
        },
        PriceRange {
            min: 101.0,
            max: Some(200.0),
        },
        PriceRange {
            min: 201.0,
            max: None,
        },
    ];

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = FilterError;

    // Accepts "min-max" or "min+"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .ok_or_else(|| FilterError::InvalidPriceRange(s.to_string()))
        };

        if let Some(min) = s.strip_suffix('+') {
            return Ok(PriceRange {
                min: parse(min)?,
                max: None,
            });
        }

        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| FilterError::InvalidPriceRange(s.to_string()))?;
        let (min, max) = (parse(min)?, parse(max)?);
        if max < min {
            return Err(FilterError::InvalidPriceRange(s.to_string()));
        }

        Ok(PriceRange {
            min,
            max: Some(max),
        })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

// Parses rating options such as "4.5+" into the minimum rating
pub fn parse_min_rating(s: &str) -> Result<f64, FilterError> {
    let value = s.trim();
    value
        .strip_suffix('+')
        .unwrap_or(value)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| (0.0..=5.0).contains(r))
        .ok_or_else(|| FilterError::InvalidRating(s.to_string()))
}

// A single change reported by the filter widgets
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Search(String),
    PriceRange(Option<PriceRange>),
    MinRating(Option<f64>),
}

impl FilterChange {
    // Builds a change from a widget name and its raw value; empty values clear the criterion
    pub fn parse(filter_type: &str, value: &str) -> Result<Self, FilterError> {
        match filter_type {
            "search" => Ok(FilterChange::Search(value.to_string())),
            "priceRange" if value.trim().is_empty() => Ok(FilterChange::PriceRange(None)),
            "priceRange" => Ok(FilterChange::PriceRange(Some(value.parse()?))),
            "rating" if value.trim().is_empty() => Ok(FilterChange::MinRating(None)),
            "rating" => Ok(FilterChange::MinRating(Some(parse_min_rating(value)?))),
            other => Err(FilterError::UnknownFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search: String,
    pub price_range: Option<PriceRange>,
    pub min_rating: Option<f64>,
}

impl FilterCriteria {
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Search(search) => self.search = search,
            FilterChange::PriceRange(range) => self.price_range = range,
            FilterChange::MinRating(rating) => self.min_rating = rating,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.price_range.is_none() && self.min_rating.is_none()
    }

    pub fn matches(&self, hotel: &Hotel) -> bool {
        self.matches_search(hotel)
            && self
                .price_range
                .map_or(true, |range| range.contains(hotel.price_per_night))
            && self.min_rating.map_or(true, |min| hotel.rating >= min)
    }

    fn matches_search(&self, hotel: &Hotel) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        hotel.name.to_lowercase().contains(&needle)
            || hotel.location.to_lowercase().contains(&needle)
    }
}

// Order-preserving subset of hotels matching every active criterion
pub fn filter_hotels<'a>(hotels: &'a [Hotel], criteria: &FilterCriteria) -> Vec<&'a Hotel> {
    hotels.iter().filter(|hotel| criteria.matches(hotel)).collect()
}
