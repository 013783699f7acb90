// Hotel booking client: listing filters, booking wizard and backend access

pub mod api;
pub mod booking;
pub mod cache;
pub mod filter;
pub mod hotel;
pub mod pages;
pub mod store;
pub mod wizard;

// Re-export key types for convenience
pub use api::{ApiError, ClientConfig, ClientError, HotelApi, HttpHotelApi};
pub use booking::{
    BookingDraft, BookingRecord, BookingStatus, GuestCount, GuestDetails, RoomType, StayDetails,
    ValidationErrors,
};
pub use cache::{CacheConfig, CachedHotelApi, QueryCache, QueryKey};
pub use filter::{filter_hotels, FilterChange, FilterCriteria, PriceRange};
pub use hotel::{Hotel, HotelId};
pub use pages::{DetailPage, DetailView, FetchState, ListingPage, ListingView, Route};
pub use store::HotelStore;
pub use wizard::{BookingWizard, SubmissionState, WizardStep};
