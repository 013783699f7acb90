// Process-wide store for cross-page selections. Form drafts never live here.
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::booking::BookingRecord;
use crate::hotel::Hotel;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub selected_hotel: Option<Hotel>,
    pub booking_details: Option<BookingRecord>,
}

#[derive(Debug, Default)]
pub struct HotelStore {
    state: RwLock<StoreSnapshot>,
}

impl HotelStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Shared instance for the whole process
    pub fn global() -> &'static HotelStore {
        static STORE: OnceLock<HotelStore> = OnceLock::new();
        STORE.get_or_init(HotelStore::new)
    }

    pub fn set_selected_hotel(&self, hotel: Hotel) {
        self.state.write().selected_hotel = Some(hotel);
    }

    pub fn selected_hotel(&self) -> Option<Hotel> {
        self.state.read().selected_hotel.clone()
    }

    pub fn set_booking_details(&self, booking: BookingRecord) {
        self.state.write().booking_details = Some(booking);
    }

    pub fn booking_details(&self) -> Option<BookingRecord> {
        self.state.read().booking_details.clone()
    }

    pub fn clear_booking(&self) {
        let mut state = self.state.write();
        state.selected_hotel = None;
        state.booking_details = None;
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().clone()
    }
}
