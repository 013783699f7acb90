// Two-step booking wizard: guest details, then stay details and submission

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::api::HotelApi;
use crate::booking::{BookingDraft, BookingRecord, Field, ValidationErrors};
use crate::hotel::Hotel;
use crate::store::HotelStore;

// Delay between a confirmed booking and the completion callback
pub const COMPLETION_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    GuestInfo,
    StayDetails,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::GuestInfo => 1,
            WizardStep::StayDetails => 2,
        }
    }
}

// Outcome of the latest submission attempt
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Success(BookingRecord),
    Error(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }
}

type Callback = Box<dyn FnOnce() + Send + 'static>;

// One-shot completion callback shared between the timer and an explicit return
#[derive(Clone)]
struct Completion {
    callback: Arc<Mutex<Option<Callback>>>,
}

impl Completion {
    fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    fn fire(&self) -> bool {
        let callback = self.callback.lock().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

pub struct BookingWizard {
    hotel: Hotel,
    step: WizardStep,
    draft: BookingDraft,
    errors: ValidationErrors,
    state: watch::Sender<SubmissionState>,
    completion: Option<(Completion, JoinHandle<()>)>,
    store: Option<&'static HotelStore>,
}

impl BookingWizard {
    pub fn new(hotel: Hotel) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            hotel,
            step: WizardStep::GuestInfo,
            draft: BookingDraft::default(),
            errors: ValidationErrors::default(),
            state,
            completion: None,
            store: None,
        }
    }

    // Confirmed bookings are also recorded in the given store
    pub fn with_store(mut self, store: &'static HotelStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn hotel(&self) -> &Hotel {
        &self.hotel
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(field)
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    // Submit is disabled while a submission is in flight
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::StayDetails && !self.state.borrow().is_pending()
    }

    pub fn total_price(&self) -> f64 {
        self.draft.stay.total_price(self.hotel.price_per_night)
    }

    // Advances to stay details when the guest fields are valid
    pub fn next_step(&mut self) -> bool {
        if self.step != WizardStep::GuestInfo {
            return false;
        }

        self.errors = self.draft.guest.validate();
        if !self.errors.is_empty() {
            debug!(errors = self.errors.iter().count(), "guest details invalid");
            return false;
        }

        self.step = WizardStep::StayDetails;
        true
    }

    pub fn previous_step(&mut self) -> bool {
        if self.step != WizardStep::StayDetails {
            return false;
        }
        self.step = WizardStep::GuestInfo;
        self.errors = ValidationErrors::default();
        true
    }

    pub async fn submit<A, F>(&mut self, api: &A, on_complete: F) -> SubmissionState
    where
        A: HotelApi + ?Sized,
        F: FnOnce() + Send + 'static,
    {
        if matches!(*self.state.borrow(), SubmissionState::Error(_)) {
            self.state.send_replace(SubmissionState::Idle);
        }

        let record = match BookingRecord::from_draft(&self.hotel, &self.draft, Utc::now()) {
            Ok(record) => record,
            Err(errors) => {
                if !errors.only(&Field::GUEST_FIELDS).is_empty() {
                    self.step = WizardStep::GuestInfo;
                }
                self.errors = errors;
                return self.state();
            }
        };

        self.errors = ValidationErrors::default();
        self.state.send_replace(SubmissionState::Pending);
        debug!(booking_id = record.id, hotel_id = record.hotel_id, "submitting booking");

        let next = match api.create_booking(&record).await {
            Ok(created) => {
                info!(
                    booking_id = created.id,
                    hotel = %created.hotel_name,
                    total = created.total_amount,
                    "booking confirmed"
                );
                if let Some(store) = self.store {
                    store.set_booking_details(created.clone());
                }
                self.draft = BookingDraft::default();
                self.schedule_completion(on_complete);
                SubmissionState::Success(created)
            }
            Err(e) => {
                error!(error = %e, hotel_id = record.hotel_id, "booking failed");
                SubmissionState::Error(e.user_message())
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    // Fires the completion callback now instead of waiting for the timer
    pub fn return_to_listing(&mut self) -> bool {
        match self.completion.take() {
            Some((completion, timer)) => {
                timer.abort();
                completion.fire()
            }
            None => false,
        }
    }

    fn schedule_completion<F>(&mut self, on_complete: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let completion = Completion::new(on_complete);
        let delayed = completion.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(COMPLETION_DELAY).await;
            delayed.fire();
        });

        // An earlier booking's pending completion fires now
        if let Some((previous, previous_timer)) = self.completion.replace((completion, timer)) {
            previous_timer.abort();
            previous.fire();
        }
    }
}
