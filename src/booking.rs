// Booking draft, validation, pricing and the submitted booking record
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hotel::{Hotel, HotelId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Standard,
    Deluxe,
    Suite,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Deluxe, RoomType::Suite];

    pub fn multiplier(&self) -> f64 {
        match self {
            RoomType::Standard => 1.0,
            RoomType::Deluxe => 1.5,
            RoomType::Suite => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "standard",
            RoomType::Deluxe => "deluxe",
            RoomType::Suite => "suite",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoomTypeError {
    #[error("Unknown room type: {0}")]
    Unknown(String),
}

impl FromStr for RoomType {
    type Err = RoomTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|room| room.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RoomTypeError::Unknown(s.to_string()))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuestCountError {
    #[error("Guest count must be between {min} and {max}, got {0}", min = GuestCount::MIN, max = GuestCount::MAX)]
    OutOfRange(u8),
}

// Number of guests, always within 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GuestCount(u8);

impl GuestCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(count: u8) -> Result<Self, GuestCountError> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(GuestCountError::OutOfRange(count))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for GuestCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for GuestCount {
    type Error = GuestCountError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GuestCount> for u8 {
    fn from(count: GuestCount) -> Self {
        count.0
    }
}

// Fields of the booking form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    CheckInDate,
    CheckOutDate,
    Guests,
    RoomType,
}

impl Field {
    pub const GUEST_FIELDS: [Field; 4] = [Field::FirstName, Field::LastName, Field::Email, Field::Phone];
    pub const STAY_FIELDS: [Field; 4] = [
        Field::CheckInDate,
        Field::CheckOutDate,
        Field::Guests,
        Field::RoomType,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const CHECK_IN_REQUIRED: &str = "Check-in date is required";
pub const CHECK_OUT_REQUIRED: &str = "Check-out date is required";
pub const CHECK_OUT_BEFORE_CHECK_IN: &str = "Must be after check-in date";

// Per-field validation messages; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    // Errors restricted to the given fields
    pub fn only(&self, fields: &[Field]) -> ValidationErrors {
        ValidationErrors {
            errors: self
                .errors
                .iter()
                .filter(|e| fields.contains(&e.field))
                .cloned()
                .collect(),
        }
    }

    fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok())
        .as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().map_or(false, |pattern| pattern.is_match(email))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl GuestDetails {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.first_name.trim().is_empty() {
            errors.push(Field::FirstName, FIRST_NAME_REQUIRED);
        }
        if self.last_name.trim().is_empty() {
            errors.push(Field::LastName, LAST_NAME_REQUIRED);
        }
        if self.email.trim().is_empty() {
            errors.push(Field::Email, EMAIL_REQUIRED);
        } else if !is_valid_email(self.email.trim()) {
            errors.push(Field::Email, EMAIL_INVALID);
        }
        if self.phone.trim().is_empty() {
            errors.push(Field::Phone, PHONE_REQUIRED);
        }
        errors
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StayDetails {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: GuestCount,
    pub room_type: RoomType,
}

impl StayDetails {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.check_in.is_none() {
            errors.push(Field::CheckInDate, CHECK_IN_REQUIRED);
        }
        match (self.check_in, self.check_out) {
            (_, None) => errors.push(Field::CheckOutDate, CHECK_OUT_REQUIRED),
            (Some(check_in), Some(check_out)) if check_out <= check_in => {
                errors.push(Field::CheckOutDate, CHECK_OUT_BEFORE_CHECK_IN)
            }
            _ => {}
        }
        errors
    }

    // Whole nights between the dates; None until both are chosen
    pub fn nights(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some((check_out - check_in).num_days().max(0)),
            _ => None,
        }
    }

    // Defaults to one night at the base price until both dates are set
    pub fn total_price(&self, price_per_night: f64) -> f64 {
        match self.nights() {
            Some(nights) => nights as f64 * price_per_night * self.room_type.multiplier(),
            None => price_per_night,
        }
    }
}

// In-progress form input for one reservation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub guest: GuestDetails,
    pub stay: StayDetails,
}

impl BookingDraft {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = self.guest.validate();
        errors.extend(self.stay.validate());
        errors
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
}

// Finalized reservation as posted to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    pub hotel_id: HotelId,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: GuestCount,
    pub room_type: RoomType,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub hotel_name: String,
}

impl BookingRecord {
    // Builds the record for a valid draft; the id is the client clock in epoch milliseconds
    pub fn from_draft(
        hotel: &Hotel,
        draft: &BookingDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let errors = draft.validate();
        let (Some(check_in), Some(check_out)) = (draft.stay.check_in, draft.stay.check_out) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BookingRecord {
            id: now.timestamp_millis(),
            hotel_id: hotel.id,
            guest_name: draft.guest.full_name(),
            email: draft.guest.email.trim().to_string(),
            phone: draft.guest.phone.trim().to_string(),
            check_in_date: check_in,
            check_out_date: check_out,
            number_of_guests: draft.stay.guests,
            room_type: draft.stay.room_type,
            total_amount: draft.stay.total_price(hotel.price_per_night),
            status: BookingStatus::Confirmed,
            hotel_name: hotel.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stay(check_in: &str, check_out: &str, room_type: RoomType) -> StayDetails {
        StayDetails {
            check_in: Some(date(check_in)),
            check_out: Some(date(check_out)),
            guests: GuestCount::default(),
            room_type,
        }
    }

    fn valid_draft() -> BookingDraft {
        BookingDraft {
            guest: GuestDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 20 7946 0000".to_string(),
            },
            stay: StayDetails {
                guests: GuestCount::new(2).unwrap(),
                ..stay("2024-01-01", "2024-01-03", RoomType::Deluxe)
            },
        }
    }

    fn hotel() -> Hotel {
        Hotel {
            id: 42,
            name: "Harbour View".to_string(),
            location: "Sydney, Australia".to_string(),
            price_per_night: 100.0,
            rating: 4.4,
            available_rooms: 3,
            image_url: String::new(),
        }
    }

    #[test_case("2024-01-01", "2024-01-03", 100.0, RoomType::Standard, 200.0; "#1 two nights standard")]
    #[test_case("2024-01-01", "2024-01-03", 100.0, RoomType::Deluxe, 300.0; "#2 two nights deluxe")]
    #[test_case("2024-01-01", "2024-01-03", 100.0, RoomType::Suite, 400.0; "#3 two nights suite")]
    #[test_case("2024-01-01", "2024-01-02", 150.0, RoomType::Standard, 150.0; "#4 one night")]
    #[test_case("2024-02-27", "2024-03-02", 80.0, RoomType::Suite, 640.0; "#5 across leap day")]
    fn test_total_price(check_in: &str, check_out: &str, price: f64, room: RoomType, expected: f64) {
        assert_eq!(stay(check_in, check_out, room).total_price(price), expected);
    }

    #[test]
    fn test_total_price_defaults_to_one_night_without_dates() {
        let mut details = StayDetails {
            room_type: RoomType::Suite,
            ..Default::default()
        };
        assert_eq!(details.total_price(120.0), 120.0);

        details.check_in = Some(date("2024-05-01"));
        assert_eq!(details.total_price(120.0), 120.0);
    }

    #[test]
    fn test_total_price_never_negative_for_inverted_dates() {
        assert_eq!(
            stay("2024-01-05", "2024-01-03", RoomType::Standard).total_price(100.0),
            0.0
        );
    }

    #[test]
    fn test_guest_count_bounds() {
        assert!(GuestCount::new(0).is_err());
        assert_eq!(GuestCount::new(4).unwrap().get(), 4);
        assert_eq!(GuestCount::new(5), Err(GuestCountError::OutOfRange(5)));
        assert_eq!(GuestCount::default().get(), 1);
    }

    #[test]
    fn test_guest_count_rejected_when_deserializing() {
        assert!(serde_json::from_str::<GuestCount>("9").is_err());
        assert_eq!(serde_json::from_str::<GuestCount>("3").unwrap().get(), 3);
    }

    #[test_case("standard", RoomType::Standard; "#1 standard")]
    #[test_case("Deluxe", RoomType::Deluxe; "#2 case insensitive")]
    #[test_case(" suite ", RoomType::Suite; "#3 trimmed")]
    fn test_parse_room_type(input: &str, expected: RoomType) {
        assert_eq!(input.parse::<RoomType>().unwrap(), expected);
    }

    #[test]
    fn test_parse_room_type_unknown() {
        assert!("penthouse".parse::<RoomType>().is_err());
    }

    #[test_case("ada@example.com", true; "#1 plain")]
    #[test_case("ADA.L+tag@mail.example.co.uk", true; "#2 uppercase plus subdomain")]
    #[test_case("ada@example", false; "#3 missing tld")]
    #[test_case("ada.example.com", false; "#4 missing at")]
    #[test_case("ada@example.c", false; "#5 short tld")]
    #[test_case("ada smith@example.com", false; "#6 space")]
    fn test_email_pattern(email: &str, expected: bool) {
        assert_eq!(is_valid_email(email), expected);
    }

    #[test]
    fn test_guest_validation_messages() {
        let errors = GuestDetails::default().validate();
        assert_eq!(errors.get(Field::FirstName), Some(FIRST_NAME_REQUIRED));
        assert_eq!(errors.get(Field::LastName), Some(LAST_NAME_REQUIRED));
        assert_eq!(errors.get(Field::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(Field::Phone), Some(PHONE_REQUIRED));

        let guest = GuestDetails {
            email: "not-an-email".to_string(),
            ..valid_draft().guest
        };
        let errors = guest.validate();
        assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test_case("2024-01-03", "2024-01-03"; "#1 same day")]
    #[test_case("2024-01-03", "2024-01-01"; "#2 earlier")]
    fn test_check_out_must_follow_check_in(check_in: &str, check_out: &str) {
        let errors = stay(check_in, check_out, RoomType::Standard).validate();
        assert_eq!(errors.get(Field::CheckOutDate), Some(CHECK_OUT_BEFORE_CHECK_IN));
    }

    #[test]
    fn test_missing_dates_required() {
        let errors = StayDetails::default().validate();
        assert_eq!(errors.get(Field::CheckInDate), Some(CHECK_IN_REQUIRED));
        assert_eq!(errors.get(Field::CheckOutDate), Some(CHECK_OUT_REQUIRED));
    }

    #[test]
    fn test_record_from_valid_draft() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = BookingRecord::from_draft(&hotel(), &valid_draft(), now).unwrap();

        assert_eq!(record.id, now.timestamp_millis());
        assert_eq!(record.hotel_id, 42);
        assert_eq!(record.guest_name, "Ada Lovelace");
        assert_eq!(record.number_of_guests.get(), 2);
        assert_eq!(record.total_amount, 300.0);
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert_eq!(record.hotel_name, "Harbour View");
    }

    #[test]
    fn test_record_refused_for_invalid_draft() {
        let mut draft = valid_draft();
        draft.stay.check_out = draft.stay.check_in;

        let errors = BookingRecord::from_draft(&hotel(), &draft, Utc::now()).unwrap_err();
        assert_eq!(errors.get(Field::CheckOutDate), Some(CHECK_OUT_BEFORE_CHECK_IN));
    }

    #[test]
    fn test_record_wire_format() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = BookingRecord::from_draft(&hotel(), &valid_draft(), now).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["hotelId"], 42);
        assert_eq!(json["guestName"], "Ada Lovelace");
        assert_eq!(json["checkInDate"], "2024-01-01");
        assert_eq!(json["checkOutDate"], "2024-01-03");
        assert_eq!(json["numberOfGuests"], 2);
        assert_eq!(json["roomType"], "deluxe");
        assert_eq!(json["totalAmount"], 300.0);
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["hotelName"], "Harbour View");
    }
}
