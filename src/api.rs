// REST client for the hotel backend: hotel listing, hotel detail and booking creation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::booking::BookingRecord;
use crate::hotel::{Hotel, HotelId};

pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later or contact support.";
pub const BOOKING_FAILED_MESSAGE: &str = "Failed to make booking";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const BASE_URL_ENV: &str = "HOTEL_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "HOTEL_API_TIMEOUT_MS";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl ApiError {
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::ApiResponseError { status_code: 500..=599, .. })
    }

    // Human-readable text for the booking error banner
    pub fn user_message(&self) -> String {
        match self {
            e if e.is_server_error() => SERVER_ERROR_MESSAGE.to_string(),
            ApiError::ApiResponseError { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            ApiError::ApiResponseError { .. } => BOOKING_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Builds the config from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            config.timeout_ms = timeout.trim().parse().map_err(|_| {
                ClientError::ConfigError(format!("{} must be milliseconds, got {:?}", TIMEOUT_ENV, timeout))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base url must be http(s), got {:?}",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError("timeout must be positive".to_string()));
        }
        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Backend operations used by the pages and the booking wizard
#[async_trait]
pub trait HotelApi: Send + Sync {
    // GET /hotels
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError>;

    // GET /hotels/{id}
    async fn get_hotel(&self, id: HotelId) -> Result<Hotel, ApiError>;

    // POST /bookings
    async fn create_booking(&self, booking: &BookingRecord) -> Result<BookingRecord, ApiError>;
}

// Error payload returned by the backend on failed requests
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// Maps a non-success response to an ApiError carrying the backend's message, if it sent one
pub fn error_from_response(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed.message.or(parsed.error).unwrap_or_default();

    ApiError::ApiResponseError {
        status_code: status,
        message,
    }
}

#[derive(Debug)]
pub struct HttpHotelApi {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpHotelApi {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = error_from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), %error, "backend request failed");
        Err(error)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        self.check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))
    }
}

#[async_trait]
impl HotelApi for HttpHotelApi {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError> {
        let url = self.config.endpoint("hotels");
        debug!(%url, "fetching hotels");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.decode(response).await
    }

    async fn get_hotel(&self, id: HotelId) -> Result<Hotel, ApiError> {
        let url = self.config.endpoint(&format!("hotels/{}", id));
        debug!(%url, "fetching hotel");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::ApiResponseError {
                status_code: 404,
                message: format!("Hotel {} not found", id),
            });
        }
        self.decode(response).await
    }

    async fn create_booking(&self, booking: &BookingRecord) -> Result<BookingRecord, ApiError> {
        let url = self.config.endpoint("bookings");
        debug!(%url, booking_id = booking.id, hotel_id = booking.hotel_id, "posting booking");

        let response = self
            .client
            .post(&url)
            .json(booking)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;

        // Any 2xx means the booking exists; the echo is only trusted when it parses
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<BookingRecord>(&body) {
            Ok(confirmed) => Ok(confirmed),
            Err(e) => {
                debug!(booking_id = booking.id, error = %e, "booking echo not usable, keeping sent record");
                Ok(booking.clone())
            }
        }
    }
}
