use crate::types::{
    AvailabilityQuery, BookingRequest, Credentials, FunctionCall, FunctionReply, SiteResponse,
    StatusUpdate,
};
use async_trait::async_trait;
use thiserror::Error;

pub const CHECK_AVAILABILITY: &str = "check-availability";
pub const CREATE_BOOKING: &str = "create-booking";
pub const GET_BOOKINGS: &str = "get-bookings";
pub const UPDATE_BOOKING_STATUS: &str = "update-booking-status";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("Cannot connect to {url}")]
    Unreachable { url: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The site origin plus the hosted backend it talks to.
///
/// Non-2xx statuses are not errors at this layer; callers inspect the
/// returned status. Errors are reserved for transport failures.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// GET a path on the site origin.
    async fn fetch_site(&self, path: &str) -> ClientResult<SiteResponse>;

    /// GET rows from a REST table with a raw query string such as
    /// `select=id&limit=1`.
    async fn query_table(&self, table: &str, query: &str) -> ClientResult<FunctionReply>;

    async fn call_function(&self, call: FunctionCall) -> ClientResult<FunctionReply>;

    fn backend_name(&self) -> &'static str;

    async fn check_availability(&self, query: &AvailabilityQuery) -> ClientResult<FunctionReply> {
        let body = serde_json::to_value(query)?;
        self.call_function(FunctionCall::post(CHECK_AVAILABILITY, body))
            .await
    }

    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<FunctionReply> {
        let body = serde_json::to_value(request)?;
        self.call_function(FunctionCall::post(CREATE_BOOKING, body))
            .await
    }

    /// Admin listing, sent with the `apikey` header only.
    async fn list_bookings_anonymously(&self) -> ClientResult<FunctionReply> {
        self.call_function(FunctionCall::get(GET_BOOKINGS).with_credentials(Credentials::ApiKeyOnly))
            .await
    }

    async fn update_booking_status(&self, update: &StatusUpdate) -> ClientResult<FunctionReply> {
        let body = serde_json::to_value(update)?;
        self.call_function(FunctionCall::patch(UPDATE_BOOKING_STATUS, body))
            .await
    }
}
