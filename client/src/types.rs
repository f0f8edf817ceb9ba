use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `check-availability` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub duration: i32,
}

impl AvailabilityQuery {
    pub fn new(booking_date: NaiveDate, time_slot: impl Into<String>, duration: i32) -> Self {
        Self {
            booking_date,
            time_slot: time_slot.into(),
            duration,
        }
    }
}

/// Body of a `create-booking` call.
///
/// `time_slot` and `duration` are not validated here, so malformed values
/// such as `"99:99"` or a negative duration can be sent on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub duration: i32,
}

impl BookingRequest {
    pub fn new(
        customer_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        booking_date: NaiveDate,
        time_slot: impl Into<String>,
        duration: i32,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            email: email.into(),
            phone: phone.into(),
            booking_date,
            time_slot: time_slot.into(),
            duration,
        }
    }

    pub fn with_customer_name(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = customer_name.into();
        self
    }

    pub fn with_booking_date(mut self, booking_date: NaiveDate) -> Self {
        self.booking_date = booking_date;
        self
    }

    pub fn with_time_slot(mut self, time_slot: impl Into<String>) -> Self {
        self.time_slot = time_slot.into();
        self
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }
}

/// Body of an `update-booking-status` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusUpdate {
    pub booking_id: String,
    pub status: String,
}

/// Formats an hour as an `HH:00` slot.
pub fn hour_slot(hour: u32) -> String {
    format!("{:02}:00", hour)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Which auth headers accompany a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// `apikey` plus `Authorization: Bearer <key>`.
    Full,
    /// `apikey` only.
    ApiKeyOnly,
}

/// A call to a function endpoint.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub credentials: Credentials,
}

impl FunctionCall {
    pub fn post(name: impl Into<String>, body: Value) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Post,
            body: Some(body),
            credentials: Credentials::Full,
        }
    }

    pub fn get(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Get,
            body: None,
            credentials: Credentials::Full,
        }
    }

    pub fn patch(name: impl Into<String>, body: Value) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Patch,
            body: Some(body),
            credentials: Credentials::Full,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// A response from the site origin.
#[derive(Debug, Clone)]
pub struct SiteResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl SiteResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn size_kb(&self) -> f64 {
        self.body.len() as f64 / 1024.0
    }
}

/// Status and JSON body of a REST or function response.
///
/// Non-JSON bodies are kept in `raw` and `body` is `Value::Null`.
#[derive(Debug, Clone)]
pub struct FunctionReply {
    pub status: u16,
    pub body: Value,
    pub raw: String,
}

impl FunctionReply {
    pub fn new(status: u16, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let body = serde_json::from_str(&raw).unwrap_or(Value::Null);
        Self { status, body, raw }
    }

    pub fn from_json(status: u16, body: Value) -> Self {
        Self {
            status,
            raw: body.to_string(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    /// `error.message` of a failed call.
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
    }

    /// `data.booking.id` of a successful `create-booking` call.
    pub fn booking_id(&self) -> Option<&str> {
        self.body
            .get("data")
            .and_then(|d| d.get("booking"))
            .and_then(|b| b.get("id"))
            .and_then(Value::as_str)
    }

    /// `available`, at the top level or nested under `data`.
    pub fn available(&self) -> Option<bool> {
        self.body
            .get("available")
            .and_then(Value::as_bool)
            .or_else(|| {
                self.body
                    .get("data")
                    .and_then(|d| d.get("available"))
                    .and_then(Value::as_bool)
            })
    }

    pub fn has_data(&self) -> bool {
        self.body.get("data").is_some_and(|d| !d.is_null())
    }

    pub fn pretty_body(&self) -> String {
        if self.body.is_null() {
            self.raw.clone()
        } else {
            serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.raw.clone())
        }
    }
}
