//! Backend wire types, failure taxonomy, and response classification.
//!
//! Every backend response is JSON shaped like
//! `{ "success": bool, "data": ..., "message": "..." }`. Classification looks
//! at the HTTP status first and the `success` flag second; the human-facing
//! message always comes from `message` when the backend sent one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::bookings::BookingRecord;

/// Shown when a booking's user reference carries no usable name.
pub const UNKNOWN_USER: &str = "Unknown user";

// =============================================================================
// ERROR
// =============================================================================

/// Why a backend call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 401: the bearer token is missing or stale.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 403: the token is valid but lacks the role or ownership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// HTTP 4xx, or a 2xx body with `success: false`.
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP 5xx (or any other unexpected status).
    #[error("server error: status {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx body that did not have the expected shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl GatewayError {
    /// Text suitable for an inline notice.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Error connecting to server. Please try again.",
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::Validation(message)
            | Self::Server { message, .. } => message,
            Self::Decode(_) => "Unexpected response from server.",
            Self::HttpClientBuild(_) => "Server is misconfigured.",
        }
    }

    /// Whether the session's token is no longer accepted. A 403 is not:
    /// the token is fine, the request is not allowed.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Map an HTTP outcome to the success payload or a typed failure.
///
/// `fallback` is used as the failure message when the body has no `message`.
pub(crate) fn classify_response(status: u16, body: &str, fallback: &str) -> Result<Value, GatewayError> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_owned();

    match status {
        200..=299 => {
            if value.get("success").and_then(Value::as_bool) == Some(false) {
                Err(GatewayError::Validation(message))
            } else {
                Ok(value)
            }
        }
        401 => Err(GatewayError::Unauthorized(message)),
        403 => Err(GatewayError::Forbidden(message)),
        400..=499 => Err(GatewayError::Validation(message)),
        _ => Err(GatewayError::Server { status, message }),
    }
}

/// Deserialize the envelope's `data` field.
pub(crate) fn decode_data<T: DeserializeOwned>(mut envelope: Value) -> Result<T, GatewayError> {
    let data = envelope
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| GatewayError::Decode("missing data field".to_owned()))?;
    serde_json::from_value(data).map_err(|e| GatewayError::Decode(e.to_string()))
}

// =============================================================================
// PROVIDERS
// =============================================================================

/// A bookable service provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "ProviderWire")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub address: String,
    pub tel: String,
}

/// Providers arrive with both `_id` and a virtual `id`; either may be absent.
#[derive(Deserialize)]
struct ProviderWire {
    #[serde(rename = "_id", default)]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    tel: String,
}

impl From<ProviderWire> for Provider {
    fn from(wire: ProviderWire) -> Self {
        Self {
            id: wire.id.or(wire.object_id).unwrap_or_default(),
            name: wire.name,
            address: wire.address,
            tel: wire.tel,
        }
    }
}

// =============================================================================
// BOOKINGS
// =============================================================================

/// A booking as the backend returns it. `provider` and `user` are either
/// populated objects or bare ids depending on the endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct BookingWire {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "rentalDate", default)]
    pub rental_date: String,
    #[serde(default)]
    pub provider: Value,
    #[serde(default)]
    pub user: Value,
}

impl BookingWire {
    pub fn into_record(self) -> BookingRecord {
        let field = |key: &str| {
            self.provider
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        let provider_id = match &self.provider {
            Value::String(id) => Some(id.clone()),
            Value::Object(map) => map
                .get("_id")
                .or_else(|| map.get("id"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        };

        BookingRecord {
            holder_name: field("name"),
            phone: field("tel"),
            venue_address: field("address"),
            scheduled_at: self.rental_date,
            booked_by: Some(booked_by(&self.user)),
            provider_id,
            id: self.id,
        }
    }
}

/// Resolve a booking's user reference to a display label: name, then email,
/// then the raw reference itself.
pub(crate) fn booked_by(user: &Value) -> String {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_owned)
    };
    match user {
        Value::Object(map) => non_empty(map.get("name"))
            .or_else(|| non_empty(map.get("email")))
            .unwrap_or_else(|| UNKNOWN_USER.to_owned()),
        Value::String(raw) if !raw.trim().is_empty() => raw.clone(),
        _ => UNKNOWN_USER.to_owned(),
    }
}

/// Fill provider display fields the backend left unpopulated.
pub fn fill_provider(record: &mut BookingRecord, provider: &Provider) {
    if record.holder_name.is_empty() {
        record.holder_name.clone_from(&provider.name);
    }
    if record.phone.is_empty() {
        record.phone.clone_from(&provider.tel);
    }
    if record.venue_address.is_empty() {
        record.venue_address.clone_from(&provider.address);
    }
    if record.provider_id.is_none() {
        record.provider_id = Some(provider.id.clone());
    }
}

/// Fields an edit may change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookingChange {
    #[serde(rename = "rentalDate")]
    pub rental_date: String,
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewBooking<'a> {
    #[serde(rename = "rentalDate")]
    pub rental_date: &'a str,
    pub user: &'a str,
}

// =============================================================================
// STATS
// =============================================================================

/// Aggregate booking count for one provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProviderStat {
    pub provider: String,
    #[serde(rename = "totalBookings")]
    pub total_bookings: u64,
}

// =============================================================================
// AUTH
// =============================================================================

/// Account creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordChange<'a> {
    #[serde(rename = "currentPassword")]
    pub current_password: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

/// Credential exchange result. The user id may arrive as `_id` or `id`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginWire {
    #[serde(rename = "_id", default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginWire {
    pub fn user_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.object_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Subset of `GET /auth/me` the session needs.
#[derive(Debug, Deserialize)]
pub(crate) struct MeWire {
    #[serde(default)]
    pub role: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
