//! `reqwest` implementation of [`BackendApi`].

use std::time::Duration;

use serde_json::Value;

use super::BackendApi;
use super::types::{
    BookingChange, BookingWire, Credentials, GatewayError, LoginWire, MeWire, NewBooking, PasswordChange, Provider,
    ProviderStat, Registration, classify_response, decode_data,
};
use crate::config::BackendTimeouts;
use crate::state::bookings::BookingRecord;
use crate::state::session::{Role, SessionIdentity, Viewer};

/// JSON-over-HTTP client for the booking backend.
pub struct RestGateway {
    http: reqwest::Client,
    base: reqwest::Url,
}

impl RestGateway {
    /// Build a gateway rooted at `base_url` (e.g. `https://host/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, timeouts: BackendTimeouts) -> Result<Self, GatewayError> {
        let base = reqwest::Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| GatewayError::HttpClientBuild(format!("invalid backend URL {base_url}: {e}")))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(GatewayError::HttpClientBuild(format!("invalid backend URL {base_url}")));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| GatewayError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base })
    }

    /// Resolve path segments against the base URL. Segments are percent-encoded,
    /// so ids taken from forms cannot escape their path position.
    pub(crate) fn url(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &'static str,
        fallback: &str,
    ) -> Result<Value, GatewayError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "backend unreachable");
                return Err(GatewayError::Network(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        classify_response(status, &body, fallback)
            .inspect_err(|e| tracing::warn!(endpoint, status, error = %e, "backend call failed"))
    }

    async fn fetch_role(&self, token: &str) -> Role {
        let request = self.http.get(self.url(&["auth", "me"])).bearer_auth(token);
        let me = self
            .execute(request, "GET /auth/me", "Failed to fetch profile")
            .await
            .and_then(decode_data::<MeWire>);
        match me {
            Ok(me) => me.role.as_deref().map_or(Role::User, Role::parse),
            Err(e) => {
                tracing::warn!(error = %e, "role lookup failed; treating session as user");
                Role::User
            }
        }
    }
}

/// Path for the viewer's booking list.
pub(crate) fn bookings_segments(viewer: &Viewer) -> Vec<&str> {
    match viewer {
        Viewer::Admin => vec!["bookings"],
        Viewer::User(user_id) => vec!["bookings", "user", user_id.as_str()],
    }
}

fn decode_record(value: Value) -> Result<BookingRecord, GatewayError> {
    decode_data::<BookingWire>(value).map(BookingWire::into_record)
}

#[async_trait::async_trait]
impl BackendApi for RestGateway {
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        let request = self
            .http
            .post(self.url(&["auth", "register"]))
            .json(registration);
        self.execute(request, "POST /auth/register", "Failed to register")
            .await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionIdentity, GatewayError> {
        let request = self
            .http
            .post(self.url(&["auth", "login"]))
            .json(&Credentials { email, password });
        let value = self
            .execute(request, "POST /auth/login", "Invalid email or password")
            .await?;

        // Some deployments wrap the login payload in `data`.
        let login = match serde_json::from_value::<LoginWire>(value.clone()) {
            Ok(login) => login,
            Err(_) => decode_data::<LoginWire>(value)?,
        };
        let user_id = login
            .user_id()
            .ok_or_else(|| GatewayError::Decode("login response has no user id".to_owned()))?
            .to_owned();
        let role = match login.role.as_deref() {
            Some(raw) => Role::parse(raw),
            None => self.fetch_role(&login.token).await,
        };

        Ok(SessionIdentity { user_id, token: login.token, role })
    }

    async fn update_password(
        &self,
        identity: &SessionIdentity,
        current_password: &str,
        new_password: &str,
    ) -> Result<Option<String>, GatewayError> {
        let request = self
            .http
            .put(self.url(&["auth", "updatePassword"]))
            .bearer_auth(&identity.token)
            .json(&PasswordChange { current_password, new_password });
        let value = self
            .execute(request, "PUT /auth/updatePassword", "Error changing password. Please try again.")
            .await?;
        Ok(value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    async fn providers(&self) -> Result<Vec<Provider>, GatewayError> {
        let request = self.http.get(self.url(&["providers"]));
        let value = self
            .execute(request, "GET /providers", "Failed to fetch providers")
            .await?;
        decode_data(value)
    }

    async fn provider(&self, provider_id: &str) -> Result<Provider, GatewayError> {
        let request = self.http.get(self.url(&["providers", provider_id]));
        let value = self
            .execute(request, "GET /providers/{id}", "Failed to fetch provider")
            .await?;
        decode_data(value)
    }

    async fn create_booking(
        &self,
        identity: &SessionIdentity,
        provider_id: &str,
        rental_date: &str,
    ) -> Result<BookingRecord, GatewayError> {
        let request = self
            .http
            .post(self.url(&["providers", provider_id, "bookings"]))
            .bearer_auth(&identity.token)
            .json(&NewBooking { rental_date, user: &identity.user_id });
        let value = self
            .execute(request, "POST /providers/{id}/bookings", "Error creating booking")
            .await?;
        decode_record(value)
    }

    async fn bookings(&self, identity: &SessionIdentity) -> Result<Vec<BookingRecord>, GatewayError> {
        let viewer = identity.viewer();
        let request = self
            .http
            .get(self.url(&bookings_segments(&viewer)))
            .bearer_auth(&identity.token);
        let value = self
            .execute(request, "GET /bookings", "Failed to fetch bookings")
            .await?;
        let wires: Vec<BookingWire> = decode_data(value)?;
        Ok(wires.into_iter().map(BookingWire::into_record).collect())
    }

    async fn update_booking(
        &self,
        identity: &SessionIdentity,
        booking_id: &str,
        change: &BookingChange,
    ) -> Result<BookingRecord, GatewayError> {
        let request = self
            .http
            .put(self.url(&["bookings", booking_id]))
            .bearer_auth(&identity.token)
            .json(change);
        let value = self
            .execute(request, "PUT /bookings/{id}", "Failed to update booking")
            .await?;
        decode_record(value)
    }

    async fn delete_booking(&self, identity: &SessionIdentity, booking_id: &str) -> Result<(), GatewayError> {
        let request = self
            .http
            .delete(self.url(&["bookings", booking_id]))
            .bearer_auth(&identity.token);
        self.execute(request, "DELETE /bookings/{id}", "Failed to remove booking")
            .await?;
        Ok(())
    }

    async fn booking_stats(&self, identity: &SessionIdentity) -> Result<Vec<ProviderStat>, GatewayError> {
        let request = self
            .http
            .get(self.url(&["bookings", "stats"]))
            .bearer_auth(&identity.token);
        let value = self
            .execute(request, "GET /bookings/stats", "Failed to fetch statistics")
            .await?;
        decode_data(value).map_err(|_| GatewayError::Decode("Invalid data format received".to_owned()))
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
