//! Remote data gateway for the booking backend.
//!
//! DESIGN
//! ======
//! `BackendApi` is the seam between screen handlers and the backend. The
//! production implementation (`RestGateway`) speaks JSON over `reqwest`;
//! tests swap in a scripted implementation. Authenticated calls take the
//! caller's `SessionIdentity` explicitly so no handler reaches for ambient
//! session state.

pub mod rest;
pub mod types;

pub use rest::RestGateway;
pub use types::{BookingChange, GatewayError, Provider, ProviderStat, Registration};

use crate::state::bookings::BookingRecord;
use crate::state::session::SessionIdentity;

/// Backend operations the screens need.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /auth/register`.
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError>;

    /// `POST /auth/login`, resolving the role through `GET /auth/me` when the
    /// login response omits it.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionIdentity, GatewayError>;

    /// `PUT /auth/updatePassword`. Returns the backend's confirmation message.
    async fn update_password(
        &self,
        identity: &SessionIdentity,
        current_password: &str,
        new_password: &str,
    ) -> Result<Option<String>, GatewayError>;

    /// `GET /providers`.
    async fn providers(&self) -> Result<Vec<Provider>, GatewayError>;

    /// `GET /providers/{id}`.
    async fn provider(&self, provider_id: &str) -> Result<Provider, GatewayError>;

    /// `POST /providers/{id}/bookings`.
    async fn create_booking(
        &self,
        identity: &SessionIdentity,
        provider_id: &str,
        rental_date: &str,
    ) -> Result<BookingRecord, GatewayError>;

    /// `GET /bookings` for admins, `GET /bookings/user/{id}` for everyone else.
    async fn bookings(&self, identity: &SessionIdentity) -> Result<Vec<BookingRecord>, GatewayError>;

    /// `PUT /bookings/{id}`.
    async fn update_booking(
        &self,
        identity: &SessionIdentity,
        booking_id: &str,
        change: &BookingChange,
    ) -> Result<BookingRecord, GatewayError>;

    /// `DELETE /bookings/{id}`.
    async fn delete_booking(&self, identity: &SessionIdentity, booking_id: &str) -> Result<(), GatewayError>;

    /// `GET /bookings/stats` (admin).
    async fn booking_stats(&self, identity: &SessionIdentity) -> Result<Vec<ProviderStat>, GatewayError>;
}
