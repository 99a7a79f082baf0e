//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the immutable config, the backend gateway behind the
//! `BackendApi` seam, and the registry of browser sessions. Each session owns
//! its identity, booking store, and pending notice.

pub mod bookings;
pub mod session;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::gateway::BackendApi;
use session::Sessions;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; all fields are
/// Arc-wrapped or cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn BackendApi>,
    pub sessions: Sessions,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, backend: Arc<dyn BackendApi>) -> Self {
        Self { config: Arc::new(config), backend, sessions: Sessions::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use crate::config::BackendTimeouts;
    use crate::gateway::{BookingChange, GatewayError, Provider, ProviderStat, Registration};
    use super::bookings::BookingRecord;
    use super::session::{Role, SessionIdentity};

    /// Password the mock accepts for every account.
    pub const GOOD_PASSWORD: &str = "secret";

    /// Scripted in-memory backend. Every call is logged by operation name;
    /// `fail_on` makes the next call of that operation fail.
    #[derive(Default)]
    pub struct MockBackend {
        pub providers: Mutex<Vec<Provider>>,
        pub bookings: Mutex<Vec<BookingRecord>>,
        pub stats: Mutex<Vec<ProviderStat>>,
        pub role: Mutex<Role>,
        pub password_message: Mutex<Option<String>>,
        failures: Mutex<HashMap<&'static str, GatewayError>>,
        calls: Mutex<Vec<String>>,
        created: Mutex<u32>,
    }

    impl MockBackend {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_providers(self, providers: Vec<Provider>) -> Self {
            *self.providers.lock().unwrap() = providers;
            self
        }

        #[must_use]
        pub fn with_bookings(self, bookings: Vec<BookingRecord>) -> Self {
            *self.bookings.lock().unwrap() = bookings;
            self
        }

        #[must_use]
        pub fn with_role(self, role: Role) -> Self {
            *self.role.lock().unwrap() = role;
            self
        }

        pub fn fail_on(&self, op: &'static str, err: GatewayError) {
            self.failures.lock().unwrap().insert(op, err);
        }

        /// Operation log, e.g. `["providers", "create_booking p1 2025-01-01T10:00:00Z"]`.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, op: &'static str, detail: String) -> Result<(), GatewayError> {
            let entry = if detail.is_empty() { op.to_owned() } else { format!("{op} {detail}") };
            self.calls.lock().unwrap().push(entry);
            match self.failures.lock().unwrap().remove(op) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn find_provider(&self, provider_id: &str) -> Option<Provider> {
            self.providers
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == provider_id)
                .cloned()
        }
    }

    #[async_trait::async_trait]
    impl BackendApi for MockBackend {
        async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
            self.record("register", format!("{} {}", registration.email, registration.role))
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<SessionIdentity, GatewayError> {
            self.record("sign_in", email.to_owned())?;
            if password != GOOD_PASSWORD {
                return Err(GatewayError::Unauthorized("Invalid credentials".into()));
            }
            Ok(SessionIdentity { user_id: "u1".into(), token: "tok".into(), role: *self.role.lock().unwrap() })
        }

        async fn update_password(
            &self,
            _identity: &SessionIdentity,
            current_password: &str,
            _new_password: &str,
        ) -> Result<Option<String>, GatewayError> {
            self.record("update_password", String::new())?;
            if current_password != GOOD_PASSWORD {
                return Err(GatewayError::Unauthorized("Current password is incorrect".into()));
            }
            Ok(self.password_message.lock().unwrap().clone())
        }

        async fn providers(&self) -> Result<Vec<Provider>, GatewayError> {
            self.record("providers", String::new())?;
            Ok(self.providers.lock().unwrap().clone())
        }

        async fn provider(&self, provider_id: &str) -> Result<Provider, GatewayError> {
            self.record("provider", provider_id.to_owned())?;
            self.find_provider(provider_id)
                .ok_or_else(|| GatewayError::Validation("Provider not found".into()))
        }

        async fn create_booking(
            &self,
            identity: &SessionIdentity,
            provider_id: &str,
            rental_date: &str,
        ) -> Result<BookingRecord, GatewayError> {
            self.record("create_booking", format!("{provider_id} {rental_date}"))?;
            let n = {
                let mut created = self.created.lock().unwrap();
                *created += 1;
                *created
            };
            let mut record = BookingRecord::new(format!("new{n}"));
            record.scheduled_at = rental_date.to_owned();
            record.provider_id = Some(provider_id.to_owned());
            record.booked_by = Some(identity.user_id.clone());
            Ok(record)
        }

        async fn bookings(&self, _identity: &SessionIdentity) -> Result<Vec<BookingRecord>, GatewayError> {
            self.record("bookings", String::new())?;
            Ok(self.bookings.lock().unwrap().clone())
        }

        async fn update_booking(
            &self,
            _identity: &SessionIdentity,
            booking_id: &str,
            change: &BookingChange,
        ) -> Result<BookingRecord, GatewayError> {
            self.record("update_booking", format!("{booking_id} {} {}", change.provider, change.rental_date))?;
            let mut record = BookingRecord::new(booking_id);
            record.scheduled_at.clone_from(&change.rental_date);
            record.provider_id = Some(change.provider.clone());
            Ok(record)
        }

        async fn delete_booking(&self, _identity: &SessionIdentity, booking_id: &str) -> Result<(), GatewayError> {
            self.record("delete_booking", booking_id.to_owned())
        }

        async fn booking_stats(&self, _identity: &SessionIdentity) -> Result<Vec<ProviderStat>, GatewayError> {
            self.record("booking_stats", String::new())?;
            Ok(self.stats.lock().unwrap().clone())
        }
    }

    /// Config suitable for tests: no cookie `Secure` flag, default refresh.
    #[must_use]
    pub fn test_config() -> AppConfig {
        AppConfig {
            port: 0,
            backend_url: "http://backend.invalid/api/v1".into(),
            timeouts: BackendTimeouts { request_secs: 1, connect_secs: 1 },
            refresh_secs: Some(30),
            session_idle_secs: 60,
            cookie_secure: false,
            static_dir: PathBuf::from("public"),
        }
    }

    #[must_use]
    pub fn test_app_state(backend: Arc<MockBackend>) -> AppState {
        AppState::new(test_config(), backend)
    }

    #[must_use]
    pub fn provider(id: &str, name: &str) -> Provider {
        Provider {
            id: id.into(),
            name: name.into(),
            address: format!("{name} Road"),
            tel: "02-000-0000".into(),
        }
    }

    #[must_use]
    pub fn record(id: &str, holder_name: &str) -> BookingRecord {
        BookingRecord {
            holder_name: holder_name.into(),
            phone: "02-000-0000".into(),
            venue_address: format!("{holder_name} Road"),
            scheduled_at: "2025-03-01T10:00:00.000Z".into(),
            ..BookingRecord::new(id)
        }
    }

    #[must_use]
    pub fn identity(role: Role) -> SessionIdentity {
        SessionIdentity { user_id: "u1".into(), token: "tok".into(), role }
    }

    /// Open a session and sign it in as `role`. Returns the session id.
    pub async fn signed_in_session(state: &AppState, role: Role) -> String {
        state.sessions.sign_in(None, identity(role)).await
    }
}
