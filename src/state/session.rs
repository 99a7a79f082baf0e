//! Browser sessions: who is signed in, their bookings, and pending notices.
//!
//! ARCHITECTURE
//! ============
//! A browser gets a random session id (HttpOnly cookie) that keys one
//! `SessionSlot` once there is something to remember: a signed-in identity
//! or a notice for the next page. Anonymous read-only browsing never opens a
//! slot. The slot holds the identity returned by the backend's credential
//! exchange, the viewer's `BookingStore`, and at most one pending notice.
//!
//! Signing in always moves the browser to a freshly generated id and drops
//! the old slot, so an id known before sign-in never carries an identity.
//!
//! Locks are held only for in-memory reads and writes. Handlers copy what
//! they need out of a slot, release the lock, then talk to the backend.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;

use super::bookings::{BookingRecord, BookingStore};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex session id.
#[must_use]
pub fn generate_session_id() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Backend role attached to a signed-in identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Parse the backend's role string. Anything but `admin` is a plain user.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") { Self::Admin } else { Self::User }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Who is looking at a screen. Admins see every booking; users see their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viewer {
    User(String),
    Admin,
}

/// Identity issued by the backend at sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    /// Bearer token attached to every authenticated backend call.
    pub token: String,
    pub role: Role,
}

impl SessionIdentity {
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        match self.role {
            Role::Admin => Viewer::Admin,
            Role::User => Viewer::User(self.user_id.clone()),
        }
    }
}

// =============================================================================
// NOTICES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One-shot inline message shown on the next rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}

// =============================================================================
// SLOT
// =============================================================================

/// Everything the server remembers about one browser.
#[derive(Debug)]
pub struct SessionSlot {
    pub identity: Option<SessionIdentity>,
    pub bookings: BookingStore,
    pub notice: Option<Notice>,
    last_seen: Instant,
}

impl SessionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self { identity: None, bookings: BookingStore::new(), notice: None, last_seen: Instant::now() }
    }

    /// Adopt a new identity. The previous viewer's bookings are dropped.
    pub fn sign_in(&mut self, identity: SessionIdentity) {
        self.identity = Some(identity);
        self.bookings.replace_all(Vec::new());
    }

    /// Forget the identity and everything loaded on its behalf.
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.bookings.replace_all(Vec::new());
    }
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// All live sessions keyed by session id.
#[derive(Clone, Default)]
pub struct Sessions {
    slots: Arc<RwLock<HashMap<String, SessionSlot>>>,
}

impl Sessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty anonymous session and return its id.
    #[cfg(test)]
    pub async fn open(&self) -> String {
        let id = generate_session_id();
        self.slots.write().await.insert(id.clone(), SessionSlot::new());
        id
    }

    /// Number of live sessions.
    pub async fn live_count(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Whether `id` names a live session. Marks the session as recently used.
    pub async fn touch(&self, id: &str) -> bool {
        self.with_slot(id, |slot| slot.last_seen = Instant::now())
            .await
            .is_some()
    }

    /// Run `f` against the slot for `id`, if it exists.
    pub async fn with_slot<R>(&self, id: &str, f: impl FnOnce(&mut SessionSlot) -> R) -> Option<R> {
        let mut slots = self.slots.write().await;
        slots.get_mut(id).map(f)
    }

    pub async fn identity(&self, id: &str) -> Option<SessionIdentity> {
        let slots = self.slots.read().await;
        slots.get(id).and_then(|slot| slot.identity.clone())
    }

    /// Start a signed-in session under a new id. A pending notice on
    /// `previous` is carried over; the `previous` slot itself is dropped.
    pub async fn sign_in(&self, previous: Option<&str>, identity: SessionIdentity) -> String {
        let mut slots = self.slots.write().await;
        let mut slot = SessionSlot::new();
        if let Some(old) = previous.and_then(|id| slots.remove(id)) {
            slot.notice = old.notice;
        }
        slot.sign_in(identity);
        let id = generate_session_id();
        slots.insert(id.clone(), slot);
        id
    }

    /// Clear the identity but keep the slot (and any notice queued on it).
    pub async fn sign_out(&self, id: &str) {
        self.with_slot(id, SessionSlot::sign_out).await;
    }

    /// Drop the session entirely.
    pub async fn close(&self, id: &str) {
        self.slots.write().await.remove(id);
    }

    pub async fn set_notice(&self, id: &str, notice: Notice) {
        self.with_slot(id, |slot| slot.notice = Some(notice)).await;
    }

    /// Queue `notice` for the next page. Opens a slot when `id` is absent or
    /// no longer live, returning the new id the browser must adopt.
    pub async fn flash(&self, id: Option<&str>, notice: Notice) -> Option<String> {
        let mut slots = self.slots.write().await;
        if let Some(slot) = id.and_then(|id| slots.get_mut(id)) {
            slot.notice = Some(notice);
            return None;
        }
        let fresh = generate_session_id();
        slots.insert(fresh.clone(), SessionSlot { notice: Some(notice), ..SessionSlot::new() });
        Some(fresh)
    }

    pub async fn take_notice(&self, id: &str) -> Option<Notice> {
        self.with_slot(id, |slot| slot.notice.take()).await.flatten()
    }

    /// Snapshot of the session's bookings in display order.
    pub async fn bookings(&self, id: &str) -> Vec<BookingRecord> {
        let slots = self.slots.read().await;
        slots
            .get(id)
            .map(|slot| slot.bookings.items().to_vec())
            .unwrap_or_default()
    }

    pub async fn booking(&self, id: &str, booking_id: &str) -> Option<BookingRecord> {
        let slots = self.slots.read().await;
        slots.get(id).and_then(|slot| slot.bookings.get(booking_id).cloned())
    }

    pub async fn bookings_revision(&self, id: &str) -> u64 {
        let slots = self.slots.read().await;
        slots.get(id).map_or(0, |slot| slot.bookings.revision())
    }

    pub async fn upsert_booking(&self, id: &str, record: BookingRecord) {
        self.with_slot(id, |slot| slot.bookings.upsert(record)).await;
    }

    pub async fn remove_booking(&self, id: &str, booking_id: &str) {
        self.with_slot(id, |slot| slot.bookings.remove(booking_id)).await;
    }

    /// Land a list refresh unless a mutation committed since `seen_revision`.
    pub async fn refresh_bookings(&self, id: &str, records: Vec<BookingRecord>, seen_revision: u64) -> bool {
        self.with_slot(id, |slot| slot.bookings.replace_all_if_unchanged(records, seen_revision))
            .await
            .unwrap_or(false)
    }

    /// Drop sessions idle for longer than `idle`. Returns how many were dropped.
    pub async fn sweep(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| now.duration_since(slot.last_seen) <= idle);
        before - slots.len()
    }
}

/// Periodically drop idle sessions.
pub fn spawn_session_sweeper(sessions: Sessions, idle: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let period = (idle / 4).max(Duration::from_secs(1));
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let dropped = sessions.sweep(idle).await;
            if dropped > 0 {
                let live = sessions.live_count().await;
                tracing::debug!(dropped, live, "idle sessions dropped");
            }
        }
    })
}
