//! Per-session booking list, mirrored from backend round-trips.
//!
//! DESIGN
//! ======
//! The store is a plain `Vec` keyed by booking `id`: list views want stable
//! ordering, and a viewer's booking count is small enough that a linear scan
//! beats maintaining a side index. Position is preserved on replacement and
//! inserts append.
//!
//! REFRESH POLICY
//! ==============
//! Every committed mutation bumps `revision`. A list refresh captures the
//! revision before it calls the backend and only lands if nothing else
//! committed in between (`replace_all_if_unchanged`). A stale refresh can
//! therefore never resurrect a booking the viewer just deleted or roll back
//! an edit they just saved.

#[cfg(test)]
#[path = "bookings_test.rs"]
mod bookings_test;

use serde::{Deserialize, Serialize};

/// One booking as shown in the booking list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Backend-assigned identity. Never changes once created.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nameLastname")]
    pub holder_name: String,
    #[serde(rename = "tel")]
    pub phone: String,
    #[serde(rename = "venue")]
    pub venue_address: String,
    #[serde(rename = "bookDate")]
    pub scheduled_at: String,
    /// Display name of the user who made the booking (admin listings).
    #[serde(rename = "bookedBy", default, skip_serializing_if = "Option::is_none")]
    pub booked_by: Option<String>,
    /// Provider the booking references, when the backend reported it.
    #[serde(rename = "provider", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

impl BookingRecord {
    /// Create a record with only its identity set.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            holder_name: String::new(),
            phone: String::new(),
            venue_address: String::new(),
            scheduled_at: String::new(),
            booked_by: None,
            provider_id: None,
        }
    }
}

/// Normalized booking collection for one browser session.
#[derive(Clone, Debug, Default)]
pub struct BookingStore {
    items: Vec<BookingRecord>,
    revision: u64,
}

impl BookingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current records in display order.
    #[must_use]
    pub fn items(&self) -> &[BookingRecord] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BookingRecord> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of mutations committed so far. Counts commits, not content
    /// changes: a `remove` of an absent id still counts.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the record with the same `id` in place, or append it.
    pub fn upsert(&mut self, record: BookingRecord) {
        match self.items.iter_mut().find(|item| item.id == record.id) {
            Some(existing) => *existing = record,
            None => self.items.push(record),
        }
        self.bump();
    }

    /// Drop the record with `id`. Absent ids are not an error.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        self.bump();
    }

    /// Adopt `records` verbatim. Callers guarantee `id` uniqueness.
    pub fn replace_all(&mut self, records: Vec<BookingRecord>) {
        self.items = records;
        self.bump();
    }

    /// Apply a refresh result fetched when the store was at `seen_revision`.
    ///
    /// Returns `false` (and leaves the store untouched) if any mutation
    /// committed since the fetch started.
    pub fn replace_all_if_unchanged(&mut self, records: Vec<BookingRecord>, seen_revision: u64) -> bool {
        if self.revision != seen_revision {
            return false;
        }
        self.replace_all(records);
        true
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
