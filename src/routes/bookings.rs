//! Booking screens: create, list, edit, remove, and admin statistics.
//!
//! Every confirmed mutation is mirrored into the session's booking store
//! before the redirect, so the next list render shows it even when the
//! refresh that follows is discarded or fails.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use leptos::prelude::*;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use super::error_status;
use super::session::SignedIn;
use crate::gateway::BookingChange;
use crate::gateway::types::fill_provider;
use crate::pages::bookings::{BookingFormPage, BookingListPage};
use crate::pages::render;
use crate::pages::stats::{NotAuthorizedPage, StatsPage, rank_stats};
use crate::state::AppState;
use crate::state::bookings::BookingRecord;
use crate::state::session::{Notice, Viewer};

pub const BOOKING_CREATED_TEXT: &str = "Booking successful!";
pub const BOOKING_REMOVED_TEXT: &str = "Booking removed successfully";
pub const BOOKING_UPDATED_TEXT: &str = "Booking updated successfully";
pub const PROVIDER_REQUIRED_TEXT: &str = "Please select a provider";
pub const PROVIDER_AND_DATE_REQUIRED_TEXT: &str = "Please select a provider and date";
pub const INVALID_DATE_TEXT: &str = "Invalid date or time";

const REFRESH: HeaderName = HeaderName::from_static("refresh");

#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    #[serde(default)]
    pub provider: Option<String>,
}

/// Fields posted by both the booking form and the inline edit form.
#[derive(Debug, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

/// Build the backend `rentalDate` (UTC, RFC 3339) from the form's `date`
/// and `time` inputs. No date means "now"; no time means midnight.
///
/// # Errors
///
/// Returns `INVALID_DATE_TEXT` if either input does not parse.
pub fn rental_date_from_form(date: &str, clock: &str, now: OffsetDateTime) -> Result<String, &'static str> {
    let (date, clock) = (date.trim(), clock.trim());
    let at = if date.is_empty() {
        now.to_offset(UtcOffset::UTC)
            .replace_nanosecond(0)
            .unwrap_or(now)
    } else {
        let day = Date::parse(date, format_description!("[year]-[month]-[day]")).map_err(|_| INVALID_DATE_TEXT)?;
        let at_time = if clock.is_empty() {
            Time::MIDNIGHT
        } else {
            Time::parse(clock, format_description!("[hour]:[minute]"))
                .or_else(|_| Time::parse(clock, format_description!("[hour]:[minute]:[second]")))
                .map_err(|_| INVALID_DATE_TEXT)?
        };
        PrimitiveDateTime::new(day, at_time).assume_utc()
    };
    at.format(&Rfc3339).map_err(|_| INVALID_DATE_TEXT)
}

/// Fill display fields a mutation response left out: keep `previous`'s
/// "booked by" label and, for the same provider, its display fields; look the
/// provider up otherwise. Lookup failures leave the fields blank until the
/// next list refresh.
async fn complete_record(state: &AppState, record: &mut BookingRecord, previous: Option<&BookingRecord>) {
    if let Some(previous) = previous {
        if previous.booked_by.is_some() {
            record.booked_by.clone_from(&previous.booked_by);
        }
        if previous.provider_id == record.provider_id && record.holder_name.is_empty() {
            record.holder_name.clone_from(&previous.holder_name);
            record.phone.clone_from(&previous.phone);
            record.venue_address.clone_from(&previous.venue_address);
        }
    }

    if !record.holder_name.is_empty() {
        return;
    }
    let Some(provider_id) = record.provider_id.clone() else {
        return;
    };
    match state.backend.provider(&provider_id).await {
        Ok(provider) => fill_provider(record, &provider),
        Err(e) => tracing::warn!(%provider_id, error = %e, "provider lookup for booking display failed"),
    }
}

// =============================================================================
// CREATE
// =============================================================================

/// `GET /booking`
pub async fn booking_form(State(state): State<AppState>, user: SignedIn, Query(query): Query<BookingQuery>) -> Response {
    let ctx = user.page(&state).await;
    match state.backend.providers().await {
        Ok(providers) => {
            render(view! { <BookingFormPage ctx=ctx providers=providers selected={query.provider} /> }).into_response()
        }
        Err(e) if e.is_unauthorized() => user.expire(&state).await,
        Err(e) => {
            let ctx = ctx.with_notice(Notice::error(e.user_message()));
            (error_status(&e), render(view! { <BookingFormPage ctx=ctx providers=Vec::new() selected=None /> }))
                .into_response()
        }
    }
}

/// `POST /booking`
pub async fn create_booking(State(state): State<AppState>, user: SignedIn, Form(form): Form<BookingForm>) -> Response {
    let provider_id = form.provider.trim();
    if provider_id.is_empty() {
        return user
            .notify(&state, Notice::error(PROVIDER_REQUIRED_TEXT), "/booking")
            .await;
    }
    let rental_date = match rental_date_from_form(&form.date, &form.time, OffsetDateTime::now_utc()) {
        Ok(rental_date) => rental_date,
        Err(text) => return user.notify(&state, Notice::error(text), "/booking").await,
    };

    match state
        .backend
        .create_booking(&user.identity, provider_id, &rental_date)
        .await
    {
        Ok(mut record) => {
            complete_record(&state, &mut record, None).await;
            tracing::info!(booking_id = %record.id, %provider_id, "booking created");
            state.sessions.upsert_booking(&user.session_id, record).await;
            user.notify(&state, Notice::success(BOOKING_CREATED_TEXT), "/mybooking")
                .await
        }
        Err(e) => user.fail(&state, &e, "/booking").await,
    }
}

// =============================================================================
// LIST / EDIT / REMOVE
// =============================================================================

/// `GET /mybooking`
pub async fn my_bookings(State(state): State<AppState>, user: SignedIn) -> Response {
    let seen = state.sessions.bookings_revision(&user.session_id).await;
    let mut fetch_error = None;
    match state.backend.bookings(&user.identity).await {
        Ok(records) => {
            if !state
                .sessions
                .refresh_bookings(&user.session_id, records, seen)
                .await
            {
                tracing::debug!("booking refresh discarded; a mutation committed during the fetch");
            }
        }
        Err(e) if e.is_unauthorized() => return user.expire(&state).await,
        Err(e) => fetch_error = Some(Notice::error(e.user_message())),
    }

    let providers = state.backend.providers().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "provider list for edit form unavailable");
        Vec::new()
    });
    let bookings = state.sessions.bookings(&user.session_id).await;
    let mut ctx = user.page(&state).await;
    if let Some(notice) = fetch_error {
        ctx = ctx.with_notice(notice);
    }

    let viewer = user.identity.viewer();
    let page = render(view! { <BookingListPage ctx=ctx viewer=viewer bookings=bookings providers=providers /> });
    match state.config.refresh_secs {
        Some(secs) => ([(REFRESH, secs.to_string())], page).into_response(),
        None => page.into_response(),
    }
}

/// `POST /mybooking/{id}/delete`
pub async fn delete_booking(State(state): State<AppState>, user: SignedIn, Path(id): Path<String>) -> Response {
    match state.backend.delete_booking(&user.identity, &id).await {
        Ok(()) => {
            tracing::info!(booking_id = %id, "booking removed");
            state.sessions.remove_booking(&user.session_id, &id).await;
            user.notify(&state, Notice::success(BOOKING_REMOVED_TEXT), "/mybooking")
                .await
        }
        Err(e) => user.fail(&state, &e, "/mybooking").await,
    }
}

/// `POST /mybooking/{id}/edit`
pub async fn edit_booking(
    State(state): State<AppState>,
    user: SignedIn,
    Path(id): Path<String>,
    Form(form): Form<BookingForm>,
) -> Response {
    let provider_id = form.provider.trim();
    if provider_id.is_empty() || form.date.trim().is_empty() {
        return user
            .notify(&state, Notice::error(PROVIDER_AND_DATE_REQUIRED_TEXT), "/mybooking")
            .await;
    }
    let rental_date = match rental_date_from_form(&form.date, &form.time, OffsetDateTime::now_utc()) {
        Ok(rental_date) => rental_date,
        Err(text) => return user.notify(&state, Notice::error(text), "/mybooking").await,
    };

    let change = BookingChange { rental_date, provider: provider_id.to_owned() };
    match state
        .backend
        .update_booking(&user.identity, &id, &change)
        .await
    {
        Ok(mut record) => {
            let previous = state.sessions.booking(&user.session_id, &id).await;
            complete_record(&state, &mut record, previous.as_ref()).await;
            tracing::info!(booking_id = %id, "booking updated");
            state.sessions.upsert_booking(&user.session_id, record).await;
            user.notify(&state, Notice::success(BOOKING_UPDATED_TEXT), "/mybooking")
                .await
        }
        Err(e) => user.fail(&state, &e, "/mybooking").await,
    }
}

// =============================================================================
// STATS
// =============================================================================

/// `GET /stats` (admins only)
pub async fn stats(State(state): State<AppState>, user: SignedIn) -> Response {
    match user.identity.viewer() {
        Viewer::User(_) => {
            let ctx = user.page(&state).await;
            (StatusCode::FORBIDDEN, render(view! { <NotAuthorizedPage ctx=ctx /> })).into_response()
        }
        Viewer::Admin => match state.backend.booking_stats(&user.identity).await {
            Ok(stats) => {
                let (rows, total) = rank_stats(stats);
                let ctx = user.page(&state).await;
                render(view! { <StatsPage ctx=ctx rows=rows total=total /> }).into_response()
            }
            Err(e) if e.is_unauthorized() => user.expire(&state).await,
            Err(e) => {
                let ctx = user.page(&state).await.with_notice(Notice::error(e.user_message()));
                (error_status(&e), render(view! { <StatsPage ctx=ctx rows=Vec::new() total=0 /> })).into_response()
            }
        },
    }
}

#[cfg(test)]
#[path = "bookings_test.rs"]
mod tests;
