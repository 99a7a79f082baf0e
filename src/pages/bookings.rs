//! Booking form and booking list screens.

use leptos::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use super::PageContext;
use super::layout::Shell;
use crate::gateway::Provider;
use crate::state::bookings::BookingRecord;
use crate::state::session::Viewer;

/// Shown instead of the list when the viewer has no bookings.
pub const EMPTY_LIST_TEXT: &str = "No Venue Booking";

/// `2025-03-01 10:00 UTC` for RFC 3339 input; anything else verbatim.
#[must_use]
pub fn display_datetime(raw: &str) -> String {
    let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) else {
        return raw.to_owned();
    };
    let utc = parsed.to_offset(time::UtcOffset::UTC);
    utc.format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
        .unwrap_or_else(|_| raw.to_owned())
}

/// Split an RFC 3339 timestamp into `date` and `time` input values.
#[must_use]
pub fn input_values(raw: &str) -> (String, String) {
    let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) else {
        return (String::new(), String::new());
    };
    let utc = parsed.to_offset(time::UtcOffset::UTC);
    let date = utc
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default();
    let clock = utc
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default();
    (date, clock)
}

/// Provider `<option>`s with `selected` resolved: the matching id, else the
/// first provider.
#[component]
fn ProviderOptions(providers: Vec<Provider>, selected: Option<String>) -> impl IntoView {
    let selected = selected
        .filter(|id| providers.iter().any(|p| &p.id == id))
        .or_else(|| providers.first().map(|p| p.id.clone()));
    providers
        .into_iter()
        .map(|provider| {
            let is_selected = selected.as_deref() == Some(provider.id.as_str());
            view! { <option value=provider.id selected=is_selected>{provider.name}</option> }
        })
        .collect_view()
}

// =============================================================================
// BOOKING FORM
// =============================================================================

#[component]
pub fn BookingFormPage(ctx: PageContext, providers: Vec<Provider>, selected: Option<String>) -> impl IntoView {
    view! {
        <Shell title="Booking" ctx=ctx>
            <section class="form-card">
                <h1 class="page__title">"Provider Booking"</h1>
                <form class="form" method="post" action="/booking">
                    <label class="form__label" for="provider">"Provider"</label>
                    <select class="form__input" id="provider" name="provider" required=true>
                        <ProviderOptions providers=providers selected=selected />
                    </select>
                    <label class="form__label" for="date">"Date"</label>
                    <input class="form__input" id="date" type="date" name="date" />
                    <label class="form__label" for="time">"Time"</label>
                    <input class="form__input" id="time" type="time" name="time" />
                    <button class="button" type="submit">"Book Provider"</button>
                </form>
            </section>
        </Shell>
    }
}

// =============================================================================
// BOOKING LIST
// =============================================================================

#[component]
fn BookingRow(record: BookingRecord, providers: Vec<Provider>, show_booked_by: bool) -> impl IntoView {
    let delete_action = format!("/mybooking/{}/delete", record.id);
    let edit_action = format!("/mybooking/{}/edit", record.id);
    let (date, clock) = input_values(&record.scheduled_at);
    let booked_by = show_booked_by.then(|| {
        let name = record.booked_by.clone().unwrap_or_default();
        view! { <p class="booking__meta">"Booked by: " {name}</p> }
    });

    view! {
        <li class="booking">
            <div class="booking__body">
                <h3 class="booking__title">{record.holder_name}</h3>
                <p class="booking__meta">"Tel: " {record.phone}</p>
                <p class="booking__meta">"Address: " {record.venue_address}</p>
                <p class="booking__meta">"Date: " {display_datetime(&record.scheduled_at)}</p>
                {booked_by}
            </div>
            <div class="booking__actions">
                <details class="booking__edit">
                    <summary class="button button--secondary">"Edit"</summary>
                    <form class="form form--inline" method="post" action=edit_action>
                        <select class="form__input" name="provider">
                            <ProviderOptions providers=providers selected=record.provider_id />
                        </select>
                        <input class="form__input" type="date" name="date" value=date />
                        <input class="form__input" type="time" name="time" value=clock />
                        <button class="button" type="submit">"Save"</button>
                    </form>
                </details>
                <form method="post" action=delete_action>
                    <button class="button button--danger" type="submit">"Remove"</button>
                </form>
            </div>
        </li>
    }
}

/// Booking list for `viewer`. Admins see everyone's bookings and who made them.
#[component]
pub fn BookingListPage(
    ctx: PageContext,
    viewer: Viewer,
    bookings: Vec<BookingRecord>,
    providers: Vec<Provider>,
) -> impl IntoView {
    let (title, show_booked_by) = match viewer {
        Viewer::Admin => ("All Bookings", true),
        Viewer::User(_) => ("My Booking", false),
    };

    let body = if bookings.is_empty() {
        view! { <p class="empty">{EMPTY_LIST_TEXT}</p> }.into_any()
    } else {
        view! {
            <ul class="booking-list">
                {bookings
                    .into_iter()
                    .map(|record| {
                        view! {
                            <BookingRow record=record providers=providers.clone() show_booked_by=show_booked_by />
                        }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any()
    };

    view! {
        <Shell title=title ctx=ctx>
            <h1 class="page__title">{title}</h1>
            {body}
        </Shell>
    }
}
