//! Server-rendered screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every screen is a Leptos component tree rendered once to an HTML string
//! with `RenderHtml::to_html`. Nothing hydrates: forms post back to the
//! server, which answers with a redirect or a freshly rendered page.
//! Screens receive everything they show as props; none of them reads
//! session state or talks to the backend.

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod home;
pub mod layout;
pub mod stats;

use axum::response::Html;
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::state::session::{Notice, Viewer};

/// Per-request data every page needs for its chrome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    /// `None` for anonymous visitors.
    pub viewer: Option<Viewer>,
    /// Notices shown above the screen, oldest first.
    pub notices: Vec<Notice>,
}

impl PageContext {
    #[must_use]
    pub fn signed_in(&self) -> bool {
        self.viewer.is_some()
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}

/// Render a full document.
pub fn render(view: impl IntoView) -> Html<String> {
    Html(format!("<!DOCTYPE html>{}", view.to_html()))
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
