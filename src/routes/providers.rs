//! Public screens: home, provider catalog, provider detail.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use leptos::prelude::*;

use super::error_status;
use super::session::Visitor;
use crate::pages::catalog::{CatalogPage, ProviderDetailPage};
use crate::pages::home::HomePage;
use crate::pages::render;
use crate::state::AppState;
use crate::state::session::Notice;

/// `GET /`
pub async fn home(State(state): State<AppState>, visitor: Visitor) -> Response {
    let ctx = visitor.page(&state).await;
    render(view! { <HomePage ctx=ctx /> }).into_response()
}

/// `GET /provider`
pub async fn catalog(State(state): State<AppState>, visitor: Visitor) -> Response {
    let ctx = visitor.page(&state).await;
    match state.backend.providers().await {
        Ok(providers) => render(view! { <CatalogPage ctx=ctx providers=providers /> }).into_response(),
        Err(e) => {
            let ctx = ctx.with_notice(Notice::error(e.user_message()));
            (error_status(&e), render(view! { <CatalogPage ctx=ctx providers=Vec::new() /> })).into_response()
        }
    }
}

/// `GET /provider/{id}`
pub async fn detail(State(state): State<AppState>, visitor: Visitor, Path(id): Path<String>) -> Response {
    let ctx = visitor.page(&state).await;
    match state.backend.provider(&id).await {
        Ok(provider) => render(view! { <ProviderDetailPage ctx=ctx provider=Some(provider) /> }).into_response(),
        Err(e) => {
            tracing::debug!(provider_id = %id, error = %e, "provider lookup failed");
            let ctx = ctx.with_notice(Notice::error(e.user_message()));
            (error_status(&e), render(view! { <ProviderDetailPage ctx=ctx provider=None /> })).into_response()
        }
    }
}
