//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every screen is a server-rendered HTML route behind the session
//! middleware. Static assets (`/img`, `/static`) and `/healthz` bypass it.

pub mod auth;
pub mod bookings;
pub mod providers;
pub mod session;

#[cfg(test)]
#[path = "test_client.rs"]
pub(crate) mod test_client;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::gateway::GatewayError;
use crate::state::AppState;

fn screen_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(providers::home))
        .route("/provider", get(providers::catalog))
        .route("/provider/{id}", get(providers::detail))
        .route("/booking", get(bookings::booking_form).post(bookings::create_booking))
        .route("/mybooking", get(bookings::my_bookings))
        .route("/mybooking/{id}/delete", post(bookings::delete_booking))
        .route("/mybooking/{id}/edit", post(bookings::edit_booking))
        .route("/stats", get(bookings::stats))
        .route("/signin", get(auth::signin_form).post(auth::signin))
        .route("/signout", post(auth::signout))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/changepassword", get(auth::change_password_form).post(auth::change_password))
        .layer(middleware::from_fn_with_state(state.clone(), session::resolve_session))
        .with_state(state)
}

/// Full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    screen_routes(state)
        .route("/healthz", get(healthz))
        .nest_service("/img", ServeDir::new(static_dir.join("img")))
        .nest_service("/static", ServeDir::new(static_dir.join("static")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Status for a page rendered around a failed backend call.
pub(crate) fn error_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
        GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
        GatewayError::Network(_)
        | GatewayError::Server { .. }
        | GatewayError::Decode(_)
        | GatewayError::HttpClientBuild(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
