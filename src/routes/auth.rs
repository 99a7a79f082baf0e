//! Sign-in, sign-out, registration, and password change.

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use leptos::prelude::*;
use serde::Deserialize;

use super::error_status;
use super::session::{SignedIn, Visitor};
use crate::gateway::{GatewayError, Registration};
use crate::pages::auth::{ChangePasswordPage, RegisterPage, SignInPage};
use crate::pages::render;
use crate::state::AppState;
use crate::state::session::{Notice, Role};

pub const INVALID_CREDENTIALS_TEXT: &str = "Invalid email or password";
pub const REGISTERED_TEXT: &str = "Registration successful! Please sign in.";
pub const PASSWORD_CHANGED_TEXT: &str = "Password changed successfully!";
pub const PASSWORDS_REQUIRED_TEXT: &str = "Please enter your current and new password";

#[derive(Debug, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

// =============================================================================
// SIGN IN / OUT
// =============================================================================

/// `GET /signin`
pub async fn signin_form(State(state): State<AppState>, visitor: Visitor) -> Response {
    let ctx = visitor.page(&state).await;
    render(view! { <SignInPage ctx=ctx email="" /> }).into_response()
}

/// `POST /signin`
pub async fn signin(State(state): State<AppState>, visitor: Visitor, Form(form): Form<SignInForm>) -> Response {
    let email = form.email.trim().to_owned();
    let outcome = if email.is_empty() || form.password.is_empty() {
        Err(GatewayError::Validation(INVALID_CREDENTIALS_TEXT.to_owned()))
    } else {
        state.backend.sign_in(&email, &form.password).await
    };

    match outcome {
        Ok(identity) => {
            tracing::info!(user_id = %identity.user_id, role = identity.role.as_str(), "signed in");
            visitor.sign_in(&state, identity, "/").await
        }
        Err(e) => {
            // Backend rejections all read the same; transport failures say what happened.
            let (status, text) = match &e {
                GatewayError::Unauthorized(_) | GatewayError::Forbidden(_) | GatewayError::Validation(_) => {
                    (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_TEXT)
                }
                other => (error_status(other), other.user_message()),
            };
            let ctx = visitor.page(&state).await.with_notice(Notice::error(text));
            (status, render(view! { <SignInPage ctx=ctx email=email /> })).into_response()
        }
    }
}

/// `POST /signout`. Drops the whole session, bookings included.
pub async fn signout(State(state): State<AppState>, visitor: Visitor) -> Redirect {
    if let Some(identity) = &visitor.identity {
        tracing::info!(user_id = %identity.user_id, "signed out");
    }
    if let Some(id) = &visitor.session_id {
        state.sessions.close(id).await;
    }
    Redirect::to("/")
}

// =============================================================================
// REGISTER
// =============================================================================

/// `GET /register`
pub async fn register_form(State(state): State<AppState>, visitor: Visitor) -> Response {
    let ctx = visitor.page(&state).await;
    render(view! { <RegisterPage ctx=ctx name="" email="" /> }).into_response()
}

/// `POST /register`. New accounts always get the `user` role.
pub async fn register(State(state): State<AppState>, visitor: Visitor, Form(form): Form<RegisterForm>) -> Response {
    let registration = Registration {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password: form.password,
        role: Role::User.as_str().to_owned(),
    };

    match state.backend.register(&registration).await {
        Ok(()) => {
            tracing::info!(email = %registration.email, "account registered");
            visitor.notify(&state, Notice::success(REGISTERED_TEXT), "/signin").await
        }
        Err(e) => {
            let ctx = visitor.page(&state).await.with_notice(Notice::error(e.user_message()));
            let Registration { name, email, .. } = registration;
            (error_status(&e), render(view! { <RegisterPage ctx=ctx name=name email=email /> })).into_response()
        }
    }
}

// =============================================================================
// CHANGE PASSWORD
// =============================================================================

/// `GET /changepassword`
pub async fn change_password_form(State(state): State<AppState>, user: SignedIn) -> Response {
    let ctx = user.page(&state).await;
    render(view! { <ChangePasswordPage ctx=ctx /> }).into_response()
}

/// `POST /changepassword`. Backend rejections (including a wrong current
/// password) are shown on the form; the session stays signed in.
pub async fn change_password(State(state): State<AppState>, user: SignedIn, Form(form): Form<PasswordForm>) -> Response {
    if form.current_password.is_empty() || form.new_password.is_empty() {
        let ctx = user.page(&state).await.with_notice(Notice::error(PASSWORDS_REQUIRED_TEXT));
        return (StatusCode::BAD_REQUEST, render(view! { <ChangePasswordPage ctx=ctx /> })).into_response();
    }

    match state
        .backend
        .update_password(&user.identity, &form.current_password, &form.new_password)
        .await
    {
        Ok(message) => {
            let text = message.unwrap_or_else(|| PASSWORD_CHANGED_TEXT.to_owned());
            user.notify(&state, Notice::success(text), "/").await
        }
        Err(e) => {
            let ctx = user.page(&state).await.with_notice(Notice::error(e.user_message()));
            (error_status(&e), render(view! { <ChangePasswordPage ctx=ctx /> })).into_response()
        }
    }
}
