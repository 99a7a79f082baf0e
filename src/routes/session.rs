//! Session cookie middleware and identity extractors.
//!
//! DESIGN
//! ======
//! `resolve_session` runs in front of every screen. It resolves the
//! `session_id` cookie to a live slot and hands the id (if any) to handlers
//! through a request extension. It never opens a slot: handlers that need to
//! remember something for an anonymous browser (sign-in, a queued notice)
//! open one and attach an `IssuedSession` to their response, which the
//! middleware turns into the cookie. Extractors then read identity:
//!
//! - `Visitor`: anyone; identity optional.
//! - `SignedIn`: identity required; anonymous visitors are redirected to
//!   `/signin`.

use axum::Extension;
use axum::extract::{FromRef, FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::gateway::GatewayError;
use crate::pages::PageContext;
use crate::state::AppState;
use crate::state::session::{Notice, SessionIdentity};

pub const SESSION_COOKIE: &str = "session_id";

/// Shown after a stale bearer token forced a sign-out.
pub const SESSION_EXPIRED_TEXT: &str = "Your session has expired. Please sign in again.";

/// Live session id resolved by `resolve_session`; `None` when the browser
/// has no session (or its cookie names one that was swept or dropped).
#[derive(Clone, Debug)]
pub struct SessionId(pub Option<String>);

/// Response extension: the browser must adopt this session id.
#[derive(Clone, Debug)]
pub struct IssuedSession(pub String);

pub(crate) fn session_cookie(id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Attach `response` to a newly issued session id, when there is one.
pub(crate) fn issue(issued: Option<String>, response: impl IntoResponse) -> Response {
    match issued {
        Some(id) => (Extension(IssuedSession(id)), response).into_response(),
        None => response.into_response(),
    }
}

/// Resolve the session cookie for every request and set the cookie for any
/// session a handler issued.
pub async fn resolve_session(State(state): State<AppState>, jar: CookieJar, mut req: Request, next: Next) -> Response {
    let live = match jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) {
        Some(id) if state.sessions.touch(&id).await => Some(id),
        _ => None,
    };

    req.extensions_mut().insert(SessionId(live));
    let mut response = next.run(req).await;
    match response.extensions_mut().remove::<IssuedSession>() {
        Some(IssuedSession(id)) => (jar.add(session_cookie(id, state.config.cookie_secure)), response).into_response(),
        None => response,
    }
}

fn session_id(parts: &Parts) -> Result<Option<String>, Response> {
    parts
        .extensions
        .get::<SessionId>()
        .map(|id| id.0.clone())
        .ok_or_else(|| {
            tracing::error!("session middleware missing from route");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

// =============================================================================
// EXTRACTORS
// =============================================================================

/// Any visitor, signed in or not.
pub struct Visitor {
    pub session_id: Option<String>,
    pub identity: Option<SessionIdentity>,
}

impl<S> FromRequestParts<S> for Visitor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session_id = session_id(parts)?;
        let identity = match &session_id {
            Some(id) => AppState::from_ref(state).sessions.identity(id).await,
            None => None,
        };
        Ok(Self { session_id, identity })
    }
}

impl Visitor {
    /// Page chrome for this visitor. Consumes the pending notice.
    pub async fn page(&self, state: &AppState) -> PageContext {
        let notice = match &self.session_id {
            Some(id) => state.sessions.take_notice(id).await,
            None => None,
        };
        PageContext {
            viewer: self.identity.as_ref().map(SessionIdentity::viewer),
            notices: notice.into_iter().collect(),
        }
    }

    /// Queue `notice` and redirect to `to`, opening a session if needed.
    pub async fn notify(&self, state: &AppState, notice: Notice, to: &str) -> Response {
        let issued = state.sessions.flash(self.session_id.as_deref(), notice).await;
        issue(issued, Redirect::to(to))
    }

    /// Adopt `identity` under a freshly issued session id and redirect to `to`.
    pub async fn sign_in(&self, state: &AppState, identity: SessionIdentity, to: &str) -> Response {
        let id = state.sessions.sign_in(self.session_id.as_deref(), identity).await;
        issue(Some(id), Redirect::to(to))
    }
}

/// A visitor with a backend identity. Rejects with a redirect to `/signin`.
pub struct SignedIn {
    pub session_id: String,
    pub identity: SessionIdentity,
}

impl<S> FromRequestParts<S> for SignedIn
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(session_id) = session_id(parts)? else {
            return Err(Redirect::to("/signin").into_response());
        };
        let app_state = AppState::from_ref(state);
        match app_state.sessions.identity(&session_id).await {
            Some(identity) => Ok(Self { session_id, identity }),
            None => Err(Redirect::to("/signin").into_response()),
        }
    }
}

impl SignedIn {
    /// Page chrome for this visitor. Consumes the pending notice.
    pub async fn page(&self, state: &AppState) -> PageContext {
        PageContext {
            viewer: Some(self.identity.viewer()),
            notices: state.sessions.take_notice(&self.session_id).await.into_iter().collect(),
        }
    }

    /// Queue `notice` and redirect to `to` (post-redirect-get).
    pub async fn notify(&self, state: &AppState, notice: Notice, to: &str) -> Response {
        state.sessions.set_notice(&self.session_id, notice).await;
        Redirect::to(to).into_response()
    }

    /// Turn a failed authenticated call into a response. A stale token (401)
    /// signs the session out and sends the visitor to `/signin`; anything
    /// else, including a 403, becomes an error notice on `back`.
    pub async fn fail(&self, state: &AppState, err: &GatewayError, back: &str) -> Response {
        if err.is_unauthorized() {
            return self.expire(state).await;
        }
        self.notify(state, Notice::error(err.user_message()), back).await
    }

    /// Clear the session's identity after the backend rejected its token.
    pub async fn expire(&self, state: &AppState) -> Response {
        tracing::info!(user_id = %self.identity.user_id, "bearer token rejected; signing session out");
        state.sessions.sign_out(&self.session_id).await;
        self.notify(state, Notice::error(SESSION_EXPIRED_TEXT), "/signin").await
    }
}
