//! Request Guards
//!
//! Three axum middleware layers protect the authenticated surfaces:
//!
//! - [`require_session`] resolves the session cookie and injects
//!   [`CurrentUser`] and [`SessionContext`] extensions.
//! - [`require_bearer`] does the same from an `Authorization: Bearer`
//!   header (no session record, no CSRF).
//! - [`require_csrf`] rejects state-changing requests whose CSRF token
//!   does not match the session's. It runs after `require_session`.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;

use platform::cookie::extract_cookie;
use platform::crypto::constant_time_eq;
use uuid::Uuid;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::AuthError;
use kernel::id::UserId;

/// Largest request body the CSRF guard will buffer when falling back to
/// the JSON `csrfToken` field
const CSRF_BODY_LIMIT: usize = 256 * 1024;

/// State for the session and bearer guards
#[derive(Clone)]
pub struct AuthGuardState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Authenticated user, injected as a request extension by the guards
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: Email,
}

/// Resolved session, injected by [`require_session`] only
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub csrf_token: String,
}

/// Reject requests without a valid session cookie
pub async fn require_session<R>(
    State(state): State<AuthGuardState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.cookie.name)
        .ok_or(AuthError::Unauthenticated)?;

    let use_case =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let (session, user) = use_case.authenticate(&token).await?;

    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        email: user.email,
    });
    req.extensions_mut().insert(SessionContext {
        session_id: session.session_id,
        csrf_token: session.csrf_token,
    });

    Ok(next.run(req).await)
}

/// Reject requests without a valid bearer token
pub async fn require_bearer<R>(
    State(state): State<AuthGuardState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::Unauthenticated)?
        .to_string();

    let use_case =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let user = use_case.authenticate_bearer(&token).await?;

    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        email: user.email,
    });

    Ok(next.run(req).await)
}

/// Reject state-changing requests without the session's CSRF token
///
/// The token is taken from the `X-Csrf-Token` header when present,
/// otherwise from a `csrfToken` field in a JSON body. Reads pass through
/// untouched.
pub async fn require_csrf(req: Request, next: Next) -> Result<Response, AuthError> {
    if !matches!(
        *req.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    ) {
        return Ok(next.run(req).await);
    }

    // require_session ran first and attached the session
    let expected = req
        .extensions()
        .get::<SessionContext>()
        .map(|ctx| ctx.csrf_token.clone())
        .ok_or(AuthError::ForbiddenRequest)?;

    if let Some(submitted) = req
        .headers()
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
    {
        if constant_time_eq(submitted.as_bytes(), expected.as_bytes()) {
            return Ok(next.run(req).await);
        }
        return Err(AuthError::ForbiddenRequest);
    }

    // No header: buffer the body and look for a csrfToken field, then
    // reassemble the request for the handler
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, CSRF_BODY_LIMIT)
        .await
        .map_err(|_| AuthError::ForbiddenRequest)?;

    let submitted = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| v.get("csrfToken").and_then(|t| t.as_str().map(String::from)));

    let req = Request::from_parts(parts, Body::from(bytes));

    match submitted {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => {
            Ok(next.run(req).await)
        }
        _ => Err(AuthError::ForbiddenRequest),
    }
}
