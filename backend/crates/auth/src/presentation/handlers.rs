//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::notify::WelcomeNotifier;
use crate::application::{
    CheckSessionUseCase, LogInInput, LogInUseCase, LogOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LogInRequest, LogInResponse, SessionStatusResponse, SignUpRequest, SignUpResponse,
    TokenResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub notifier: Arc<dyn WelcomeNotifier>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let input = SignUpInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_id: output.user_id.to_string(),
        }),
    ))
}

// ============================================================================
// Log In
// ============================================================================

/// POST /api/auth/login
pub async fn log_in<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LogInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = LogInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    let cookie = state
        .config
        .cookie
        .build_set_cookie(&output.session_token, state.config.session_ttl_secs());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogInResponse {
            user_id: output.user_id.to_string(),
            csrf_token: output.csrf_token,
            expires_at_ms: output.expires_at_ms,
        }),
    ))
}

// ============================================================================
// Log Out
// ============================================================================

/// POST /api/auth/logout
///
/// Idempotent: succeeds and clears the cookie whether or not a live
/// session was attached.
pub async fn log_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.cookie.name) {
        let use_case = LogOutUseCase::new(state.repo.clone(), state.config.clone());
        use_case.execute(&token).await?;
    }

    let cookie = state.config.cookie.build_delete_cookie();

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
///
/// Never fails: an anonymous or expired caller gets
/// `{"authenticated": false}`.
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let Some(token) = extract_cookie(&headers, &state.config.cookie.name) else {
        return Json(SessionStatusResponse::anonymous());
    };

    let use_case =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    match use_case.authenticate(&token).await {
        Ok((session, user)) => Json(SessionStatusResponse {
            authenticated: true,
            user_id: Some(user.user_id.to_string()),
            email: Some(user.email.to_string()),
            csrf_token: Some(session.csrf_token),
            expires_at_ms: Some(session.expires_at_ms),
        }),
        Err(_) => Json(SessionStatusResponse::anonymous()),
    }
}

// ============================================================================
// Bearer Token Issuance
// ============================================================================

/// POST /api/auth/token
pub async fn issue_token<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LogInRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = LogInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.issue_token(input).await?;

    Ok(Json(TokenResponse {
        user_id: output.user_id.to_string(),
        token: output.token,
        expires_at_ms: output.expires_at_ms,
    }))
}
