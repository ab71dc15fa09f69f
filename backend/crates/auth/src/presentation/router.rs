//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::notify::WelcomeNotifier;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(
    repo: PgAuthRepository,
    config: AuthConfig,
    notifier: Arc<dyn WelcomeNotifier>,
) -> Router {
    auth_router_generic(repo, config, notifier)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(
    repo: R,
    config: AuthConfig,
    notifier: Arc<dyn WelcomeNotifier>,
) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        notifier,
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::log_in::<R>))
        .route("/logout", post(handlers::log_out::<R>))
        .route("/session", get(handlers::session_status::<R>))
        .route("/token", post(handlers::issue_token::<R>))
        .with_state(state)
}
