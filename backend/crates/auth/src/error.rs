//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email address already registered
    #[error("Email address already registered")]
    EmailTaken,

    /// Wrong password or unknown email. One variant for both so responses
    /// cannot be used to probe which addresses exist.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No valid session or bearer token on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    /// Anti-forgery check failed on a state-changing request
    #[error("Request could not be verified")]
    ForbiddenRequest,

    /// Input validation error (email format etc.)
    #[error("{0}")]
    Validation(String),

    /// Password policy violation
    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    /// Concurrent update lost to another request
    #[error("The resource was modified concurrently")]
    Conflict,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken | AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::ForbiddenRequest => StatusCode::FORBIDDEN,
            AuthError::Validation(_) | AuthError::PasswordPolicy(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AuthError::Database(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::Conflict => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::ForbiddenRequest => ErrorKind::Forbidden,
            AuthError::Validation(_) | AuthError::PasswordPolicy(_) => {
                ErrorKind::UnprocessableEntity
            }
            AuthError::Database(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
                _ => ErrorKind::InternalServerError,
            },
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic client message; the detail only
    /// goes to the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "An internal error occurred")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::ForbiddenRequest => {
                tracing::warn!("Rejected request with missing or invalid CSRF token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
