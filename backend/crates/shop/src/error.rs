//! Shop Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use auth::AuthError;

/// Shop-specific result type alias
pub type ShopResult<T> = Result<T, ShopError>;

/// Shop-specific error variants
#[derive(Debug, Error)]
pub enum ShopError {
    /// Checkout attempted with nothing to order
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Product or order not found
    #[error("Resource not found")]
    NotFound,

    /// Resource exists but belongs to someone else
    #[error("You are not allowed to access this resource")]
    Forbidden,

    /// Concurrent update lost to another request, retry exhausted
    #[error("The resource was modified concurrently")]
    Conflict,

    /// Input validation error
    #[error("{0}")]
    Validation(String),

    /// Error raised by the auth layer (guards, user lookups)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::EmptyCart | ShopError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShopError::NotFound => StatusCode::NOT_FOUND,
            ShopError::Forbidden => StatusCode::FORBIDDEN,
            ShopError::Conflict => StatusCode::CONFLICT,
            ShopError::Auth(e) => e.status_code(),
            ShopError::Database(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::EmptyCart | ShopError::Validation(_) => ErrorKind::UnprocessableEntity,
            ShopError::NotFound => ErrorKind::NotFound,
            ShopError::Forbidden => ErrorKind::Forbidden,
            ShopError::Conflict => ErrorKind::Conflict,
            ShopError::Auth(e) => e.kind(),
            ShopError::Database(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
                _ => ErrorKind::InternalServerError,
            },
            ShopError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic client message; the detail only
    /// goes to the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ShopError::Auth(e) => e.to_app_error(),
            ShopError::Database(_) | ShopError::Internal(_) => {
                AppError::new(self.kind(), "An internal error occurred")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ShopError::Database(e) => {
                tracing::error!(error = %e, "Shop database error");
            }
            ShopError::Internal(msg) => {
                tracing::error!(message = %msg, "Shop internal error");
            }
            ShopError::Conflict => {
                tracing::warn!("Concurrent update conflict after retry");
            }
            ShopError::Forbidden => {
                tracing::warn!("Cross-user access attempt rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Shop error");
            }
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        match self {
            // Let the auth error keep its own logging
            ShopError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}
