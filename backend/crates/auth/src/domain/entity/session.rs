//! Session Entity
//!
//! Server-side session record. The client only ever holds an HMAC-signed
//! token wrapping `session_id`; expiry and the CSRF token live here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::crypto;
use uuid::Uuid;

/// Bytes of entropy in a CSRF token
const CSRF_TOKEN_BYTES: usize = 32;

/// Authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: UserId,
    /// Per-session anti-forgery token, compared against the value echoed
    /// back by state-changing requests
    pub csrf_token: String,
    /// Expiry as Unix milliseconds
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session expiring `ttl` from now
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            user_id,
            csrf_token: crypto::random_token(CSRF_TOKEN_BYTES),
            expires_at_ms: now.timestamp_millis() + ttl.as_millis() as i64,
            created_at: now,
        }
    }

    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_not_expired() {
        let session = Session::new(UserId::new(), Duration::from_secs(60));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_session() {
        let mut session = Session::new(UserId::new(), Duration::from_secs(60));
        session.expires_at_ms = Utc::now().timestamp_millis() - 1;
        assert!(session.is_expired());
    }

    #[test]
    fn test_csrf_tokens_are_unique() {
        let a = Session::new(UserId::new(), Duration::from_secs(60));
        let b = Session::new(UserId::new(), Duration::from_secs(60));
        assert_ne!(a.csrf_token, b.csrf_token);
    }
}
