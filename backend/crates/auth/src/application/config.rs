//! Auth Configuration

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto;

/// Default session lifetime: 24 hours
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default bearer token lifetime: 1 hour
const DEFAULT_BEARER_TTL: Duration = Duration::from_secs(60 * 60);

/// Auth configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie attributes (name, Secure, HttpOnly, SameSite, Path)
    pub cookie: CookieConfig,

    /// HMAC key for session and bearer tokens
    pub token_secret: [u8; 32],

    /// Server-side session lifetime
    pub session_ttl: Duration,

    /// Embedded bearer token lifetime
    pub bearer_ttl: Duration,

    /// Optional application-wide password pepper
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Production configuration with an explicit token secret
    pub fn new(token_secret: [u8; 32]) -> Self {
        Self {
            cookie: CookieConfig::default(),
            token_secret,
            session_ttl: DEFAULT_SESSION_TTL,
            bearer_ttl: DEFAULT_BEARER_TTL,
            password_pepper: None,
        }
    }

    /// Development/test configuration: random secret, non-Secure cookie
    ///
    /// A random secret invalidates all outstanding tokens on restart, which
    /// is fine for local runs but wrong for production.
    pub fn development() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&crypto::random_bytes(32));

        Self {
            cookie: CookieConfig {
                secure: false,
                ..CookieConfig::default()
            },
            token_secret: secret,
            session_ttl: DEFAULT_SESSION_TTL,
            bearer_ttl: DEFAULT_BEARER_TTL,
            password_pepper: None,
        }
    }

    /// Session TTL in whole seconds, for the cookie Max-Age
    pub fn session_ttl_secs(&self) -> u64 {
        self.session_ttl.as_secs()
    }

    /// Pepper as a byte slice, if configured
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
