//! HMAC-Signed Tokens
//!
//! Two token shapes share one signing scheme (HMAC-SHA256, URL-safe base64
//! signatures):
//!
//! - **Opaque tokens** (`value.sig`) — the session cookie. The value is an
//!   opaque id; expiry lives server-side on the session record.
//! - **Expiring tokens** (`subject.expires_ms.sig`) — the API bearer token.
//!   Expiry is embedded and verified against the caller's clock, so no
//!   server-side record is needed.
//!
//! Verification is constant-time via `Mac::verify_slice`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Token verification errors
///
/// Deliberately coarse: callers map all variants to the same
/// "unauthenticated" response so nothing is leaked about why a token
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,
}

/// Claims carried by an expiring token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub expires_at_ms: i64,
}

fn mac(secret: &[u8; 32]) -> HmacSha256 {
    // HMAC accepts keys of any length; 32 bytes cannot fail
    HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size")
}

fn sign_payload(secret: &[u8; 32], payload: &str) -> String {
    let mut m = mac(secret);
    m.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(m.finalize().into_bytes())
}

fn verify_payload(secret: &[u8; 32], payload: &str, sig_b64: &str) -> Result<(), TokenError> {
    let signature = URL_SAFE_NO_PAD
        .decode(sig_b64)
        .map_err(|_| TokenError::Malformed)?;

    let mut m = mac(secret);
    m.update(payload.as_bytes());
    m.verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)
}

// ============================================================================
// Opaque tokens (session cookie)
// ============================================================================

/// Sign an opaque value: `value.sig`
///
/// The value must not contain `.` (session ids are UUIDs, which do not).
pub fn sign_opaque(secret: &[u8; 32], value: &str) -> String {
    format!("{}.{}", value, sign_payload(secret, value))
}

/// Verify an opaque token and return the signed value
pub fn verify_opaque(secret: &[u8; 32], token: &str) -> Result<String, TokenError> {
    let (value, sig) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
    verify_payload(secret, value, sig)?;
    Ok(value.to_string())
}

// ============================================================================
// Expiring tokens (API bearer)
// ============================================================================

/// Sign a subject with an embedded expiry: `subject.expires_ms.sig`
pub fn sign_expiring(secret: &[u8; 32], subject: &str, expires_at_ms: i64) -> String {
    let payload = format!("{}.{}", subject, expires_at_ms);
    let sig = sign_payload(secret, &payload);
    format!("{}.{}", payload, sig)
}

/// Verify an expiring token against `now_ms` and return its claims
pub fn verify_expiring(
    secret: &[u8; 32],
    token: &str,
    now_ms: i64,
) -> Result<TokenClaims, TokenError> {
    let (payload, sig) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
    verify_payload(secret, payload, sig)?;

    let (subject, expires_str) = payload.rsplit_once('.').ok_or(TokenError::Malformed)?;
    let expires_at_ms: i64 = expires_str.parse().map_err(|_| TokenError::Malformed)?;

    if now_ms > expires_at_ms {
        return Err(TokenError::Expired);
    }

    Ok(TokenClaims {
        subject: subject.to_string(),
        expires_at_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];
    const OTHER_SECRET: [u8; 32] = [8u8; 32];

    #[test]
    fn test_opaque_roundtrip() {
        let token = sign_opaque(&SECRET, "d6a7c18e-1111-4222-8333-444455556666");
        let value = verify_opaque(&SECRET, &token).unwrap();
        assert_eq!(value, "d6a7c18e-1111-4222-8333-444455556666");
    }

    #[test]
    fn test_opaque_rejects_tampering() {
        let token = sign_opaque(&SECRET, "session-id");

        // Flipped value
        let forged = token.replacen("session-id", "other-id", 1);
        assert_eq!(
            verify_opaque(&SECRET, &forged),
            Err(TokenError::BadSignature)
        );

        // Wrong key
        assert_eq!(
            verify_opaque(&OTHER_SECRET, &token),
            Err(TokenError::BadSignature)
        );

        // No separator at all
        assert_eq!(
            verify_opaque(&SECRET, "garbage-without-dot"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_expiring_roundtrip() {
        let token = sign_expiring(&SECRET, "user-1", 10_000);
        let claims = verify_expiring(&SECRET, &token, 9_999).unwrap();
        assert_eq!(claims.subject, "user-1");
        assert_eq!(claims.expires_at_ms, 10_000);
    }

    #[test]
    fn test_expiring_rejects_expired() {
        let token = sign_expiring(&SECRET, "user-1", 10_000);
        assert_eq!(
            verify_expiring(&SECRET, &token, 10_001),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expiring_rejects_extended_expiry() {
        // An attacker rewriting the expiry must invalidate the signature
        let token = sign_expiring(&SECRET, "user-1", 10_000);
        let forged = token.replacen("10000", "99999", 1);
        assert_eq!(
            verify_expiring(&SECRET, &forged, 0),
            Err(TokenError::BadSignature)
        );
    }
}
