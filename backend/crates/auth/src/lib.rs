//! Auth Crate - Accounts, Sessions and Request Guards
//!
//! Implements the customer-facing authentication flow:
//! - Sign up with Argon2id-hashed passwords and a welcome notification
//! - Cookie sessions (HMAC-signed opaque tokens, server-side expiry)
//! - Signed bearer tokens for the programmatic API surface
//! - Route guards: session, bearer and anti-forgery (CSRF) checks
//!
//! ## Architecture
//! Clean architecture layering:
//! - `domain`: entities, value objects, repository traits
//! - `application`: use cases
//! - `infra`: PostgreSQL and in-memory repositories, SMTP notifier
//! - `presentation`: HTTP handlers, middleware, routers, DTOs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
