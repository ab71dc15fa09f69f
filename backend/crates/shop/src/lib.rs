//! Shop Crate - Catalog, Cart and Orders
//!
//! The commerce workflow on top of the auth crate's accounts and guards:
//! - Product catalog with paginated listing and owner-scoped management
//! - Per-user cart (version-checked writes, no lost updates)
//! - Checkout: price-snapshotted orders, cart cleared in the same
//!   transaction
//! - PDF invoices, purchaser-only
//!
//! ## Architecture
//! Same layering as the auth crate: `domain` / `application` / `infra` /
//! `presentation`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use error::{ShopError, ShopResult};
pub use infra::postgres::PgShopRepository;
