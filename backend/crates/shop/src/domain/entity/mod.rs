//! Domain Entities

pub mod order;
pub mod product;

pub use order::{Order, OrderLine, Purchaser};
pub use product::Product;
