//! Domain Entities

pub mod cart;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use session::Session;
pub use user::User;
