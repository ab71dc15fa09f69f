//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::cart::Cart;
use crate::domain::value_object::email::Email;

/// User account
///
/// The cart lives on the user record together with `cart_version`, a
/// monotonically increasing counter bumped on every committed cart write.
/// Writers pass the version they read; a mismatch means another request
/// got there first.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub cart: Cart,
    pub cart_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with an empty cart
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            cart: Cart::empty(),
            cart_version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
