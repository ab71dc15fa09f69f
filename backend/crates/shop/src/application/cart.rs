//! Cart Use Case
//!
//! Cart writes are read-modify-write against the user record, committed
//! with a version check. A lost race is retried once with fresh state;
//! losing twice surfaces as a conflict.

use std::sync::Arc;

use auth::domain::entity::Cart;
use auth::domain::repository::UserRepository;
use kernel::id::{ProductId, UserId};

use crate::domain::repository::ProductRepository;
use crate::error::{ShopError, ShopResult};

/// One initial attempt plus one retry on a version conflict
const CART_WRITE_ATTEMPTS: u32 = 2;

/// Cart use case
pub struct CartUseCase<U, P>
where
    U: UserRepository,
    P: ProductRepository,
{
    user_repo: Arc<U>,
    product_repo: Arc<P>,
}

impl<U, P> CartUseCase<U, P>
where
    U: UserRepository,
    P: ProductRepository,
{
    pub fn new(user_repo: Arc<U>, product_repo: Arc<P>) -> Self {
        Self {
            user_repo,
            product_repo,
        }
    }

    /// Current cart contents
    pub async fn get(&self, user_id: &UserId) -> ShopResult<Cart> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(ShopError::Auth)?
            .ok_or(ShopError::NotFound)?;

        Ok(user.cart)
    }

    /// Add one unit of a product to the cart
    pub async fn add(&self, user_id: &UserId, product_id: &ProductId) -> ShopResult<Cart> {
        // The product must exist at the moment of adding
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(ShopError::NotFound)?;

        self.commit(user_id, |cart| cart.added(product.product_id))
            .await
    }

    /// Remove a product from the cart entirely
    pub async fn remove(&self, user_id: &UserId, product_id: &ProductId) -> ShopResult<Cart> {
        let product_id = *product_id;
        self.commit(user_id, |cart| cart.removed(&product_id)).await
    }

    /// Read the cart, apply `mutate`, write back with a version check
    async fn commit<F>(&self, user_id: &UserId, mutate: F) -> ShopResult<Cart>
    where
        F: Fn(&Cart) -> Cart,
    {
        for attempt in 0..CART_WRITE_ATTEMPTS {
            let user = self
                .user_repo
                .find_by_id(user_id)
                .await
                .map_err(ShopError::Auth)?
                .ok_or(ShopError::NotFound)?;

            let cart = mutate(&user.cart);

            if self
                .user_repo
                .update_cart(user_id, &cart, user.cart_version)
                .await
                .map_err(ShopError::Auth)?
            {
                return Ok(cart);
            }

            tracing::debug!(user_id = %user_id, attempt, "Cart version conflict, retrying");
        }

        Err(ShopError::Conflict)
    }
}
