//! Checkout Use Case
//!
//! Turns the cart into an order. Each line freezes the product's title
//! and price; cart entries whose product has been deleted are skipped.
//! Order creation and the cart clear commit together or not at all.

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use kernel::id::UserId;

use crate::domain::entity::{Order, OrderLine, Purchaser};
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::error::{ShopError, ShopResult};

/// One initial attempt plus one retry on a cart version conflict
const CHECKOUT_ATTEMPTS: u32 = 2;

/// Checkout use case
pub struct CheckoutUseCase<U, P, O>
where
    U: UserRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    user_repo: Arc<U>,
    product_repo: Arc<P>,
    order_repo: Arc<O>,
}

impl<U, P, O> CheckoutUseCase<U, P, O>
where
    U: UserRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    pub fn new(user_repo: Arc<U>, product_repo: Arc<P>, order_repo: Arc<O>) -> Self {
        Self {
            user_repo,
            product_repo,
            order_repo,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> ShopResult<Order> {
        for attempt in 0..CHECKOUT_ATTEMPTS {
            let user = self
                .user_repo
                .find_by_id(user_id)
                .await
                .map_err(ShopError::Auth)?
                .ok_or(ShopError::NotFound)?;

            if user.cart.is_empty() {
                return Err(ShopError::EmptyCart);
            }

            // Snapshot each live product; deleted ones silently drop out
            let mut lines = Vec::with_capacity(user.cart.len());
            for item in user.cart.items() {
                match self.product_repo.find_by_id(&item.product_id).await? {
                    Some(product) => lines.push(OrderLine::snapshot(&product, item.quantity)),
                    None => {
                        tracing::debug!(
                            product_id = %item.product_id,
                            "Skipping cart entry for deleted product"
                        );
                    }
                }
            }

            if lines.is_empty() {
                return Err(ShopError::EmptyCart);
            }

            let order = Order::new(
                Purchaser {
                    user_id: user.user_id,
                    email: user.email.clone(),
                },
                lines,
            );

            if self
                .order_repo
                .create_with_cart_clear(&order, user.cart_version)
                .await?
            {
                tracing::info!(
                    order_id = %order.order_id,
                    user_id = %user.user_id,
                    total = %order.total(),
                    "Checkout completed"
                );
                return Ok(order);
            }

            tracing::debug!(user_id = %user_id, attempt, "Checkout lost a cart race, retrying");
        }

        Err(ShopError::Conflict)
    }

    /// Order history for a user, newest first
    pub async fn orders(&self, user_id: &UserId) -> ShopResult<Vec<Order>> {
        self.order_repo.find_by_user(user_id).await
    }
}
