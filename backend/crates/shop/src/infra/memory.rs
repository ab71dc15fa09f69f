//! In-Memory Repository Implementation
//!
//! Backing store for tests. Shares the auth crate's in-memory repository
//! so `create_with_cart_clear` can commit the order and the cart clear
//! under the user store's lock, like the PostgreSQL transaction does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use auth::infra::memory::InMemoryAuthRepository;
use kernel::id::{OrderId, ProductId, UserId};
use uuid::Uuid;

use crate::domain::entity::{Order, Product};
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::error::{ShopError, ShopResult};

#[derive(Default)]
struct Inner {
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
}

/// In-memory shop repository
#[derive(Clone)]
pub struct InMemoryShopRepository {
    inner: Arc<Mutex<Inner>>,
    users: InMemoryAuthRepository,
}

impl InMemoryShopRepository {
    /// Create a store sharing the given user repository
    pub fn new(users: InMemoryAuthRepository) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            users,
        }
    }

    fn lock(&self) -> ShopResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| ShopError::Internal("Repository lock poisoned".to_string()))
    }
}

impl ProductRepository for InMemoryShopRepository {
    async fn create(&self, product: &Product) -> ShopResult<()> {
        self.lock()?
            .products
            .insert(*product.product_id.as_uuid(), product.clone());
        Ok(())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> ShopResult<Option<Product>> {
        Ok(self.lock()?.products.get(product_id.as_uuid()).cloned())
    }

    async fn list_page(&self, offset: u64, limit: u64) -> ShopResult<Vec<Product>> {
        let mut products: Vec<Product> = self.lock()?.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(products
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> ShopResult<u64> {
        Ok(self.lock()?.products.len() as u64)
    }

    async fn update(&self, product: &Product) -> ShopResult<bool> {
        let mut inner = self.lock()?;

        if !inner.products.contains_key(product.product_id.as_uuid()) {
            return Ok(false);
        }

        inner
            .products
            .insert(*product.product_id.as_uuid(), product.clone());
        Ok(true)
    }

    async fn delete(&self, product_id: &ProductId) -> ShopResult<bool> {
        Ok(self.lock()?.products.remove(product_id.as_uuid()).is_some())
    }
}

impl OrderRepository for InMemoryShopRepository {
    async fn create_with_cart_clear(
        &self,
        order: &Order,
        expected_cart_version: i64,
    ) -> ShopResult<bool> {
        // Version check and cart clear first; only a winning write
        // persists the order
        let cleared = self
            .users
            .clear_cart_if_version(&order.purchaser.user_id, expected_cart_version)
            .map_err(ShopError::Auth)?;

        if !cleared {
            return Ok(false);
        }

        self.lock()?
            .orders
            .insert(*order.order_id.as_uuid(), order.clone());
        Ok(true)
    }

    async fn find_by_id(&self, order_id: &OrderId) -> ShopResult<Option<Order>> {
        Ok(self.lock()?.orders.get(order_id.as_uuid()).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> ShopResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .lock()?
            .orders
            .values()
            .filter(|o| o.purchaser.user_id == *user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders)
    }
}
