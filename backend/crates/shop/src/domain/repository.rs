//! Repository Traits

use kernel::id::{OrderId, ProductId, UserId};

use crate::domain::entity::{Order, Product};
use crate::error::ShopResult;

/// Product catalog persistence operations
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// Persist a new product
    async fn create(&self, product: &Product) -> ShopResult<()>;

    /// Find a product by id
    async fn find_by_id(&self, product_id: &ProductId) -> ShopResult<Option<Product>>;

    /// One page of the catalog, newest first
    async fn list_page(&self, offset: u64, limit: u64) -> ShopResult<Vec<Product>>;

    /// Total number of products
    async fn count(&self) -> ShopResult<u64>;

    /// Replace a product; `false` when it no longer exists
    async fn update(&self, product: &Product) -> ShopResult<bool>;

    /// Delete a product; `false` when it no longer exists
    async fn delete(&self, product_id: &ProductId) -> ShopResult<bool>;
}

/// Order persistence operations
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    /// Persist the order and clear the purchaser's cart in one transaction
    ///
    /// The cart clear is version-checked; `false` means another request
    /// changed the cart first, and nothing was written.
    async fn create_with_cart_clear(
        &self,
        order: &Order,
        expected_cart_version: i64,
    ) -> ShopResult<bool>;

    /// Find an order by id
    async fn find_by_id(&self, order_id: &OrderId) -> ShopResult<Option<Order>>;

    /// All orders placed by a user, newest first
    async fn find_by_user(&self, user_id: &UserId) -> ShopResult<Vec<Order>>;
}
