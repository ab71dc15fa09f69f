//! Product Use Case
//!
//! Catalog browsing (public) and owner-scoped management.

use std::sync::Arc;

use kernel::id::{ProductId, UserId};
use rust_decimal::Decimal;

use crate::application::config::ShopConfig;
use crate::domain::entity::Product;
use crate::domain::repository::ProductRepository;
use crate::error::{ShopError, ShopResult};

/// Product create/update input
pub struct ProductInput {
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
}

/// One page of the catalog with navigation metadata
pub struct ProductPage {
    pub products: Vec<Product>,
    pub current_page: u64,
    pub last_page: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// Product use case
pub struct ProductUseCase<P>
where
    P: ProductRepository,
{
    product_repo: Arc<P>,
    config: Arc<ShopConfig>,
}

impl<P> ProductUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(product_repo: Arc<P>, config: Arc<ShopConfig>) -> Self {
        Self {
            product_repo,
            config,
        }
    }

    /// One catalog page; page numbers are 1-based and clamped to 1
    pub async fn list(&self, page: u64) -> ShopResult<ProductPage> {
        let page = page.max(1);
        let per_page = self.config.items_per_page;

        let total = self.product_repo.count().await?;
        let last_page = total.div_ceil(per_page).max(1);

        let products = self
            .product_repo
            .list_page((page - 1) * per_page, per_page)
            .await?;

        Ok(ProductPage {
            products,
            current_page: page,
            last_page,
            has_previous_page: page > 1,
            has_next_page: page < last_page,
        })
    }

    pub async fn get(&self, product_id: &ProductId) -> ShopResult<Product> {
        self.product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(ShopError::NotFound)
    }

    pub async fn create(&self, owner_id: &UserId, input: ProductInput) -> ShopResult<Product> {
        let product = Product::new(
            *owner_id,
            input.title,
            input.price,
            input.description,
            input.image_url,
        )?;

        self.product_repo.create(&product).await?;

        tracing::info!(product_id = %product.product_id, owner_id = %owner_id, "Product created");

        Ok(product)
    }

    /// Edit a product; only its owner may do this
    pub async fn update(
        &self,
        owner_id: &UserId,
        product_id: &ProductId,
        input: ProductInput,
    ) -> ShopResult<Product> {
        let existing = self.owned(owner_id, product_id).await?;

        let updated = existing.edited(input.title, input.price, input.description, input.image_url)?;

        if !self.product_repo.update(&updated).await? {
            return Err(ShopError::NotFound);
        }

        Ok(updated)
    }

    /// Delete a product; only its owner may do this
    ///
    /// Existing cart entries and order lines referencing the product are
    /// left alone: carts skip dead references at checkout, orders carry
    /// their own snapshots.
    pub async fn delete(&self, owner_id: &UserId, product_id: &ProductId) -> ShopResult<()> {
        self.owned(owner_id, product_id).await?;

        if !self.product_repo.delete(product_id).await? {
            return Err(ShopError::NotFound);
        }

        tracing::info!(product_id = %product_id, "Product deleted");

        Ok(())
    }

    async fn owned(&self, owner_id: &UserId, product_id: &ProductId) -> ShopResult<Product> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(ShopError::NotFound)?;

        if product.owner_id != *owner_id {
            return Err(ShopError::Forbidden);
        }

        Ok(product)
    }
}
