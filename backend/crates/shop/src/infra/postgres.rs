//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use auth::domain::entity::Cart;
use auth::domain::value_object::Email;
use kernel::id::{OrderId, ProductId, UserId};

use crate::domain::entity::{Order, OrderLine, Product, Purchaser};
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::error::ShopResult;

/// PostgreSQL-backed shop repository
#[derive(Clone)]
pub struct PgShopRepository {
    pool: PgPool,
}

impl PgShopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    title: String,
    price: Decimal,
    description: String,
    image_url: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: ProductId::from_uuid(self.product_id),
            title: self.title,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            owner_id: UserId::from_uuid(self.owner_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    user_id: Uuid,
    email: String,
    lines: Json<Vec<OrderLine>>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            order_id: OrderId::from_uuid(self.order_id),
            purchaser: Purchaser {
                user_id: UserId::from_uuid(self.user_id),
                email: Email::from_db(self.email),
            },
            lines: self.lines.0,
            created_at: self.created_at,
        }
    }
}

// ============================================================================
// ProductRepository
// ============================================================================

impl ProductRepository for PgShopRepository {
    async fn create(&self, product: &Product) -> ShopResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (product_id, title, price, description, image_url, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(&product.title)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.owner_id.as_uuid())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> ShopResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, title, price, description, image_url, owner_id, created_at, updated_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn list_page(&self, offset: u64, limit: u64) -> ShopResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, title, price, description, image_url, owner_id, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, product_id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn count(&self) -> ShopResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn update(&self, product: &Product) -> ShopResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = $2, price = $3, description = $4, image_url = $5, updated_at = $6
            WHERE product_id = $1
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(&product.title)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, product_id: &ProductId) -> ShopResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// OrderRepository
// ============================================================================

impl OrderRepository for PgShopRepository {
    async fn create_with_cart_clear(
        &self,
        order: &Order,
        expected_cart_version: i64,
    ) -> ShopResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (order_id, user_id, email, lines, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.purchaser.user_id.as_uuid())
        .bind(order.purchaser.email.as_str())
        .bind(Json(&order.lines))
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET cart = $2, cart_version = cart_version + 1, updated_at = $3
            WHERE user_id = $1 AND cart_version = $4
            "#,
        )
        .bind(order.purchaser.user_id.as_uuid())
        .bind(Json(Cart::empty()))
        .bind(Utc::now())
        .bind(expected_cart_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 1 {
            tx.commit().await?;
            Ok(true)
        } else {
            // Lost the cart race: drop the order insert with the rollback
            tx.rollback().await?;
            Ok(false)
        }
    }

    async fn find_by_id(&self, order_id: &OrderId) -> ShopResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT order_id, user_id, email, lines, created_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OrderRow::into_order))
    }

    async fn find_by_user(&self, user_id: &UserId) -> ShopResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT order_id, user_id, email, lines, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }
}
