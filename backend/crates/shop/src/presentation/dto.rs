//! Data Transfer Objects

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use auth::domain::entity::Cart;

use crate::application::ProductPage;
use crate::domain::entity::{Order, OrderLine, Product};

// ============================================================================
// Products
// ============================================================================

/// Product create/update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// Product response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: String,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id.to_string(),
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Catalog page query: `?page=2`
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

/// Paginated catalog response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub current_page: u64,
    pub last_page: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<&ProductPage> for ProductListResponse {
    fn from(page: &ProductPage) -> Self {
        Self {
            products: page.products.iter().map(ProductResponse::from).collect(),
            current_page: page.current_page,
            last_page: page.last_page,
            has_previous_page: page.has_previous_page,
            has_next_page: page.has_next_page,
        }
    }
}

// ============================================================================
// Cart
// ============================================================================

/// Cart mutation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    pub product_id: String,
}

/// Cart contents response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub product_id: String,
    pub quantity: u32,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemResponse {
                    product_id: item.product_id.to_string(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Order response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    pub lines: Vec<OrderLineResponse>,
    pub total: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product_id: String,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            title: line.title.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.subtotal(),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            lines: order.lines.iter().map(OrderLineResponse::from).collect(),
            total: order.total(),
            created_at: order.created_at,
        }
    }
}
