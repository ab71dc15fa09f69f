//! Order Entity
//!
//! Orders are snapshots: each line copies the product's title and price at
//! checkout time. Later catalog edits or deletions never change what a
//! past order says.

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use auth::domain::value_object::Email;

use crate::domain::entity::product::Product;

/// Who placed the order, captured at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchaser {
    pub user_id: UserId,
    pub email: Email,
}

/// One ordered product: catalog data frozen at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    /// Freeze a product into an order line
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.product_id,
            title: product.title.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    /// Line subtotal: unit price times quantity
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Placed order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: OrderId,
    pub purchaser: Purchaser,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(purchaser: Purchaser, lines: Vec<OrderLine>) -> Self {
        Self {
            order_id: OrderId::new(),
            purchaser,
            lines,
            created_at: Utc::now(),
        }
    }

    /// Order total over all lines
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }
}
