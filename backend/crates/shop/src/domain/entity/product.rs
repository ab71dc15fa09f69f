//! Product Entity

use chrono::{DateTime, Utc};
use kernel::id::{ProductId, UserId};
use rust_decimal::Decimal;

use crate::error::{ShopError, ShopResult};

/// Maximum product title length
const TITLE_MAX_LENGTH: usize = 200;

/// Catalog product
///
/// `owner_id` scopes management: only the user who created a product may
/// edit or delete it. Anyone may view and buy it.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with validation
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        price: Decimal,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> ShopResult<Self> {
        let title = title.into().trim().to_string();
        let description = description.into();
        let image_url = image_url.into();

        Self::validate(&title, price)?;

        let now = Utc::now();
        Ok(Self {
            product_id: ProductId::new(),
            title,
            price,
            description,
            image_url,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// A new value with the editable fields replaced and re-validated
    pub fn edited(
        &self,
        title: impl Into<String>,
        price: Decimal,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> ShopResult<Product> {
        let title = title.into().trim().to_string();
        Self::validate(&title, price)?;

        Ok(Product {
            product_id: self.product_id,
            title,
            price,
            description: description.into(),
            image_url: image_url.into(),
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }

    fn validate(title: &str, price: Decimal) -> ShopResult<()> {
        if title.is_empty() {
            return Err(ShopError::Validation("Title cannot be empty".to_string()));
        }
        if title.len() > TITLE_MAX_LENGTH {
            return Err(ShopError::Validation(format!(
                "Title must be at most {} characters",
                TITLE_MAX_LENGTH
            )));
        }
        if price < Decimal::ZERO {
            return Err(ShopError::Validation(
                "Price cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Product {
        Product::new(
            UserId::new(),
            "Book",
            dec!(12.50),
            "A very good book",
            "https://example.com/book.png",
        )
        .unwrap()
    }

    #[test]
    fn test_validation() {
        let owner = UserId::new();
        assert!(matches!(
            Product::new(owner, "   ", dec!(1.00), "", ""),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            Product::new(owner, "Book", dec!(-0.01), "", ""),
            Err(ShopError::Validation(_))
        ));
        assert!(Product::new(owner, "Free sample", Decimal::ZERO, "", "").is_ok());
    }

    #[test]
    fn test_edited_preserves_identity_and_owner() {
        let product = sample();
        let edited = product
            .edited("Better Book", dec!(15.00), "desc", "img")
            .unwrap();

        assert_eq!(edited.product_id, product.product_id);
        assert_eq!(edited.owner_id, product.owner_id);
        assert_eq!(edited.created_at, product.created_at);
        assert_eq!(edited.title, "Better Book");
        assert_eq!(edited.price, dec!(15.00));
        // The original value is untouched
        assert_eq!(product.title, "Book");
    }

    #[test]
    fn test_edited_revalidates() {
        let product = sample();
        assert!(matches!(
            product.edited("", dec!(1.00), "", ""),
            Err(ShopError::Validation(_))
        ));
    }
}
