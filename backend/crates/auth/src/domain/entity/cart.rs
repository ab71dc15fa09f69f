//! Cart Entity
//!
//! A customer's shopping cart: product references with quantities, stored
//! on the user record. The cart is an immutable value - mutations return a
//! new `Cart` and are committed with a version check, so two interleaved
//! requests cannot silently overwrite each other.

use kernel::id::ProductId;
use serde::{Deserialize, Serialize};

/// One cart entry: a product reference and a quantity (always >= 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Shopping cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartItem>);

impl Cart {
    /// An empty cart
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Rebuild a cart from stored items, dropping zero-quantity entries
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self(items.into_iter().filter(|i| i.quantity > 0).collect())
    }

    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct products in the cart
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Quantity of a product, or `None` if it is not in the cart
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.0
            .iter()
            .find(|i| i.product_id == *product_id)
            .map(|i| i.quantity)
    }

    /// A new cart with one more of the given product
    ///
    /// Increments the quantity if the product is already present, otherwise
    /// appends a new entry with quantity 1.
    pub fn added(&self, product_id: ProductId) -> Cart {
        let mut items = self.0.clone();

        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.quantity += 1,
            None => items.push(CartItem {
                product_id,
                quantity: 1,
            }),
        }

        Cart(items)
    }

    /// A new cart without the given product (entire entry, not one unit)
    ///
    /// Removing an absent product is a no-op.
    pub fn removed(&self, product_id: &ProductId) -> Cart {
        Cart(
            self.0
                .iter()
                .filter(|i| i.product_id != *product_id)
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_new_product_starts_at_one() {
        let product = ProductId::new();
        let cart = Cart::empty().added(product.clone());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&product), Some(1));
    }

    #[test]
    fn test_add_existing_product_increments() {
        let product = ProductId::new();
        let cart = Cart::empty().added(product.clone()).added(product.clone());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&product), Some(2));
    }

    #[test]
    fn test_remove_drops_whole_entry() {
        let keep = ProductId::new();
        let drop = ProductId::new();
        let cart = Cart::empty()
            .added(keep.clone())
            .added(drop.clone())
            .added(drop.clone());

        let cart = cart.removed(&drop);
        assert_eq!(cart.quantity_of(&drop), None);
        assert_eq!(cart.quantity_of(&keep), Some(1));
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let product = ProductId::new();
        let cart = Cart::empty().added(product.clone());

        let unchanged = cart.removed(&ProductId::new());
        assert_eq!(unchanged, cart);
    }

    #[test]
    fn test_mutations_do_not_alias() {
        let product = ProductId::new();
        let original = Cart::empty().added(product.clone());
        let _ = original.added(product.clone());

        // The original is untouched by deriving a new cart from it
        assert_eq!(original.quantity_of(&product), Some(1));
    }

    #[test]
    fn test_from_items_drops_zero_quantities() {
        let product = ProductId::new();
        let cart = Cart::from_items(vec![
            CartItem {
                product_id: product.clone(),
                quantity: 0,
            },
            CartItem {
                product_id: ProductId::new(),
                quantity: 2,
            },
        ]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&product), None);
    }

    #[test]
    fn test_serde_shape() {
        let product = ProductId::new();
        let cart = Cart::empty().added(product.clone());
        let json = serde_json::to_value(&cart).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{ "productId": product.to_string(), "quantity": 1 }])
        );

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
