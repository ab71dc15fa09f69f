//! Shop Configuration

/// Default catalog page size
const DEFAULT_ITEMS_PER_PAGE: u64 = 8;

/// Shop configuration
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Products per catalog page
    pub items_per_page: u64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}
