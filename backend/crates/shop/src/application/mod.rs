//! Application Layer - Use Cases

pub mod cart;
pub mod checkout;
pub mod config;
pub mod invoice;
pub mod products;

pub use cart::CartUseCase;
pub use checkout::CheckoutUseCase;
pub use config::ShopConfig;
pub use invoice::{InvoiceDocument, InvoiceUseCase};
pub use products::{ProductInput, ProductPage, ProductUseCase};
