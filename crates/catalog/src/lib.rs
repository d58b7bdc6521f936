//! Catalog domain module.
//!
//! Products sellers list in the storefront, plus the [`Priced`] contract the
//! bundle pricing engine consumes. Pure domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod product;

pub use item::{ItemId, Priced, placeholder_image};
pub use product::{
    CreateProduct, DeleteProduct, Product, ProductCommand, ProductCreated, ProductDeleted,
    ProductEvent, ProductId, ProductUpdated, UpdateProduct,
};
