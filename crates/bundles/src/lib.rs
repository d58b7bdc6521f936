//! Bundles domain module.
//!
//! A bundle groups at least two distinct catalog items and is sold at a fixed
//! discount off the sum of their effective prices. Pure domain logic (no IO,
//! no HTTP, no storage).

pub mod bundle;
pub mod discount;
pub mod item;
pub mod pricing;

pub use bundle::{
    Bundle, BundleCommand, BundleCreated, BundleDeleted, BundleError, BundleEvent, BundleId,
    BundleStatus, BundleUpdated, CreateBundle, DeleteBundle, UpdateBundle,
};
pub use discount::DiscountReport;
pub use item::BundleItem;
pub use pricing::{
    BundleValidationError, DISCOUNT_PERCENTAGE, MIN_DISTINCT_ITEMS, PricingBreakdown,
    ValidationField, compute_pricing, distinct_items, price_and_validate, validate_composition,
    validate_name,
};
