//! Bundle pricing and validation engine.
//!
//! Every layer that needs bundle prices (aggregate, discount report, the
//! pre-submit preview endpoint) goes through these functions; nothing else in
//! the workspace multiplies by the discount rate.
//!
//! Rules:
//! - a bundle needs a non-blank name and at least [`MIN_DISTINCT_ITEMS`]
//!   *distinct* item identifiers;
//! - `original_price` is the exact sum of effective prices (sale price if
//!   defined, else base price);
//! - `discounted_price` is `original_price * 0.9`, rounded once to 2 decimal
//!   places, half-up;
//! - `savings` is `round2(original_price) - discounted_price`.
//!
//! A stored bundle never holds the same item twice: [`distinct_items`] drops
//! repeats before a composition is accepted.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_catalog::Priced;
use storefront_core::Money;

/// Fixed bundle discount, in percent.
pub const DISCOUNT_PERCENTAGE: u32 = 10;

/// Minimum number of distinct items a valid bundle references.
pub const MIN_DISTINCT_ITEMS: usize = 2;

/// Which bundle field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationField {
    Name,
    Products,
}

impl ValidationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationField::Name => "name",
            ValidationField::Products => "products",
        }
    }
}

/// Routine rejection of a malformed bundle. Messages are part of the HTTP
/// contract and must not change.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BundleValidationError {
    #[error("Bundle name is required")]
    NameRequired,

    /// Composition failure when checked on its own (e.g. on update).
    #[error("Bundle must have at least 2 products")]
    TooFewProducts,

    /// Composition failure when checked together with the name (on create).
    #[error("Bundle must have a name and at least 2 products")]
    MissingNameOrProducts,
}

impl BundleValidationError {
    pub fn field(&self) -> ValidationField {
        match self {
            BundleValidationError::NameRequired => ValidationField::Name,
            BundleValidationError::TooFewProducts
            | BundleValidationError::MissingNameOrProducts => ValidationField::Products,
        }
    }
}

/// The three derived monetary figures of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub original_price: Money,
    pub discounted_price: Money,
    pub savings: Money,
}

fn discount_multiplier() -> Decimal {
    (Decimal::ONE_HUNDRED - Decimal::from(DISCOUNT_PERCENTAGE)) / Decimal::ONE_HUNDRED
}

/// Fails unless the name is present and non-blank.
pub fn validate_name(name: Option<&str>) -> Result<(), BundleValidationError> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(()),
        _ => Err(BundleValidationError::NameRequired),
    }
}

/// Fails unless `items` references at least two distinct identifiers.
///
/// Distinctness, not length, is the criterion: two entries for the same item
/// are one product.
pub fn validate_composition<I: Priced>(items: &[I]) -> Result<(), BundleValidationError> {
    debug_assert_eq!(MIN_DISTINCT_ITEMS, 2);

    let mut keys = items.iter().map(|item| item.item_key());
    let Some(first) = keys.next() else {
        return Err(BundleValidationError::TooFewProducts);
    };

    if keys.any(|key| key != first) {
        Ok(())
    } else {
        Err(BundleValidationError::TooFewProducts)
    }
}

/// Keep the first entry for each item identifier, in order.
pub fn distinct_items<I: Priced>(items: Vec<I>) -> Vec<I> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.item_key().into_owned()))
        .collect()
}

/// Compute the derived prices of `items`.
///
/// Does not check composition: read paths price already-stored bundles
/// without re-validating them.
pub fn compute_pricing<I: Priced>(items: &[I]) -> PricingBreakdown {
    let original_price: Money = items.iter().map(|item| item.effective_price()).sum();
    let discounted_price = original_price.scale(discount_multiplier()).round2();
    let savings = original_price.round2().saturating_sub(discounted_price);

    PricingBreakdown {
        original_price,
        discounted_price,
        savings,
    }
}

/// Validate name then composition (first failure wins) and price the bundle.
pub fn price_and_validate<I: Priced>(
    name: Option<&str>,
    items: &[I],
) -> Result<PricingBreakdown, BundleValidationError> {
    validate_name(name)?;
    validate_composition(items).map_err(|_| BundleValidationError::MissingNameOrProducts)?;
    Ok(compute_pricing(items))
}
