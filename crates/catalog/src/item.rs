//! The sellable-item contract shared by catalog products and bundle components.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use storefront_core::Money;

use crate::product::ProductId;

/// Identifier of an item as referenced by a bundle.
///
/// Bundles store snapshots of their components, and those snapshots may come
/// from the catalog (a product id) or from a client that uses its own keys
/// (e.g. `"p1"`), so the identifier is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProductId> for ItemId {
    fn from(value: ProductId) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Anything with a base price and an optional sale price.
pub trait Priced {
    /// Identity used to decide whether two entries are the same item.
    fn item_key(&self) -> Cow<'_, str>;

    fn base_price(&self) -> Money;

    fn sale_price(&self) -> Option<Money>;

    /// Sale price if defined, else base price.
    fn effective_price(&self) -> Money {
        self.sale_price().unwrap_or_else(|| self.base_price())
    }
}

impl<T: Priced + ?Sized> Priced for &T {
    fn item_key(&self) -> Cow<'_, str> {
        (**self).item_key()
    }

    fn base_price(&self) -> Money {
        (**self).base_price()
    }

    fn sale_price(&self) -> Option<Money> {
        (**self).sale_price()
    }
}

/// Default image for records created without one.
pub fn placeholder_image(text: &str) -> String {
    format!(
        "/placeholder.svg?height=300&width=300&text={}",
        urlencoding::encode(text)
    )
}
