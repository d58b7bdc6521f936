use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use storefront_catalog::{ItemId, Priced, Product};
use storefront_core::Money;

/// Snapshot of a product as it was when placed in a bundle.
///
/// Bundles keep their own copy of component prices so that later catalog
/// edits do not silently reprice an existing bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleItem {
    pub id: ItemId,
    pub name: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BundleItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            sale_price: None,
            image: None,
            description: None,
        }
    }

    pub fn with_sale_price(mut self, sale_price: Money) -> Self {
        self.sale_price = Some(sale_price);
        self
    }
}

impl From<&Product> for BundleItem {
    fn from(product: &Product) -> Self {
        Self {
            id: ItemId::from(product.id_typed()),
            name: product.name().to_string(),
            price: product.price(),
            sale_price: product.sale_price(),
            image: Some(product.image().to_string()).filter(|i| !i.is_empty()),
            description: Some(product.description().to_string()).filter(|d| !d.is_empty()),
        }
    }
}

impl Priced for BundleItem {
    fn item_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.id.as_str())
    }

    fn base_price(&self) -> Money {
        self.price
    }

    fn sale_price(&self) -> Option<Money> {
        self.sale_price
    }
}
