use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_bundles::{Bundle, BundleItem, BundleStatus, DISCOUNT_PERCENTAGE, PricingBreakdown};
use storefront_catalog::{Priced, Product};
use storefront_core::{Money, UserId};
use storefront_infra::PaginationMeta;

// -------------------------
// Request DTOs
// -------------------------

/// One entry of a bundle's `products` list.
///
/// With a `price` it is a full snapshot; without one, `id` must name a
/// catalog product and the snapshot is taken from the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleProductEntry {
    pub id: String,
    pub name: Option<String>,
    pub price: Option<Money>,
    pub sale_price: Option<Money>,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBundleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub products: Option<Vec<BundleProductEntry>>,
    pub status: Option<BundleStatus>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBundleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub products: Option<Vec<BundleProductEntry>>,
    pub status: Option<BundleStatus>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBundlesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub sale_price: Option<Money>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
    /// Absent keeps the current sale price; `null` removes it.
    #[serde(default, deserialize_with = "double_option")]
    pub sale_price: Option<Option<Money>>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Helper to tell an explicit `null` (`Some(None)`) from a missing field (`None`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub products: Vec<BundleItem>,
    pub original_price: Money,
    pub discounted_price: Money,
    pub savings: Money,
    pub status: BundleStatus,
    pub seller_id: Option<UserId>,
    pub image: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Bundle> for BundleResponse {
    fn from(bundle: &Bundle) -> Self {
        let pricing = bundle.pricing();
        Self {
            id: bundle.id_typed().to_string(),
            name: bundle.name().to_string(),
            description: bundle.description().to_string(),
            products: bundle.items().to_vec(),
            original_price: pricing.original_price,
            discounted_price: pricing.discounted_price,
            savings: pricing.savings,
            status: bundle.status(),
            seller_id: bundle.seller_id(),
            image: bundle.image().to_string(),
            created_at: bundle.created_at(),
            updated_at: bundle.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    pub effective_price: Money,
    pub description: String,
    pub image: String,
    pub seller_id: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed().to_string(),
            name: product.name().to_string(),
            price: product.price(),
            sale_price: product.sale_price(),
            effective_price: product.effective_price(),
            description: product.description().to_string(),
            image: product.image().to_string(),
            seller_id: product.seller_id(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BundleListResponse {
    pub bundles: Vec<BundleResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub pagination: PaginationMeta,
}

/// Result of a successful pre-submit check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub valid: bool,
    pub original_price: Money,
    pub discounted_price: Money,
    pub savings: Money,
    pub discount_percentage: u32,
    pub products: Vec<BundleItem>,
}

impl PreviewResponse {
    pub fn new(pricing: PricingBreakdown, products: Vec<BundleItem>) -> Self {
        Self {
            valid: true,
            original_price: pricing.original_price,
            discounted_price: pricing.discounted_price,
            savings: pricing.savings,
            discount_percentage: DISCOUNT_PERCENTAGE,
            products,
        }
    }
}
