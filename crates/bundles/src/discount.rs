use serde::Serialize;

use crate::bundle::{Bundle, BundleId};
use crate::item::BundleItem;
use crate::pricing::DISCOUNT_PERCENTAGE;
use storefront_core::Money;

/// Read-only discount breakdown of a stored bundle.
///
/// Figures are recomputed from the bundle's current items; nothing stored is
/// trusted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountReport {
    pub bundle_id: BundleId,
    pub name: String,
    pub description: String,
    pub original_price: Money,
    pub discounted_price: Money,
    pub savings: Money,
    pub discount_percentage: u32,
    pub products: Vec<BundleItem>,
}

impl DiscountReport {
    pub fn for_bundle(bundle: &Bundle) -> Self {
        let pricing = bundle.pricing();
        Self {
            bundle_id: bundle.id_typed(),
            name: bundle.name().to_string(),
            description: bundle.description().to_string(),
            original_price: pricing.original_price,
            discounted_price: pricing.discounted_price,
            savings: pricing.savings,
            discount_percentage: DISCOUNT_PERCENTAGE,
            products: bundle.items().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{BundleCommand, CreateBundle};
    use chrono::Utc;
    use storefront_core::{Aggregate, AggregateId, UserId};

    #[test]
    fn report_matches_bundle_pricing() {
        let bundle_id = BundleId::new(AggregateId::new());
        let mut bundle = Bundle::empty(bundle_id);
        let events = bundle
            .handle(&BundleCommand::CreateBundle(CreateBundle {
                bundle_id,
                seller_id: UserId::new(),
                name: Some("Summer Essentials".to_string()),
                description: Some("Everything for the beach".to_string()),
                items: vec![
                    BundleItem::new("p1", "Sunglasses", Money::from_cents(2999)),
                    BundleItem::new("p2", "Beach Towel", Money::from_cents(1999)),
                    BundleItem::new("p3", "Sunscreen", Money::from_cents(1299)),
                ],
                status: None,
                image: None,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        bundle.apply(&events[0]);

        let report = DiscountReport::for_bundle(&bundle);
        assert_eq!(report.discount_percentage, 10);
        assert_eq!(report.products.len(), 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["bundleId"], bundle_id.to_string());
        assert_eq!(json["originalPrice"].as_f64(), Some(62.97));
        assert_eq!(json["discountedPrice"].as_f64(), Some(56.67));
        assert_eq!(json["savings"].as_f64(), Some(6.3));
        assert_eq!(json["discountPercentage"], 10);
    }
}
