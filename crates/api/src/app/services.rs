//! Storage and dispatcher wiring shared by all handlers.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use storefront_bundles::{
    Bundle, BundleCommand, BundleError, BundleId, BundleItem, BundleStatus, CreateBundle,
};
use storefront_catalog::{CreateProduct, Product, ProductCommand, ProductId};
use storefront_core::{AggregateId, DomainError, Money, UserId};
use storefront_infra::{
    CommandDispatcher, DispatchError, InMemoryRepository, Repository, RepositoryError,
};

type BundleRepository = Arc<InMemoryRepository<BundleId, Bundle>>;
type ProductRepository = Arc<InMemoryRepository<ProductId, Product>>;

/// Owner of the demo catalog and bundles loaded by [`AppServices::seed_demo_data`].
pub const DEMO_SELLER_ID: Uuid = Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001);

pub struct AppServices {
    bundles: CommandDispatcher<BundleRepository>,
    products: CommandDispatcher<ProductRepository>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            bundles: CommandDispatcher::new(Arc::new(InMemoryRepository::new())),
            products: CommandDispatcher::new(Arc::new(InMemoryRepository::new())),
        }
    }

    // -------------------------
    // Bundles
    // -------------------------

    pub fn dispatch_bundle(
        &self,
        bundle_id: BundleId,
        command: BundleCommand,
    ) -> Result<Bundle, DispatchError<BundleError>> {
        self.bundles.dispatch(bundle_id, command, Bundle::empty)
    }

    pub fn bundle_get(&self, bundle_id: &BundleId) -> Result<Option<Bundle>, RepositoryError> {
        self.bundles.repository().get(bundle_id)
    }

    /// All bundles, oldest first, optionally restricted to one status value.
    pub fn bundles_list(&self, status: Option<&str>) -> Result<Vec<Bundle>, RepositoryError> {
        let mut bundles: Vec<Bundle> = self
            .bundles
            .repository()
            .list()?
            .into_iter()
            .filter(|b| status.is_none_or(|s| b.status().as_str() == s))
            .collect();
        bundles.sort_by_key(|b| (b.created_at(), *b.id_typed().0.as_uuid()));
        Ok(bundles)
    }

    // -------------------------
    // Products
    // -------------------------

    pub fn dispatch_product(
        &self,
        product_id: ProductId,
        command: ProductCommand,
    ) -> Result<Product, DispatchError<DomainError>> {
        self.products.dispatch(product_id, command, Product::empty)
    }

    pub fn product_get(&self, product_id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.products.repository().get(product_id)
    }

    pub fn products_list(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.products.repository().list()?;
        products.sort_by_key(|p| (p.created_at(), *p.id_typed().0.as_uuid()));
        Ok(products)
    }

    /// Load the sample catalog and three bundles owned by [`DEMO_SELLER_ID`].
    pub fn seed_demo_data(&self) -> anyhow::Result<()> {
        let seller_id = UserId::from_uuid(DEMO_SELLER_ID);

        for (name, description, status, items) in demo_bundles() {
            let mut snapshots = Vec::with_capacity(items.len());
            for (item_name, cents) in items {
                let product = self.create_demo_product(seller_id, item_name, cents)?;
                snapshots.push(BundleItem::from(&product));
            }

            let bundle_id = BundleId::new(AggregateId::new());
            self.dispatch_bundle(
                bundle_id,
                BundleCommand::CreateBundle(CreateBundle {
                    bundle_id,
                    seller_id,
                    name: Some(name.to_string()),
                    description: Some(description.to_string()),
                    items: snapshots,
                    status: Some(status),
                    image: None,
                    occurred_at: Utc::now(),
                }),
            )?;
        }

        tracing::info!(seller_id = %seller_id, "demo catalog and bundles loaded");
        Ok(())
    }

    fn create_demo_product(
        &self,
        seller_id: UserId,
        name: &str,
        cents: u64,
    ) -> Result<Product, DispatchError<DomainError>> {
        let product_id = ProductId::new(AggregateId::new());
        self.dispatch_product(
            product_id,
            ProductCommand::CreateProduct(CreateProduct {
                product_id,
                seller_id,
                name: name.to_string(),
                price: Some(Money::from_cents(cents)),
                sale_price: None,
                description: None,
                image: None,
                occurred_at: Utc::now(),
            }),
        )
    }
}

type DemoBundle = (&'static str, &'static str, BundleStatus, [(&'static str, u64); 3]);

fn demo_bundles() -> [DemoBundle; 3] {
    [
        (
            "Summer Essentials",
            "Everything you need for summer",
            BundleStatus::Active,
            [("Sunglasses", 2999), ("Beach Towel", 1999), ("Sunscreen", 1299)],
        ),
        (
            "Home Office Setup",
            "Essentials for your home office",
            BundleStatus::Active,
            [("Desk Lamp", 3999), ("Wireless Mouse", 2499), ("Keyboard", 4999)],
        ),
        (
            "Fitness Pack",
            "Start your fitness journey",
            BundleStatus::Draft,
            [("Yoga Mat", 2999), ("Water Bottle", 1499), ("Resistance Bands", 1999)],
        ),
    ]
}
