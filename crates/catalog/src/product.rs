use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Event, Money, UserId};

use crate::item::{Priced, placeholder_image};

pub const PRODUCT_REQUIRED_FIELDS: &str = "Product must have a name and price";
pub const PRODUCT_NAME_REQUIRED: &str = "Product name is required";

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    seller_id: Option<UserId>,
    name: String,
    price: Money,
    sale_price: Option<Money>,
    description: String,
    image: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl Product {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            seller_id: None,
            name: String::new(),
            price: Money::ZERO,
            sale_price: None,
            description: String::new(),
            image: String::new(),
            created_at: None,
            updated_at: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn seller_id(&self) -> Option<UserId> {
        self.seller_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl Priced for Product {
    fn item_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.id.to_string())
    }

    fn base_price(&self) -> Money {
        self.price
    }

    fn sale_price(&self) -> Option<Money> {
        self.sale_price
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub seller_id: UserId,
    pub name: String,
    pub price: Option<Money>,
    pub sale_price: Option<Money>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateProduct (fields left `None` are kept).
///
/// `sale_price` is `Some(None)` to end a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub product_id: ProductId,
    pub seller_id: UserId,
    pub name: Option<String>,
    pub price: Option<Money>,
    pub sale_price: Option<Option<Money>>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProduct {
    pub product_id: ProductId,
    pub seller_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    CreateProduct(CreateProduct),
    UpdateProduct(UpdateProduct),
    DeleteProduct(DeleteProduct),
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub seller_id: UserId,
    pub name: String,
    pub price: Money,
    pub sale_price: Option<Money>,
    pub description: String,
    pub image: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductUpdated (carries the full resulting field set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdated {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub sale_price: Option<Money>,
    pub description: String,
    pub image: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDeleted {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    ProductUpdated(ProductUpdated),
    ProductDeleted(ProductDeleted),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated(_) => "catalog.product.created",
            ProductEvent::ProductUpdated(_) => "catalog.product.updated",
            ProductEvent::ProductDeleted(_) => "catalog.product.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductCreated(e) => e.occurred_at,
            ProductEvent::ProductUpdated(e) => e.occurred_at,
            ProductEvent::ProductDeleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductCreated(e) => {
                self.id = e.product_id;
                self.seller_id = Some(e.seller_id);
                self.name = e.name.clone();
                self.price = e.price;
                self.sale_price = e.sale_price;
                self.description = e.description.clone();
                self.image = e.image.clone();
                self.created_at = Some(e.occurred_at);
                self.updated_at = Some(e.occurred_at);
                self.created = true;
            }
            ProductEvent::ProductUpdated(e) => {
                self.name = e.name.clone();
                self.price = e.price;
                self.sale_price = e.sale_price;
                self.description = e.description.clone();
                self.image = e.image.clone();
                self.updated_at = Some(e.occurred_at);
            }
            ProductEvent::ProductDeleted(e) => {
                self.deleted = true;
                self.updated_at = Some(e.occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::CreateProduct(cmd) => self.handle_create(cmd),
            ProductCommand::UpdateProduct(cmd) => self.handle_update(cmd),
            ProductCommand::DeleteProduct(cmd) => self.handle_delete(cmd),
        }
    }

    fn is_live(&self) -> bool {
        self.created && !self.deleted
    }
}

impl Product {
    fn ensure_live(&self, product_id: ProductId) -> Result<(), DomainError> {
        if !self.is_live() {
            return Err(DomainError::not_found());
        }
        if self.id != product_id {
            return Err(DomainError::id_mismatch(self.id, product_id));
        }
        Ok(())
    }

    fn ensure_owner(&self, seller_id: UserId) -> Result<(), DomainError> {
        if self.seller_id != Some(seller_id) {
            return Err(DomainError::NotOwner);
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("product already exists"));
        }

        let name = cmd.name.trim();
        let price = match cmd.price {
            Some(p) if !name.is_empty() && !p.is_zero() => p,
            _ => return Err(DomainError::validation(PRODUCT_REQUIRED_FIELDS)),
        };

        Ok(vec![ProductEvent::ProductCreated(ProductCreated {
            product_id: cmd.product_id,
            seller_id: cmd.seller_id,
            name: name.to_string(),
            price,
            sale_price: cmd.sale_price,
            description: cmd.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
            image: cmd
                .image
                .clone()
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| placeholder_image(name)),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_live(cmd.product_id)?;
        self.ensure_owner(cmd.seller_id)?;

        let name = match &cmd.name {
            Some(n) if n.trim().is_empty() => {
                return Err(DomainError::validation(PRODUCT_NAME_REQUIRED));
            }
            Some(n) => n.trim().to_string(),
            None => self.name.clone(),
        };

        Ok(vec![ProductEvent::ProductUpdated(ProductUpdated {
            product_id: cmd.product_id,
            name,
            price: cmd.price.unwrap_or(self.price),
            sale_price: cmd.sale_price.unwrap_or(self.sale_price),
            description: cmd
                .description
                .as_deref()
                .map(|d| d.trim().to_string())
                .unwrap_or_else(|| self.description.clone()),
            image: cmd.image.clone().unwrap_or_else(|| self.image.clone()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteProduct) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_live(cmd.product_id)?;
        self.ensure_owner(cmd.seller_id)?;

        Ok(vec![ProductEvent::ProductDeleted(ProductDeleted {
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn create_cmd(product_id: ProductId, seller_id: UserId) -> CreateProduct {
        CreateProduct {
            product_id,
            seller_id,
            name: "Sunglasses".to_string(),
            price: Some(money("24.99")),
            sale_price: None,
            description: None,
            image: None,
            occurred_at: Utc::now(),
        }
    }

    fn created_product(seller_id: UserId) -> Product {
        let product_id = ProductId::new(AggregateId::new());
        let mut product = Product::empty(product_id);
        let events = product
            .handle(&ProductCommand::CreateProduct(create_cmd(product_id, seller_id)))
            .unwrap();
        product.apply(&events[0]);
        product
    }

    #[test]
    fn create_product_emits_product_created_event() {
        let product_id = ProductId::new(AggregateId::new());
        let seller_id = UserId::new();
        let product = Product::empty(product_id);

        let events = product
            .handle(&ProductCommand::CreateProduct(create_cmd(product_id, seller_id)))
            .unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            ProductEvent::ProductCreated(e) => {
                assert_eq!(e.product_id, product_id);
                assert_eq!(e.seller_id, seller_id);
                assert_eq!(e.name, "Sunglasses");
                assert_eq!(e.price, money("24.99"));
                assert_eq!(e.image, "/placeholder.svg?height=300&width=300&text=Sunglasses");
            }
            _ => panic!("Expected ProductCreated event"),
        }
    }

    #[test]
    fn create_product_rejects_blank_name() {
        let product_id = ProductId::new(AggregateId::new());
        let mut cmd = create_cmd(product_id, UserId::new());
        cmd.name = "   ".to_string();

        let err = Product::empty(product_id)
            .handle(&ProductCommand::CreateProduct(cmd))
            .unwrap_err();
        assert_eq!(err, DomainError::validation(PRODUCT_REQUIRED_FIELDS));
    }

    #[test]
    fn create_product_rejects_missing_or_zero_price() {
        let product_id = ProductId::new(AggregateId::new());
        let mut cmd = create_cmd(product_id, UserId::new());
        cmd.price = None;
        let err = Product::empty(product_id)
            .handle(&ProductCommand::CreateProduct(cmd.clone()))
            .unwrap_err();
        assert_eq!(err, DomainError::validation(PRODUCT_REQUIRED_FIELDS));

        cmd.price = Some(Money::ZERO);
        let err = Product::empty(product_id)
            .handle(&ProductCommand::CreateProduct(cmd))
            .unwrap_err();
        assert_eq!(err, DomainError::validation(PRODUCT_REQUIRED_FIELDS));
    }

    #[test]
    fn create_product_rejects_duplicate_creation() {
        let seller_id = UserId::new();
        let product = created_product(seller_id);
        let err = product
            .handle(&ProductCommand::CreateProduct(create_cmd(product.id_typed(), seller_id)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn sale_price_is_the_effective_price() {
        let product_id = ProductId::new(AggregateId::new());
        let mut product = Product::empty(product_id);
        let mut cmd = create_cmd(product_id, UserId::new());
        cmd.sale_price = Some(money("19.99"));
        let events = product.handle(&ProductCommand::CreateProduct(cmd)).unwrap();
        product.apply(&events[0]);

        assert_eq!(product.effective_price(), money("19.99"));
        assert_eq!(product.item_key(), product_id.to_string());
    }

    #[test]
    fn update_product_keeps_unspecified_fields() {
        let seller_id = UserId::new();
        let mut product = created_product(seller_id);
        let cmd = UpdateProduct {
            product_id: product.id_typed(),
            seller_id,
            name: None,
            price: None,
            sale_price: Some(Some(money("20"))),
            description: Some(" Polarized ".to_string()),
            image: None,
            occurred_at: Utc::now(),
        };

        let events = product.handle(&ProductCommand::UpdateProduct(cmd)).unwrap();
        product.apply(&events[0]);

        assert_eq!(product.name(), "Sunglasses");
        assert_eq!(product.price(), money("24.99"));
        assert_eq!(product.effective_price(), money("20"));
        assert_eq!(product.description(), "Polarized");
        assert_eq!(product.version(), 2);
    }

    #[test]
    fn update_product_can_end_a_sale() {
        let seller_id = UserId::new();
        let mut product = created_product(seller_id);
        let mut cmd = UpdateProduct {
            product_id: product.id_typed(),
            seller_id,
            name: None,
            price: None,
            sale_price: Some(Some(money("19.99"))),
            description: None,
            image: None,
            occurred_at: Utc::now(),
        };
        let events = product.handle(&ProductCommand::UpdateProduct(cmd.clone())).unwrap();
        product.apply(&events[0]);
        assert_eq!(product.effective_price(), money("19.99"));

        // absent keeps the sale
        cmd.sale_price = None;
        let events = product.handle(&ProductCommand::UpdateProduct(cmd.clone())).unwrap();
        product.apply(&events[0]);
        assert_eq!(product.sale_price(), Some(money("19.99")));

        cmd.sale_price = Some(None);
        let events = product.handle(&ProductCommand::UpdateProduct(cmd)).unwrap();
        product.apply(&events[0]);
        assert_eq!(product.sale_price(), None);
        assert_eq!(product.effective_price(), money("24.99"));
    }

    #[test]
    fn update_product_rejects_blank_name() {
        let seller_id = UserId::new();
        let product = created_product(seller_id);
        let cmd = UpdateProduct {
            product_id: product.id_typed(),
            seller_id,
            name: Some(String::new()),
            price: None,
            sale_price: None,
            description: None,
            image: None,
            occurred_at: Utc::now(),
        };

        let err = product.handle(&ProductCommand::UpdateProduct(cmd)).unwrap_err();
        assert_eq!(err, DomainError::validation(PRODUCT_NAME_REQUIRED));
    }

    #[test]
    fn only_the_owner_may_update_or_delete() {
        let product = created_product(UserId::new());
        let intruder = UserId::new();

        let update = UpdateProduct {
            product_id: product.id_typed(),
            seller_id: intruder,
            name: Some("Mine now".to_string()),
            price: None,
            sale_price: None,
            description: None,
            image: None,
            occurred_at: Utc::now(),
        };
        assert_eq!(
            product.handle(&ProductCommand::UpdateProduct(update)).unwrap_err(),
            DomainError::NotOwner
        );

        let delete = DeleteProduct {
            product_id: product.id_typed(),
            seller_id: intruder,
            occurred_at: Utc::now(),
        };
        assert_eq!(
            product.handle(&ProductCommand::DeleteProduct(delete)).unwrap_err(),
            DomainError::NotOwner
        );
    }

    #[test]
    fn deleted_product_is_not_found() {
        let seller_id = UserId::new();
        let mut product = created_product(seller_id);
        let delete = DeleteProduct {
            product_id: product.id_typed(),
            seller_id,
            occurred_at: Utc::now(),
        };
        let events = product.handle(&ProductCommand::DeleteProduct(delete.clone())).unwrap();
        product.apply(&events[0]);
        assert!(!product.is_live());

        let err = product.handle(&ProductCommand::DeleteProduct(delete)).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let seller_id = UserId::new();
        let product = created_product(seller_id);
        let before = product.clone();
        let delete = DeleteProduct {
            product_id: product.id_typed(),
            seller_id,
            occurred_at: Utc::now(),
        };

        let events1 = product.handle(&ProductCommand::DeleteProduct(delete.clone())).unwrap();
        let events2 = product.handle(&ProductCommand::DeleteProduct(delete)).unwrap();

        assert_eq!(before, product);
        assert_eq!(events1, events2);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: apply is deterministic (same events = same final state).
            #[test]
            fn apply_is_deterministic(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                cents in 1u64..10_000_000,
            ) {
                let product_id = ProductId::new(AggregateId::new());
                let seller_id = UserId::new();
                let at = Utc::now();
                let events = vec![
                    ProductEvent::ProductCreated(ProductCreated {
                        product_id,
                        seller_id,
                        name: name.clone(),
                        price: Money::from_cents(cents),
                        sale_price: None,
                        description: String::new(),
                        image: placeholder_image(&name),
                        occurred_at: at,
                    }),
                    ProductEvent::ProductDeleted(ProductDeleted { product_id, occurred_at: at }),
                ];

                let mut p1 = Product::empty(product_id);
                let mut p2 = Product::empty(product_id);
                for event in &events {
                    p1.apply(event);
                    p2.apply(event);
                }

                prop_assert_eq!(&p1, &p2);
                prop_assert_eq!(p1.version(), 2);
                prop_assert!(!p1.is_live());
            }
        }
    }
}
