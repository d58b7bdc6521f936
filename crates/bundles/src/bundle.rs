use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_catalog::placeholder_image;
use storefront_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Event, UserId};

use crate::item::BundleItem;
use crate::pricing::{
    self, BundleValidationError, PricingBreakdown, distinct_items, price_and_validate,
    validate_composition, validate_name,
};

/// Bundle identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(pub AggregateId);

impl BundleId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BundleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Bundle visibility. Independent of pricing; the owner may set either value
/// at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleStatus {
    #[default]
    Draft,
    Active,
}

impl BundleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleStatus::Draft => "draft",
            BundleStatus::Active => "active",
        }
    }
}

impl core::str::FromStr for BundleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(BundleStatus::Draft),
            "active" => Ok(BundleStatus::Active),
            other => Err(DomainError::validation(format!(
                "status must be one of: draft, active (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BundleError {
    #[error(transparent)]
    Validation(#[from] BundleValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Aggregate root: Bundle.
///
/// Prices are never stored: [`Bundle::pricing`] derives them from the current
/// items on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    id: BundleId,
    seller_id: Option<UserId>,
    name: String,
    description: String,
    items: Vec<BundleItem>,
    status: BundleStatus,
    image: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl Bundle {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: BundleId) -> Self {
        Self {
            id,
            seller_id: None,
            name: String::new(),
            description: String::new(),
            items: Vec::new(),
            status: BundleStatus::Draft,
            image: String::new(),
            created_at: None,
            updated_at: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> BundleId {
        self.id
    }

    pub fn seller_id(&self) -> Option<UserId> {
        self.seller_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn items(&self) -> &[BundleItem] {
        &self.items
    }

    pub fn status(&self) -> BundleStatus {
        self.status
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

    pub fn pricing(&self) -> PricingBreakdown {
        pricing::compute_pricing(&self.items)
    }

    /// Whether the stored composition would pass write-time validation.
    pub fn has_valid_composition(&self) -> bool {
        validate_composition(&self.items).is_ok()
    }

    pub fn is_owned_by(&self, seller_id: UserId) -> bool {
        self.seller_id == Some(seller_id)
    }
}

impl AggregateRoot for Bundle {
    type Id = BundleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateBundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBundle {
    pub bundle_id: BundleId,
    pub seller_id: UserId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Vec<BundleItem>,
    pub status: Option<BundleStatus>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateBundle (fields left `None` are kept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBundle {
    pub bundle_id: BundleId,
    pub seller_id: UserId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<BundleItem>>,
    pub status: Option<BundleStatus>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteBundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBundle {
    pub bundle_id: BundleId,
    pub seller_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleCommand {
    CreateBundle(CreateBundle),
    UpdateBundle(UpdateBundle),
    DeleteBundle(DeleteBundle),
}

/// Event: BundleCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleCreated {
    pub bundle_id: BundleId,
    pub seller_id: UserId,
    pub name: String,
    pub description: String,
    pub items: Vec<BundleItem>,
    pub status: BundleStatus,
    pub image: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BundleUpdated (carries the full resulting field set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleUpdated {
    pub bundle_id: BundleId,
    pub name: String,
    pub description: String,
    pub items: Vec<BundleItem>,
    pub status: BundleStatus,
    pub image: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BundleDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDeleted {
    pub bundle_id: BundleId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleEvent {
    BundleCreated(BundleCreated),
    BundleUpdated(BundleUpdated),
    BundleDeleted(BundleDeleted),
}

impl Event for BundleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BundleEvent::BundleCreated(_) => "bundles.bundle.created",
            BundleEvent::BundleUpdated(_) => "bundles.bundle.updated",
            BundleEvent::BundleDeleted(_) => "bundles.bundle.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BundleEvent::BundleCreated(e) => e.occurred_at,
            BundleEvent::BundleUpdated(e) => e.occurred_at,
            BundleEvent::BundleDeleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Bundle {
    type Command = BundleCommand;
    type Event = BundleEvent;
    type Error = BundleError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            BundleEvent::BundleCreated(e) => {
                self.id = e.bundle_id;
                self.seller_id = Some(e.seller_id);
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.items = e.items.clone();
                self.status = e.status;
                self.image = e.image.clone();
                self.created_at = Some(e.occurred_at);
                self.updated_at = Some(e.occurred_at);
                self.created = true;
            }
            BundleEvent::BundleUpdated(e) => {
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.items = e.items.clone();
                self.status = e.status;
                self.image = e.image.clone();
                self.updated_at = Some(e.occurred_at);
            }
            BundleEvent::BundleDeleted(e) => {
                self.deleted = true;
                self.updated_at = Some(e.occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            BundleCommand::CreateBundle(cmd) => self.handle_create(cmd),
            BundleCommand::UpdateBundle(cmd) => self.handle_update(cmd),
            BundleCommand::DeleteBundle(cmd) => self.handle_delete(cmd),
        }
    }

    fn is_live(&self) -> bool {
        self.created && !self.deleted
    }
}

impl Bundle {
    fn ensure_live(&self, bundle_id: BundleId) -> Result<(), DomainError> {
        if !self.is_live() {
            return Err(DomainError::not_found());
        }
        if self.id != bundle_id {
            return Err(DomainError::id_mismatch(self.id, bundle_id));
        }
        Ok(())
    }

    fn ensure_owner(&self, seller_id: UserId) -> Result<(), DomainError> {
        if !self.is_owned_by(seller_id) {
            return Err(DomainError::NotOwner);
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateBundle) -> Result<Vec<BundleEvent>, BundleError> {
        if self.created {
            return Err(DomainError::conflict("bundle already exists").into());
        }

        price_and_validate(cmd.name.as_deref(), &cmd.items)?;

        let name = cmd.name.as_deref().unwrap_or_default().trim().to_string();
        let image = cmd
            .image
            .clone()
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| placeholder_image(&name));

        Ok(vec![BundleEvent::BundleCreated(BundleCreated {
            bundle_id: cmd.bundle_id,
            seller_id: cmd.seller_id,
            name,
            description: cmd.description.as_deref().unwrap_or_default().trim().to_string(),
            items: distinct_items(cmd.items.clone()),
            status: cmd.status.unwrap_or_default(),
            image,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateBundle) -> Result<Vec<BundleEvent>, BundleError> {
        self.ensure_live(cmd.bundle_id)?;
        self.ensure_owner(cmd.seller_id)?;

        if let Some(name) = &cmd.name {
            validate_name(Some(name.as_str()))?;
        }
        if let Some(items) = &cmd.items {
            validate_composition(items)?;
        }

        Ok(vec![BundleEvent::BundleUpdated(BundleUpdated {
            bundle_id: cmd.bundle_id,
            name: cmd
                .name
                .as_deref()
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| self.name.clone()),
            description: cmd
                .description
                .as_deref()
                .map(|d| d.trim().to_string())
                .unwrap_or_else(|| self.description.clone()),
            items: cmd
                .items
                .clone()
                .map(distinct_items)
                .unwrap_or_else(|| self.items.clone()),
            status: cmd.status.unwrap_or(self.status),
            image: cmd.image.clone().unwrap_or_else(|| self.image.clone()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteBundle) -> Result<Vec<BundleEvent>, BundleError> {
        self.ensure_live(cmd.bundle_id)?;
        self.ensure_owner(cmd.seller_id)?;

        Ok(vec![BundleEvent::BundleDeleted(BundleDeleted {
            bundle_id: cmd.bundle_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
