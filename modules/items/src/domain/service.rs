use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::config::ItemsConfig;
use crate::contract::model::{Item, ItemPatch, ItemQuery};
use crate::domain::error::DomainError;
use crate::domain::normalize::{CreateInput, PartialInput, ReplaceInput};
use crate::domain::object_id::ObjectId;
use crate::domain::repo::ItemsRepository;

/// Domain service for the item catalog.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ItemsRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&ItemsConfig::default())
    }
}

impl From<&ItemsConfig> for ServiceConfig {
    fn from(cfg: &ItemsConfig) -> Self {
        Self {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        }
    }
}

/// Path ids must be canonical ObjectId strings before any storage access.
pub fn parse_item_id(raw: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse_canonical(raw).ok_or_else(|| DomainError::invalid_id(raw))
}

impl Service {
    pub fn new(repo: Arc<dyn ItemsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Page size actually used for a listing. Always at least one.
    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        let max = self.config.max_page_size.max(1);
        requested
            .unwrap_or(self.config.default_page_size)
            .clamp(1, max)
    }

    #[instrument(name = "items.service.get_item", skip(self), fields(item_id = %id))]
    pub async fn get_item(&self, id: ObjectId) -> Result<Item, DomainError> {
        debug!("Getting item by id");
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?
            .ok_or_else(|| DomainError::not_found(id))
    }

    #[instrument(name = "items.service.list_items", skip(self))]
    pub async fn list_items(&self, query: ItemQuery) -> Result<Vec<Item>, DomainError> {
        let limit = self.effective_limit(query.limit);
        let items = self
            .repo
            .list(&query, limit)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;
        debug!("Listed {} items", items.len());
        Ok(items)
    }

    #[instrument(
        name = "items.service.create_item",
        skip(self, input),
        fields(name = %input.draft().name)
    )]
    pub async fn create_item(&self, input: CreateInput) -> Result<Item, DomainError> {
        let now = Utc::now();
        let item = self
            .repo
            .insert(input.into_draft(), now)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;
        info!("Created item with id={}", item.id);
        Ok(item)
    }

    /// Overwrites every user-controlled field; `created_at` is preserved.
    #[instrument(name = "items.service.replace_item", skip(self, input), fields(item_id = %id))]
    pub async fn replace_item(&self, id: ObjectId, input: ReplaceInput) -> Result<Item, DomainError> {
        let item = self.apply(id, input.into_draft().into()).await?;
        info!("Replaced item");
        Ok(item)
    }

    #[instrument(name = "items.service.patch_item", skip(self, input), fields(item_id = %id))]
    pub async fn patch_item(&self, id: ObjectId, input: PartialInput) -> Result<Item, DomainError> {
        let item = self.apply(id, input.into_patch()).await?;
        info!("Patched item");
        Ok(item)
    }

    #[instrument(name = "items.service.delete_item", skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: ObjectId) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;
        if !deleted {
            return Err(DomainError::not_found(id));
        }
        info!("Deleted item");
        Ok(())
    }

    async fn apply(&self, id: ObjectId, patch: ItemPatch) -> Result<Item, DomainError> {
        self.repo
            .update(id, patch, Utc::now())
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?
            .ok_or_else(|| DomainError::not_found(id))
    }
}
