use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{Item, ItemDraft, ItemPatch, ItemQuery};
use crate::domain::object_id::ObjectId;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    /// Load an item by id.
    async fn find_by_id(&self, id: ObjectId) -> anyhow::Result<Option<Item>>;

    /// Items matching the query filters and ordering, at most `limit` of them.
    /// `query.limit` is ignored; the service passes the resolved page size.
    async fn list(&self, query: &ItemQuery, limit: u64) -> anyhow::Result<Vec<Item>>;

    /// Persist a new item. Storage assigns the id; `at` becomes both
    /// `created_at` and `updated_at`.
    async fn insert(&self, draft: ItemDraft, at: DateTime<Utc>) -> anyhow::Result<Item>;

    /// Overwrite the fields present in `patch` and set `updated_at = at`.
    /// Returns the post-update document, `None` when no item matched.
    async fn update(
        &self,
        id: ObjectId,
        patch: ItemPatch,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Item>>;

    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: ObjectId) -> anyhow::Result<bool>;
}
