//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built with a
//! `DatabaseConnection` or a transactional connection.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::contract::model::{Item, ItemDraft, ItemPatch, ItemQuery, ItemSort};
use crate::domain::object_id::ObjectId;
use crate::domain::repo::ItemsRepository;
use crate::infra::storage::entity::{ActiveModel as ItemAM, Column, Entity as ItemEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> ItemsRepository for SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ObjectId) -> anyhow::Result<Option<Item>> {
        let found = ItemEntity::find_by_id(id.to_hex())
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        found.map(Item::try_from).transpose()
    }

    async fn list(&self, query: &ItemQuery, limit: u64) -> anyhow::Result<Vec<Item>> {
        let mut select = ItemEntity::find();
        if let Some(category) = &query.category {
            select = select.filter(Column::Category.eq(category.as_str()));
        }
        if let Some(min_price) = query.min_price {
            select = select.filter(Column::Price.gte(min_price));
        }
        // Id breaks ties; its leading bytes are the creation second.
        select = match query.sort {
            ItemSort::Newest => select
                .order_by_desc(Column::CreatedAt)
                .order_by_desc(Column::Id),
            ItemSort::PriceAsc => select.order_by_asc(Column::Price).order_by_asc(Column::Id),
            ItemSort::PriceDesc => select.order_by_desc(Column::Price).order_by_asc(Column::Id),
        };

        let rows = select
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list failed")?;
        rows.into_iter().map(Item::try_from).collect()
    }

    async fn insert(&self, draft: ItemDraft, at: DateTime<Utc>) -> anyhow::Result<Item> {
        let m = ItemAM {
            id: Set(ObjectId::new().to_hex()),
            name: Set(draft.name),
            description: Set(draft.description),
            category: Set(draft.category),
            price: Set(draft.price),
            quantity: Set(draft.quantity),
            created_at: Set(at),
            updated_at: Set(at),
        };
        let model = m.insert(&self.conn).await.context("insert failed")?;
        Item::try_from(model)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: ItemPatch,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Item>> {
        let mut am = ItemAM {
            updated_at: Set(at),
            ..Default::default()
        };
        if let Some(name) = patch.name {
            am.name = Set(name);
        }
        if let Some(description) = patch.description {
            am.description = Set(description);
        }
        if let Some(category) = patch.category {
            am.category = Set(category);
        }
        if let Some(price) = patch.price {
            am.price = Set(price);
        }
        if let Some(quantity) = patch.quantity {
            am.quantity = Set(quantity);
        }

        let res = ItemEntity::update_many()
            .set(am)
            .filter(Column::Id.eq(id.to_hex()))
            .exec(&self.conn)
            .await
            .context("update failed")?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: ObjectId) -> anyhow::Result<bool> {
        let res = ItemEntity::delete_by_id(id.to_hex())
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
