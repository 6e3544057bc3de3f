use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::contract::model::Item;
use crate::domain::object_id::ObjectId;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Canonical 24-char hex ObjectId.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Item {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        let id = ObjectId::parse_str(&m.id)
            .with_context(|| format!("stored item id '{}' is not an ObjectId", m.id))?;
        Ok(Self {
            id,
            name: m.name,
            description: m.description,
            category: m.category,
            price: m.price,
            quantity: m.quantity,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}
