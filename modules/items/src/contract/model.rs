use chrono::{DateTime, Utc};

use crate::domain::object_id::ObjectId;

/// Category assigned when none (or only whitespace) is supplied.
pub const DEFAULT_CATEGORY: &str = "general";
/// Description assigned when none is supplied.
pub const DEFAULT_DESCRIPTION: &str = "";

/// A stored catalog item. Transport-agnostic: no serde here, the REST layer
/// owns the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complete user-controlled state of an item, as produced by Create or
/// Replace normalization. Every field already has its default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: f64,
}

/// Subset of user-controlled fields to overwrite. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
}

impl From<ItemDraft> for ItemPatch {
    fn from(d: ItemDraft) -> Self {
        Self {
            name: Some(d.name),
            description: Some(d.description),
            category: Some(d.category),
            price: Some(d.price),
            quantity: Some(d.quantity),
        }
    }
}

/// Result ordering for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemSort {
    /// Most recently created first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Listing filters. `limit` is the caller's request; the service resolves
/// the effective page size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub sort: ItemSort,
    pub limit: Option<u64>,
}
