use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{Item, ItemQuery, ItemSort};
use crate::domain::error::DomainError;

/// REST DTO for item representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    /// 24-character lowercase hex ObjectId.
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for item list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemListDto {
    pub items: Vec<ItemDto>,
    pub count: usize,
}

/// Request body accepted by create, replace and patch.
///
/// Documentation only: handlers take raw JSON and run it through the
/// normalizer, so wrong types are reported as validation errors rather than
/// deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemBody {
    /// Required for create and replace; trimmed, must not be blank.
    pub name: Option<String>,
    /// Defaults to an empty string.
    pub description: Option<String>,
    /// Defaults to `general` when absent or blank.
    pub category: Option<String>,
    /// Non-negative number, defaults to 0.
    pub price: Option<f64>,
    /// Non-negative number, defaults to 0.
    pub quantity: Option<f64>,
}

/// Query parameters of `GET /items`. Kept as strings so malformed values
/// become problem responses.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Only items with `price >= minPrice`.
    pub min_price: Option<String>,
    /// `price` (ascending) or `-price` (descending); newest first when absent.
    pub sort: Option<String>,
    /// Positive page size, capped by the server.
    pub limit: Option<String>,
}

impl TryFrom<ListItemsQuery> for ItemQuery {
    type Error = DomainError;

    fn try_from(q: ListItemsQuery) -> Result<Self, Self::Error> {
        let min_price = q
            .min_price
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .ok_or_else(|| {
                        DomainError::invalid_query("minPrice", "must be a non-negative number")
                    })
            })
            .transpose()?;

        let sort = match q.sort.as_deref() {
            None => ItemSort::Newest,
            Some("price") => ItemSort::PriceAsc,
            Some("-price") => ItemSort::PriceDesc,
            Some(_) => {
                return Err(DomainError::invalid_query(
                    "sort",
                    "must be 'price' or '-price'",
                ))
            }
        };

        let limit = q
            .limit
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| DomainError::invalid_query("limit", "must be a positive integer"))
            })
            .transpose()?;

        Ok(Self {
            category: q.category,
            min_price,
            sort,
            limit,
        })
    }
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_hex(),
            name: item.name,
            description: item.description,
            category: item.category,
            price: item.price,
            quantity: item.quantity,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<Vec<Item>> for ItemListDto {
    fn from(items: Vec<Item>) -> Self {
        let items: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();
        Self {
            count: items.len(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListItemsQuery {
        let mut q = ListItemsQuery::default();
        for (k, v) in pairs {
            let v = Some((*v).to_owned());
            match *k {
                "category" => q.category = v,
                "minPrice" => q.min_price = v,
                "sort" => q.sort = v,
                "limit" => q.limit = v,
                other => panic!("unexpected key {other}"),
            }
        }
        q
    }

    #[test]
    fn empty_query_defaults_to_newest() {
        let q = ItemQuery::try_from(ListItemsQuery::default()).unwrap();
        assert_eq!(q, ItemQuery::default());
    }

    #[test]
    fn parses_all_parameters() {
        let q = ItemQuery::try_from(query(&[
            ("category", "tools"),
            ("minPrice", "9.5"),
            ("sort", "-price"),
            ("limit", "10"),
        ]))
        .unwrap();
        assert_eq!(q.category.as_deref(), Some("tools"));
        assert_eq!(q.min_price, Some(9.5));
        assert_eq!(q.sort, ItemSort::PriceDesc);
        assert_eq!(q.limit, Some(10));
    }

    #[test]
    fn rejects_invalid_values() {
        for pairs in [
            [("minPrice", "-1")],
            [("minPrice", "cheap")],
            [("sort", "name")],
            [("limit", "0")],
            [("limit", "-3")],
            [("limit", "ten")],
        ] {
            let err = ItemQuery::try_from(query(&pairs)).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidQuery { .. }),
                "{pairs:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn item_dto_uses_camel_case() {
        let now = Utc::now();
        let dto = ItemDto {
            id: "507f1f77bcf86cd799439011".into(),
            name: "Widget".into(),
            description: String::new(),
            category: "general".into(),
            price: 10.0,
            quantity: 0.0,
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(&dto).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
        assert!(v.get("created_at").is_none());
    }
}
