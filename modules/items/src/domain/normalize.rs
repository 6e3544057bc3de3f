//! Validation and normalization of client-supplied item bodies.
//!
//! Pure functions over `serde_json::Value`; the first failing rule wins.
//! Timestamps are not touched here, the service stamps them.

use serde_json::{Map, Value};

use super::error::ValidationError;
use crate::contract::model::{ItemDraft, ItemPatch, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION};

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const CATEGORY: &str = "category";
pub const PRICE: &str = "price";
pub const QUANTITY: &str = "quantity";

/// Body members a client may set.
pub const RECOGNIZED_FIELDS: [&str; 5] = [NAME, DESCRIPTION, CATEGORY, PRICE, QUANTITY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Replace,
    Partial,
}

/// Normalized body: full state for create/replace, a field subset for partial.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePayload {
    Full(ItemDraft),
    Partial(ItemPatch),
}

pub fn normalize(body: &Value, mode: Mode) -> Result<UpdatePayload, ValidationError> {
    match mode {
        Mode::Create => CreateInput::parse(body).map(|i| UpdatePayload::Full(i.into_draft())),
        Mode::Replace => ReplaceInput::parse(body).map(|i| UpdatePayload::Full(i.into_draft())),
        Mode::Partial => PartialInput::parse(body).map(|i| UpdatePayload::Partial(i.into_patch())),
    }
}

/// Validated body of `POST /items`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateInput(ItemDraft);

impl CreateInput {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        full_state(as_object(body)?).map(Self)
    }

    pub fn draft(&self) -> &ItemDraft {
        &self.0
    }

    pub fn into_draft(self) -> ItemDraft {
        self.0
    }
}

/// Validated body of `PUT /items/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceInput(ItemDraft);

impl ReplaceInput {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        full_state(as_object(body)?).map(Self)
    }

    pub fn into_draft(self) -> ItemDraft {
        self.0
    }
}

/// Validated body of `PATCH /items/{id}`. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialInput(ItemPatch);

impl PartialInput {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        let obj = as_object(body)?;
        if obj.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(key) = obj.keys().find(|k| !RECOGNIZED_FIELDS.contains(&k.as_str())) {
            return Err(ValidationError::UnknownField { field: key.clone() });
        }

        let name = match obj.get(NAME) {
            None => None,
            Some(v) => Some(non_blank(v).ok_or(ValidationError::Blank { field: NAME })?),
        };
        Ok(Self(ItemPatch {
            name,
            description: text(obj, DESCRIPTION, DEFAULT_DESCRIPTION)?,
            category: text(obj, CATEGORY, DEFAULT_CATEGORY)?,
            price: amount(obj, PRICE)?,
            quantity: amount(obj, QUANTITY)?,
        }))
    }

    pub fn into_patch(self) -> ItemPatch {
        self.0
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::MalformedBody)
}

/// Create and replace share the same rules; unknown keys are ignored.
fn full_state(obj: &Map<String, Value>) -> Result<ItemDraft, ValidationError> {
    let name = obj
        .get(NAME)
        .and_then(non_blank)
        .ok_or(ValidationError::Required { field: NAME })?;
    Ok(ItemDraft {
        name,
        description: text(obj, DESCRIPTION, DEFAULT_DESCRIPTION)?
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
        category: text(obj, CATEGORY, DEFAULT_CATEGORY)?
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
        price: amount(obj, PRICE)?.unwrap_or(0.0),
        quantity: amount(obj, QUANTITY)?.unwrap_or(0.0),
    })
}

fn non_blank(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn text(
    obj: &Map<String, Value>,
    field: &'static str,
    default: &str,
) -> Result<Option<String>, ValidationError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            let value = if trimmed.is_empty() { default } else { trimmed };
            Ok(Some(value.to_owned()))
        }
        Some(_) => Err(ValidationError::NotAString { field }),
    }
}

fn amount(obj: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    match obj.get(field) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            // collapse -0.0
            .map(|n| Some(n + 0.0))
            .ok_or(ValidationError::NotNonNegativeNumber { field }),
    }
}
