use thiserror::Error;

use super::object_id::ObjectId;

/// Rejection produced by the normalizer. The `Display` text is the message
/// returned to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    MalformedBody,

    #[error("PATCH body cannot be empty")]
    EmptyPatch,

    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("{field} is required and must be a non-empty string")]
    Required { field: &'static str },

    #[error("{field} must be a non-empty string")]
    Blank { field: &'static str },

    #[error("{field} must be a string")]
    NotAString { field: &'static str },

    #[error("{field} must be a non-negative number")]
    NotNonNegativeNumber { field: &'static str },
}

impl ValidationError {
    /// Body member the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MalformedBody | Self::EmptyPatch => None,
            Self::UnknownField { field } => Some(field.as_str()),
            Self::Required { field }
            | Self::Blank { field }
            | Self::NotAString { field }
            | Self::NotNonNegativeNumber { field } => Some(*field),
        }
    }
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid ID")]
    InvalidId { id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid query parameter '{parameter}': {message}")]
    InvalidQuery { parameter: String, message: String },

    #[error("Item not found: {id}")]
    ItemNotFound { id: ObjectId },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    pub fn invalid_query(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn not_found(id: ObjectId) -> Self {
        Self::ItemNotFound { id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
