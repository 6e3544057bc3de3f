use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use modkit::api::problem::{FieldViolation, Problem, ProblemResponse};
use modkit::http::request_id;

use crate::domain::error::DomainError;

/// Request details echoed in problem bodies: the path as `instance` and the
/// `x-request-id` header when present.
#[derive(Debug, Clone, Default)]
pub struct ErrorCtx {
    pub instance: String,
    pub request_id: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ErrorCtx {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(request_id::header())
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Ok(Self {
            instance: parts.uri.path().to_owned(),
            request_id,
        })
    }
}

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &ErrorCtx,
) -> ProblemResponse {
    Problem::new(status, code, title, detail)
        .at(&ctx.instance, ctx.request_id.as_deref())
        .into()
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ErrorCtx) -> ProblemResponse {
    match e {
        DomainError::InvalidId { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "ITEMS_INVALID_ID",
            "Invalid ID",
            "Invalid ID",
            ctx,
        ),
        DomainError::Validation(v) => {
            let resp = from_parts(
                StatusCode::BAD_REQUEST,
                "ITEMS_VALIDATION",
                "Validation error",
                v.to_string(),
                ctx,
            );
            match v.field() {
                Some(field) => resp.0.with_field(FieldViolation::new(field, v.to_string())).into(),
                None => resp,
            }
        }
        DomainError::InvalidQuery { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "ITEMS_INVALID_QUERY",
            "Invalid query",
            e.to_string(),
            ctx,
        ),
        DomainError::ItemNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "ITEMS_NOT_FOUND",
            "Item not found",
            format!("Item with id {} was not found", id),
            ctx,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                ctx,
            )
        }
    }
}
