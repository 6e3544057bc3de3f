use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::rest::dto::{ItemBody, ItemDto, ItemListDto, ListItemsQuery};
use crate::api::rest::error::{from_parts, map_domain_error, ErrorCtx};
use crate::contract::model::ItemQuery;
use crate::domain::error::{DomainError, ValidationError};
use crate::domain::normalize::{CreateInput, PartialInput, ReplaceInput};
use crate::domain::service::{parse_item_id, Service};

/// Unwrap a JSON body. An oversized body is 413; any other extractor
/// rejection (syntax error, missing content type) is a malformed body.
fn json_body(
    body: Result<Json<Value>, JsonRejection>,
    ctx: &ErrorCtx,
) -> Result<Value, ProblemResponse> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            debug!(%rejection, "Request body over limit");
            Err(from_parts(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Payload too large",
                rejection.body_text(),
                ctx,
            ))
        }
        Err(rejection) => {
            debug!(%rejection, "Rejected request body");
            Err(map_domain_error(&ValidationError::MalformedBody.into(), ctx))
        }
    }
}

/// List items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Matching items", body = ItemListDto),
        (status = 400, description = "Invalid query parameter", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_items(
    ctx: ErrorCtx,
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<Json<ItemListDto>, ProblemResponse> {
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => {
            return Err(map_domain_error(
                &DomainError::invalid_query("query", rejection.body_text()),
                &ctx,
            ))
        }
    };
    debug!("Listing items with query: {:?}", query);

    let query = ItemQuery::try_from(query).map_err(|e| map_domain_error(&e, &ctx))?;
    let items = svc
        .list_items(query)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    Ok(Json(ItemListDto::from(items)))
}

/// Get a specific item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id, 24 lowercase hex characters")),
    responses(
        (status = 200, description = "Item found", body = ItemDto),
        (status = 400, description = "Invalid ID", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Item not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_item(
    ctx: ErrorCtx,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ItemDto>, ProblemResponse> {
    let id = parse_item_id(&raw_id).map_err(|e| map_domain_error(&e, &ctx))?;
    let item = svc
        .get_item(id)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    Ok(Json(ItemDto::from(item)))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body(content = ItemBody, description = "Item fields; `name` is required"),
    responses(
        (status = 201, description = "Item created", body = ItemDto),
        (status = 400, description = "Validation error", body = Problem, content_type = "application/problem+json"),
        (status = 413, description = "Body over the size limit", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_item(
    ctx: ErrorCtx,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemDto>), ProblemResponse> {
    let body = json_body(body, &ctx)?;
    let input = CreateInput::parse(&body).map_err(|e| map_domain_error(&e.into(), &ctx))?;

    let item = svc
        .create_item(input)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    info!("Item created: {}", item.id);
    Ok((StatusCode::CREATED, Json(ItemDto::from(item))))
}

/// Replace every user-controlled field of an item
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id, 24 lowercase hex characters")),
    request_body(content = ItemBody, description = "Full item state; omitted fields are reset to defaults"),
    responses(
        (status = 200, description = "Item replaced", body = ItemDto),
        (status = 400, description = "Invalid ID or validation error", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Item not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn replace_item(
    ctx: ErrorCtx,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ItemDto>, ProblemResponse> {
    let id = parse_item_id(&raw_id).map_err(|e| map_domain_error(&e, &ctx))?;
    let body = json_body(body, &ctx)?;
    let input = ReplaceInput::parse(&body).map_err(|e| map_domain_error(&e.into(), &ctx))?;

    let item = svc
        .replace_item(id, input)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    Ok(Json(ItemDto::from(item)))
}

/// Update a subset of item fields
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id, 24 lowercase hex characters")),
    request_body(content = ItemBody, description = "Non-empty subset of item fields; unknown fields are rejected"),
    responses(
        (status = 200, description = "Item updated", body = ItemDto),
        (status = 400, description = "Invalid ID or validation error", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Item not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn patch_item(
    ctx: ErrorCtx,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ItemDto>, ProblemResponse> {
    let id = parse_item_id(&raw_id).map_err(|e| map_domain_error(&e, &ctx))?;
    let body = json_body(body, &ctx)?;
    let input = PartialInput::parse(&body).map_err(|e| map_domain_error(&e.into(), &ctx))?;

    let item = svc
        .patch_item(id, input)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    Ok(Json(ItemDto::from(item)))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id, 24 lowercase hex characters")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Invalid ID", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Item not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_item(
    ctx: ErrorCtx,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_item_id(&raw_id).map_err(|e| map_domain_error(&e, &ctx))?;
    svc.delete_item(id)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    info!("Item deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
