use modkit::api::problem::{FieldViolation, Problem};
use utoipa::OpenApi;

use crate::api::rest::dto::{ItemBody, ItemDto, ItemListDto};
use crate::api::rest::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_items,
        handlers::get_item,
        handlers::create_item,
        handlers::replace_item,
        handlers::patch_item,
        handlers::delete_item,
    ),
    components(schemas(ItemDto, ItemListDto, ItemBody, Problem, FieldViolation)),
    tags((name = "items", description = "Item catalog CRUD"))
)]
pub struct ItemsApiDoc;
