use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount the item routes onto `router`. The service is attached to the item
/// routes only.
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let items = Router::new()
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/items/{id}",
            get(handlers::get_item)
                .put(handlers::replace_item)
                .patch(handlers::patch_item)
                .delete(handlers::delete_item),
        )
        .layer(Extension(service));

    Ok(router.merge(items))
}
