//! HTTP host: collects module routes, attaches the shared middleware stack,
//! and serves until cancelled.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use modkit::http::request_id;
use modkit::RestfulModule;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

mod config;
pub mod web;

pub use config::ApiIngressConfig;

/// Handler timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum accepted request body.
pub const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Owns the router assembly for every REST module.
#[derive(Debug, Clone)]
pub struct ApiIngress {
    config: ApiIngressConfig,
    request_timeout: Duration,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Zero keeps the default.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.request_timeout = timeout;
        }
        self
    }

    /// Merge the module documents under one `info` block.
    pub fn build_openapi(&self, modules: &[Arc<dyn RestfulModule>]) -> OpenApi {
        let mut doc = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Catalog API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .build(),
            )
            .build();
        for module in modules {
            if let Some(fragment) = module.openapi() {
                doc.merge(fragment);
            }
        }
        doc
    }

    pub fn build_router(&self, modules: &[Arc<dyn RestfulModule>]) -> Result<Router> {
        tracing::debug!("Building router");
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .route("/healthz", get(web::healthz));

        for module in modules {
            router = module.register_rest(router)?;
            tracing::debug!(module = module.name(), "Module routes registered");
        }

        if self.config.enable_docs {
            // Build once, serve as static JSON (no per-request parsing)
            let openapi_value = Arc::new(serde_json::to_value(self.build_openapi(modules))?);
            router = router
                .route(
                    "/openapi.json",
                    get({
                        use axum::{http::header, response::IntoResponse};
                        let v = openapi_value.clone();
                        move || async move {
                            let json = axum::Json((*v).clone());
                            ([(header::CACHE_CONTROL, "no-store")], json).into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        // Must precede the layers so unmatched paths pass through them too.
        router = router.fallback(web::route_not_found);

        // Layers are listed innermost first; the request sees them bottom-up:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        //   -> Timeout -> CORS -> BodyLimit -> DefaultBodyLimit
        // axum's extractors default to 2 MB; lift them to the same limit.
        router = router.layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));
        router = router.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router.layer(TimeoutLayer::new(self.request_timeout));
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(request_id::create_trace_layer());

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }
}

/// Serve `router` on an already-bound listener until `cancel` fires, then
/// drain in-flight requests.
pub async fn serve(listener: TcpListener, router: Router, cancel: CancellationToken) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("HTTP server bound on {}", addr);
    }

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
