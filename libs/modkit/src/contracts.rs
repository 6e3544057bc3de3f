use async_trait::async_trait;
use axum::Router;

/// Module that owns persistent state and must bring its schema up to date.
#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs BEFORE REST wiring and before the server accepts traffic.
    async fn migrate(&self) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
pub trait RestfulModule: Send + Sync {
    /// Stable module name, used for logging and config lookup.
    fn name(&self) -> &'static str;

    fn register_rest(&self, router: Router) -> anyhow::Result<Router>;

    /// OpenAPI fragment describing the routes added by `register_rest`.
    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        None
    }
}
