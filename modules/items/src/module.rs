use std::sync::Arc;

use async_trait::async_trait;
use modkit::{DbModule, RestfulModule};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::openapi::ItemsApiDoc;
use crate::api::rest::routes;
use crate::config::ItemsConfig;
use crate::domain::service::{Service, ServiceConfig};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmItemsRepository;

/// Item catalog module: owns the `items` table and the `/items` routes.
///
/// The connection is created by the host and handed in; the module wires
/// repository → service → routes from it.
pub struct ItemsModule {
    db: DatabaseConnection,
    service: Arc<Service>,
}

impl ItemsModule {
    pub const NAME: &'static str = "items";

    pub fn new(db: DatabaseConnection, cfg: ItemsConfig) -> Self {
        debug!(
            "Loaded items config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );
        let repo = SeaOrmItemsRepository::new(db.clone());
        let service = Service::new(Arc::new(repo), ServiceConfig::from(&cfg));
        Self {
            db,
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }
}

#[async_trait]
impl DbModule for ItemsModule {
    async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running items database migrations");
        Migrator::up(&self.db, None).await?;
        info!("Items database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for ItemsModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering items REST routes");
        let router = routes::register_routes(router, self.service.clone())?;
        info!("Items REST routes registered successfully");
        Ok(router)
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(ItemsApiDoc::openapi())
    }
}
