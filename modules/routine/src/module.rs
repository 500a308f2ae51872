use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use routine_db::DbHandle;
use runtime::config::{default_logging_config, AppConfig};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::RoutineConfig;
use crate::domain::mappings::{property_mapping_service, RoutineMappings};
use crate::domain::repo::CompanyRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmCompanyRepository;

/// Module name, also the key of its section under `modules`.
pub const MODULE_NAME: &str = "routine";

/// Wired module: database handle, mapping registry and settings.
pub struct Routine {
    config: RoutineConfig,
    db: DbHandle,
    mappings: Arc<RoutineMappings>,
}

impl Routine {
    /// Load configuration, install logging, then [`Routine::init`].
    pub async fn bootstrap(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let app = AppConfig::load_or_default(config_path)?;
        let logging = app.logging.clone().unwrap_or_else(default_logging_config);
        runtime::init_logging_from_config(&logging, Path::new(&app.home_dir));
        Self::init(&app).await
    }

    /// Connect the configured database, apply migrations and register mappings.
    pub async fn init(app: &AppConfig) -> anyhow::Result<Self> {
        info!("Initializing routine module");

        let config: RoutineConfig = app.module_config(MODULE_NAME)?;
        debug!(
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            "loaded routine config"
        );

        let db = DbHandle::from_config(&app.database_or_default())
            .await
            .context("Failed to connect database")?;
        Self::with_db(db, config).await
    }

    /// Same as [`Routine::init`] over an existing handle.
    pub async fn with_db(db: DbHandle, config: RoutineConfig) -> anyhow::Result<Self> {
        Self::migrate(&db).await?;
        Ok(Self {
            config,
            db,
            mappings: Arc::new(property_mapping_service()),
        })
    }

    pub async fn migrate(db: &DbHandle) -> anyhow::Result<()> {
        info!("Running routine database migrations");
        Migrator::up(db.seaorm(), None)
            .await
            .context("routine migrations failed")?;
        info!("Routine database migrations completed successfully");
        Ok(())
    }

    /// Repository over the shared connection pool.
    pub fn repository(&self) -> Arc<dyn CompanyRepository> {
        Arc::new(
            SeaOrmCompanyRepository::new(self.db.sea(), self.mappings.clone())
                .with_page_size(self.config.page_size_cfg()),
        )
    }

    pub fn mappings(&self) -> Arc<RoutineMappings> {
        self.mappings.clone()
    }

    pub fn config(&self) -> &RoutineConfig {
        &self.config
    }

    pub fn db(&self) -> &DbHandle {
        &self.db
    }

    pub async fn shutdown(self) {
        self.db.close().await;
    }
}
