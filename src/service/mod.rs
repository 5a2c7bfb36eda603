//! The cloud migration service and its wiring-time feature gate.
//!
//! Two implementations share the [`CloudMigrationService`] contract:
//! [`ActiveService`] does the work, [`DisabledService`] refuses every call.
//! [`provide_service`] picks one from the feature toggles exactly once.

pub mod active;
pub mod disabled;

use std::sync::Arc;

use async_trait::async_trait;
use prometheus::Registry;

use crate::config::{Config, FLAG_ON_PREM_TO_CLOUD_MIGRATIONS};
use crate::errors::CloudMigrationError;
use crate::gcom::GcomService;
use crate::metrics::Metrics;
use crate::models::migration::{
    CreateAccessTokenResponse, MigrateDatasourcesRequest, MigrateDatasourcesResponse,
};
use crate::store::MigrationStore;

pub use active::ActiveService;
pub use disabled::DisabledService;

/// Name of the access policy (and token) this service owns on GCOM.
pub const CLOUD_MIGRATION_ACCESS_POLICY_NAME: &str = "grafana-cloud-migrations";
pub const CLOUD_MIGRATION_TOKEN_NAME: &str = "grafana-cloud-migrations";

pub const CLOUD_MIGRATION_SCOPES: [&str; 2] = ["cloud-migrations:read", "cloud-migrations:write"];

#[async_trait]
pub trait CloudMigrationService: Send + Sync {
    async fn migrate_datasources(
        &self,
        request: MigrateDatasourcesRequest,
    ) -> Result<MigrateDatasourcesResponse, CloudMigrationError>;

    /// Replaces the service's access policy on GCOM and mints a fresh token.
    async fn create_access_token(&self) -> Result<CreateAccessTokenResponse, CloudMigrationError>;
}

/// The store and GCOM client an active service is built from.
pub type Collaborators = (Arc<dyn MigrationStore>, Arc<dyn GcomService>);

/// Selects the service implementation for this process.
///
/// `build` runs only when the feature toggle is on. A disabled instance never
/// constructs its collaborators and registers nothing.
pub fn provide_service<F>(
    cfg: &Config,
    registry: &Registry,
    build: F,
) -> anyhow::Result<Arc<dyn CloudMigrationService>>
where
    F: FnOnce() -> anyhow::Result<Collaborators>,
{
    if !cfg
        .features
        .is_enabled_globally(FLAG_ON_PREM_TO_CLOUD_MIGRATIONS)
    {
        tracing::info!(
            flag = FLAG_ON_PREM_TO_CLOUD_MIGRATIONS,
            "cloud migrations disabled"
        );
        return Ok(Arc::new(DisabledService));
    }

    let (store, gcom) = build()?;
    let metrics = Metrics::new();
    if let Err(e) = metrics.register(registry) {
        tracing::warn!(error = %e, "error registering prom metrics");
    }

    Ok(Arc::new(ActiveService::new(
        cfg.cloud_migration.clone(),
        cfg.stack_id.clone(),
        cfg.slug.clone(),
        store,
        gcom,
        metrics,
    )))
}
