pub mod postgres;

use async_trait::async_trait;

use crate::models::migration::{MigrateDatasourcesRequest, MigrateDatasourcesResponse};

pub use postgres::PgStore;

/// Persistence layer that performs the actual datasource migration.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    async fn migrate_datasources(
        &self,
        request: MigrateDatasourcesRequest,
    ) -> anyhow::Result<MigrateDatasourcesResponse>;
}
