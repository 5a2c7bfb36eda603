use async_trait::async_trait;
use sqlx::PgPool;

use super::MigrationStore;
use crate::models::migration::{MigrateDatasourcesRequest, MigrateDatasourcesResponse};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Builds the pool without connecting; the first query opens a connection.
    pub fn connect_lazy(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MigrationStore for PgStore {
    /// Stages every datasource of the installation for migration in one
    /// transaction. Re-running refreshes the flags and timestamp.
    async fn migrate_datasources(
        &self,
        request: MigrateDatasourcesRequest,
    ) -> anyhow::Result<MigrateDatasourcesResponse> {
        let mut tx = self.pool.begin().await?;

        let staged = sqlx::query(
            r#"INSERT INTO cloud_migration_datasource (datasource_uid, migrate_to_pdc, migrate_credentials)
               SELECT uid, $1, $2 FROM data_source
               ON CONFLICT (datasource_uid) DO UPDATE
               SET migrate_to_pdc = EXCLUDED.migrate_to_pdc,
                   migrate_credentials = EXCLUDED.migrate_credentials,
                   migrated_at = NOW()"#,
        )
        .bind(request.migrate_to_pdc)
        .bind(request.migrate_credentials)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            datasources = staged.rows_affected(),
            migrate_to_pdc = request.migrate_to_pdc,
            migrate_credentials = request.migrate_credentials,
            "staged datasources for cloud migration"
        );

        Ok(MigrateDatasourcesResponse {
            datasources_migrated: staged.rows_affected(),
        })
    }
}
