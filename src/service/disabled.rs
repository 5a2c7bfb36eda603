use async_trait::async_trait;

use super::CloudMigrationService;
use crate::errors::CloudMigrationError;
use crate::models::migration::{
    CreateAccessTokenResponse, MigrateDatasourcesRequest, MigrateDatasourcesResponse,
};

/// Stand-in used when the cloud migration feature toggle is off.
pub struct DisabledService;

#[async_trait]
impl CloudMigrationService for DisabledService {
    async fn migrate_datasources(
        &self,
        _request: MigrateDatasourcesRequest,
    ) -> Result<MigrateDatasourcesResponse, CloudMigrationError> {
        Err(CloudMigrationError::FeatureDisabled)
    }

    async fn create_access_token(&self) -> Result<CreateAccessTokenResponse, CloudMigrationError> {
        Err(CloudMigrationError::FeatureDisabled)
    }
}
