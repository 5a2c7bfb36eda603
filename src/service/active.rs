//! Active cloud migration service: datasource migration dispatch and GCOM
//! access token rotation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{
    CloudMigrationService, CLOUD_MIGRATION_ACCESS_POLICY_NAME, CLOUD_MIGRATION_SCOPES,
    CLOUD_MIGRATION_TOKEN_NAME,
};
use crate::config::CloudMigrationSettings;
use crate::errors::CloudMigrationError;
use crate::gcom::{
    AccessPolicy, CreateAccessPolicyParams, CreateAccessPolicyPayload, CreateTokenParams,
    CreateTokenPayload, DeleteAccessPolicyParams, GcomError, GcomService,
    ListAccessPoliciesParams, Realm,
};
use crate::metrics::Metrics;
use crate::models::migration::{
    CreateAccessTokenResponse, MigrateDatasourcesRequest, MigrateDatasourcesResponse,
};
use crate::store::MigrationStore;

/// Lifetime of a minted migration token, in hours.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 7 * 24;

pub struct ActiveService {
    settings: CloudMigrationSettings,
    stack_id: String,
    slug: String,
    store: Arc<dyn MigrationStore>,
    gcom: Arc<dyn GcomService>,
    metrics: Metrics,
}

impl ActiveService {
    pub fn new(
        settings: CloudMigrationSettings,
        stack_id: String,
        slug: String,
        store: Arc<dyn MigrationStore>,
        gcom: Arc<dyn GcomService>,
        metrics: Metrics,
    ) -> Self {
        Self {
            settings,
            stack_id,
            slug,
            store,
            gcom,
            metrics,
        }
    }

    /// Lists policies in the configured region and returns the one whose name
    /// matches exactly, if any.
    #[tracing::instrument(skip(self), fields(region = %self.settings.region))]
    async fn find_access_policy_by_name(
        &self,
        request_id: &str,
        name: &str,
    ) -> Result<Option<AccessPolicy>, GcomError> {
        let policies = with_deadline(
            self.settings.fetch_access_policy_timeout,
            self.gcom.list_access_policies(ListAccessPoliciesParams {
                request_id: request_id.to_string(),
                region: self.settings.region.clone(),
                name: name.to_string(),
            }),
        )
        .await?;

        Ok(policies.into_iter().find(|p| p.name == name))
    }
}

/// Bounds a single GCOM call. Dropping the future on expiry cancels the call.
async fn with_deadline<T, F>(limit: Duration, call: F) -> Result<T, GcomError>
where
    F: Future<Output = Result<T, GcomError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GcomError::Timeout(limit)),
    }
}

#[async_trait]
impl CloudMigrationService for ActiveService {
    #[tracing::instrument(skip(self))]
    async fn migrate_datasources(
        &self,
        request: MigrateDatasourcesRequest,
    ) -> Result<MigrateDatasourcesResponse, CloudMigrationError> {
        self.store
            .migrate_datasources(request)
            .await
            .map_err(CloudMigrationError::Store)
    }

    #[tracing::instrument(skip(self), fields(request_id))]
    async fn create_access_token(&self) -> Result<CreateAccessTokenResponse, CloudMigrationError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let region = &self.settings.region;

        // 1. lookup
        let existing = self
            .find_access_policy_by_name(&request_id, CLOUD_MIGRATION_ACCESS_POLICY_NAME)
            .await
            .map_err(|source| CloudMigrationError::Lookup {
                name: CLOUD_MIGRATION_ACCESS_POLICY_NAME.to_string(),
                region: region.clone(),
                source,
            })?;

        // 2. a failed delete aborts: never create a second policy with the same name
        if let Some(existing) = existing {
            with_deadline(
                self.settings.delete_access_policy_timeout,
                self.gcom.delete_access_policy(DeleteAccessPolicyParams {
                    request_id: request_id.clone(),
                    access_policy_id: existing.id.clone(),
                    region: region.clone(),
                }),
            )
            .await
            .map_err(|source| CloudMigrationError::Deletion {
                id: existing.id.clone(),
                region: region.clone(),
                source,
            })?;
            tracing::info!(id = %existing.id, name = %existing.name, "deleted access policy");
        }

        // 3. create
        let access_policy = with_deadline(
            self.settings.create_access_policy_timeout,
            self.gcom.create_access_policy(
                CreateAccessPolicyParams {
                    request_id: request_id.clone(),
                    region: region.clone(),
                },
                CreateAccessPolicyPayload {
                    name: CLOUD_MIGRATION_ACCESS_POLICY_NAME.to_string(),
                    display_name: CLOUD_MIGRATION_ACCESS_POLICY_NAME.to_string(),
                    realms: vec![Realm {
                        kind: "stack".to_string(),
                        identifier: self.stack_id.clone(),
                        label_policies: vec![],
                    }],
                    scopes: CLOUD_MIGRATION_SCOPES.iter().map(|s| s.to_string()).collect(),
                },
            ),
        )
        .await
        .map_err(|source| CloudMigrationError::Creation {
            name: CLOUD_MIGRATION_ACCESS_POLICY_NAME.to_string(),
            region: region.clone(),
            source,
        })?;
        tracing::info!(id = %access_policy.id, name = %access_policy.name, "created access policy");

        // 4. mint
        let token = with_deadline(
            self.settings.create_token_timeout,
            self.gcom.create_token(
                CreateTokenParams {
                    request_id: request_id.clone(),
                    region: region.clone(),
                },
                CreateTokenPayload {
                    access_policy_id: access_policy.id.clone(),
                    name: CLOUD_MIGRATION_TOKEN_NAME.to_string(),
                    display_name: CLOUD_MIGRATION_TOKEN_NAME.to_string(),
                    expires_at: Utc::now() + chrono::Duration::hours(ACCESS_TOKEN_TTL_HOURS),
                },
            ),
        )
        .await
        .map_err(|source| CloudMigrationError::TokenCreation {
            policy_id: access_policy.id.clone(),
            region: region.clone(),
            source,
        })?;
        tracing::info!(id = %token.id, name = %token.name, "created access token");

        self.metrics.record_access_token_created(&self.slug);

        Ok(CreateAccessTokenResponse { token: token.token })
    }
}

// ── Tests ──────────────────────────────────────────────────────
