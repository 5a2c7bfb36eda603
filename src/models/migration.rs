//! Per-call request/response values of the cloud migration service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateDatasourcesRequest {
    /// Also migrate private datasource connect (PDC) settings.
    pub migrate_to_pdc: bool,
    pub migrate_credentials: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateDatasourcesResponse {
    pub datasources_migrated: u64,
}

/// Result of a token rotation. Holds the only copy of the token secret.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccessTokenResponse {
    pub token: String,
}

impl std::fmt::Debug for CreateAccessTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccessTokenResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}
