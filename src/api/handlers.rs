use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::migration::MigrateDatasourcesRequest;
use crate::AppState;

// ── Request / Response DTOs ──────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MigrateDatasourcesRequestDto {
    #[serde(default, rename = "migrateToPDC")]
    pub migrate_to_pdc: bool,
    #[serde(default, rename = "migrateCredentials")]
    pub migrate_credentials: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateDatasourcesResponseDto {
    pub datasources_migrated: u64,
}

#[derive(Serialize)]
pub struct CreateAccessTokenResponseDto {
    pub token: String,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /api/cloudmigrations/migrate_datasources
pub async fn migrate_datasources(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MigrateDatasourcesRequestDto>, JsonRejection>,
) -> Result<Json<MigrateDatasourcesResponseDto>, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let resp = state
        .service
        .migrate_datasources(MigrateDatasourcesRequest {
            migrate_to_pdc: req.migrate_to_pdc,
            migrate_credentials: req.migrate_credentials,
        })
        .await
        .map_err(|e| AppError::service("data source migrations error", e))?;

    Ok(Json(MigrateDatasourcesResponseDto {
        datasources_migrated: resp.datasources_migrated,
    }))
}

/// POST /api/cloudmigrations/token
pub async fn create_access_token(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreateAccessTokenResponseDto>, AppError> {
    let resp = state
        .service
        .create_access_token()
        .await
        .map_err(|e| AppError::service("creating gcom access token", e))?;

    Ok(Json(CreateAccessTokenResponseDto { token: resp.token }))
}
