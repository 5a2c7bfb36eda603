use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::gcom::GcomError;

/// Failures of the cloud migration service operations.
#[derive(Debug, Error)]
pub enum CloudMigrationError {
    #[error("cloud migrations are disabled on this instance")]
    FeatureDisabled,

    #[error("fetching access policy by name: name={name} region={region}: {source}")]
    Lookup {
        name: String,
        region: String,
        #[source]
        source: GcomError,
    },

    #[error("deleting access policy: id={id} region={region}: {source}")]
    Deletion {
        id: String,
        region: String,
        #[source]
        source: GcomError,
    },

    #[error("creating access policy: name={name} region={region}: {source}")]
    Creation {
        name: String,
        region: String,
        #[source]
        source: GcomError,
    },

    #[error("creating access token: policy_id={policy_id} region={region}: {source}")]
    TokenCreation {
        policy_id: String,
        region: String,
        #[source]
        source: GcomError,
    },

    #[error("data source migration failed: {0}")]
    Store(#[source] anyhow::Error),
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request data: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// A service failure, with the operation-level message shown to clients.
    #[error("{message}: {source}")]
    Service {
        message: &'static str,
        #[source]
        source: CloudMigrationError,
    },
}

impl AppError {
    pub fn service(message: &'static str, source: CloudMigrationError) -> Self {
        AppError::Service { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::BadRequest(e) => {
                tracing::debug!("rejecting request body: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "invalid_request_error",
                    "bad_request",
                    "bad request data".to_string(),
                )
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "unauthorized",
                "invalid or missing admin key".to_string(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "invalid_request_error",
                "not_found",
                "route not found".to_string(),
            ),
            AppError::Service { message, source } => {
                tracing::error!(err = %source, "{}", message);
                let code = match source {
                    CloudMigrationError::FeatureDisabled => "feature_disabled",
                    CloudMigrationError::Store(_) => "store_error",
                    _ => "gcom_error",
                };
                let msg = match source {
                    CloudMigrationError::FeatureDisabled => source.to_string(),
                    _ => message.to_string(),
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    code,
                    msg,
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
