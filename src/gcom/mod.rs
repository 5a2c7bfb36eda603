//! GCOM access-policy API: wire types and the service abstraction.
//!
//! The rotation workflow only talks to [`GcomService`]; [`client::GcomClient`]
//! is the HTTP implementation used in production.

pub mod client;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::GcomClient;

#[derive(Debug, Error)]
pub enum GcomError {
    #[error("gcom request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gcom returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("gcom call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid gcom url: {0}")]
    InvalidUrl(String),
}

// ── Wire types ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub realms: Vec<Realm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
    #[serde(default)]
    pub label_policies: Vec<LabelPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPolicy {
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub access_policy_id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub first_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Secret value. Only present in the creation response.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListAccessPoliciesResponse {
    #[serde(default)]
    pub items: Vec<AccessPolicy>,
}

// ── Call parameters ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ListAccessPoliciesParams {
    pub request_id: String,
    pub region: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteAccessPolicyParams {
    pub request_id: String,
    pub access_policy_id: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct CreateAccessPolicyParams {
    pub request_id: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessPolicyPayload {
    pub name: String,
    pub display_name: String,
    pub realms: Vec<Realm>,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTokenParams {
    pub request_id: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenPayload {
    pub access_policy_id: String,
    pub name: String,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Access-policy operations exposed by GCOM.
#[async_trait]
pub trait GcomService: Send + Sync {
    async fn list_access_policies(
        &self,
        params: ListAccessPoliciesParams,
    ) -> Result<Vec<AccessPolicy>, GcomError>;

    /// Returns `false` when the policy did not exist.
    async fn delete_access_policy(
        &self,
        params: DeleteAccessPolicyParams,
    ) -> Result<bool, GcomError>;

    async fn create_access_policy(
        &self,
        params: CreateAccessPolicyParams,
        payload: CreateAccessPolicyPayload,
    ) -> Result<AccessPolicy, GcomError>;

    async fn create_token(
        &self,
        params: CreateTokenParams,
        payload: CreateTokenPayload,
    ) -> Result<Token, GcomError>;
}
