//! HTTP client for the GCOM access-policy API.
//!
//! Plain reqwest client, no retry middleware: a failed call surfaces to the
//! caller immediately. Per-call deadlines are applied by the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::*;

pub struct GcomClient {
    api_url: String,
    token: String,
    http: Client,
}

impl GcomClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, GcomError> {
        let http = Client::builder()
            .use_rustls_tls()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("cloudmigration/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_url: api_url.into(),
            token: token.into(),
            http,
        })
    }

    /// Appends `segments` to the configured base URL, keeping any base path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GcomError> {
        let mut url =
            Url::parse(&self.api_url).map_err(|e| GcomError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| GcomError::InvalidUrl(format!("{} cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, req: RequestBuilder, request_id: &str) -> RequestBuilder {
        req.bearer_auth(&self.token)
            .header("x-request-id", request_id)
            .header("accept", "application/json")
    }

    async fn check(resp: Response) -> Result<Response, GcomError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GcomError::Status {
            status: status.as_u16(),
            body: body.chars().take(512).collect(),
        })
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, GcomError> {
        let resp = Self::check(resp).await?;
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl GcomService for GcomClient {
    async fn list_access_policies(
        &self,
        params: ListAccessPoliciesParams,
    ) -> Result<Vec<AccessPolicy>, GcomError> {
        let url = self.endpoint(&["v1", "accesspolicies"])?;
        let req = self
            .http
            .get(url)
            .query(&[("region", params.region.as_str()), ("name", params.name.as_str())]);

        let resp = self.authorized(req, &params.request_id).send().await?;
        let body: ListAccessPoliciesResponse = Self::parse(resp).await?;
        Ok(body.items)
    }

    async fn delete_access_policy(
        &self,
        params: DeleteAccessPolicyParams,
    ) -> Result<bool, GcomError> {
        let url = self.endpoint(&["v1", "accesspolicies", &params.access_policy_id])?;
        let req = self
            .http
            .delete(url)
            .query(&[("region", params.region.as_str())]);

        let resp = self.authorized(req, &params.request_id).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(id = %params.access_policy_id, "access policy already gone");
            return Ok(false);
        }
        Self::check(resp).await?;
        Ok(true)
    }

    async fn create_access_policy(
        &self,
        params: CreateAccessPolicyParams,
        payload: CreateAccessPolicyPayload,
    ) -> Result<AccessPolicy, GcomError> {
        let url = self.endpoint(&["v1", "accesspolicies"])?;
        let req = self
            .http
            .post(url)
            .query(&[("region", params.region.as_str())])
            .json(&payload);

        let resp = self.authorized(req, &params.request_id).send().await?;
        Self::parse(resp).await
    }

    async fn create_token(
        &self,
        params: CreateTokenParams,
        payload: CreateTokenPayload,
    ) -> Result<Token, GcomError> {
        let url = self.endpoint(&["v1", "tokens"])?;
        let req = self
            .http
            .post(url)
            .query(&[("region", params.region.as_str())])
            .json(&payload);

        let resp = self.authorized(req, &params.request_id).send().await?;
        Self::parse(resp).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
