//! PostgREST-style HTTP backend.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use sitebook_shared::config::BackendConfig;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::query::{Query, Table};
use crate::repository::Repository;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Table access over the backend's REST interface.
///
/// Every request carries the project `apikey` header and a bearer token:
/// the signed-in user's access token when present, the API key otherwise.
#[derive(Debug, Clone)]
pub struct RestRepository {
    base_url: Url,
    http: reqwest::Client,
    api_key: String,
    access_token: Option<String>,
}

impl RestRepository {
    /// Builds a client from backend settings.
    pub fn new(config: &BackendConfig) -> Result<Self, StoreError> {
        let base_url = parse_base_url(&config.url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            base_url,
            http,
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Returns a copy that authenticates as the signed-in user.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn endpoint(&self, table: Table) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("rest/v1/{}", table.name()))
            .map_err(|err| StoreError::Configuration(format!("invalid backend url: {err}")))
    }

    fn request(&self, method: Method, table: Table) -> Result<RequestBuilder, StoreError> {
        let token = self.access_token.as_deref().unwrap_or(&self.api_key);
        Ok(self
            .http
            .request(method, self.endpoint(table)?)
            .header("apikey", &self.api_key)
            .bearer_auth(token))
    }

    async fn rows(res: Response) -> Result<Vec<Value>, StoreError> {
        let res = check(res).await?;
        Ok(res.json::<Vec<Value>>().await?)
    }

    async fn single(table: Table, id: &str, res: Response) -> Result<Value, StoreError> {
        Self::rows(res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("{table} row {id}")))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, StoreError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|err| StoreError::Configuration(format!("invalid backend url: {err}")))
}

async fn check(res: Response) -> Result<Response, StoreError> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status().as_u16();
    let message = res
        .json::<ErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!(status, %message, "backend request failed");
    Err(StoreError::from_status(status, message))
}

#[async_trait]
impl Repository for RestRepository {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        debug!(table = %query.table, filters = query.filters.len(), "select");
        let res = self
            .request(Method::GET, query.table)?
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::rows(res).await
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        debug!(%table, "insert");
        let res = self
            .request(Method::POST, table)?
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        Self::single(table, "(new)", res).await
    }

    async fn update(&self, table: Table, id: &str, row: Value) -> Result<Value, StoreError> {
        debug!(%table, id, "update");
        let res = self
            .request(Method::PATCH, table)?
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(&row)
            .send()
            .await?;
        Self::single(table, id, res).await
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        debug!(%table, id, "delete");
        let res = self
            .request(Method::DELETE, table)?
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::single(table, id, res).await.map(|_| ())
    }
}
