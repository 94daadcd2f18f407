use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::IdentityConfig;

/// Account metadata together with the version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedMetadata {
    pub metadata: Map<String, Value>,
    pub version: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("account record changed since version was read")]
    VersionConflict,

    #[error("{0}")]
    Upstream(String),
}

/// Account records held by the external identity/billing service
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn fetch_metadata(&self, user_id: &str) -> Result<VersionedMetadata, DirectoryError>;

    /// Replace the account's metadata, failing with `VersionConflict` when the
    /// stored version no longer equals `expected_version`
    async fn write_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
        expected_version: &str,
    ) -> Result<VersionedMetadata, DirectoryError>;
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(default)]
    public_metadata: Map<String, Value>,
    updated_at: i64,
}

/// Hosted identity service REST client (`/v1/users/{id}`)
pub struct HttpAccountDirectory {
    client: Client,
    base_url: url::Url,
    secret_key: String,
}

impl HttpAccountDirectory {
    pub fn new(config: &IdentityConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let base_url = url::Url::parse(&config.api_base_url)?;

        Ok(Self {
            client,
            base_url,
            secret_key: config.secret_key.clone(),
        })
    }

    fn user_url(&self, user_id: &str, suffix: &[&str]) -> Result<url::Url, DirectoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DirectoryError::Upstream("identity API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "users", user_id])
            .extend(suffix);
        Ok(url)
    }

    /// The ETag exactly as sent (weak or strong), else the record's
    /// `updated_at` as a quoted entity tag. Either form goes back verbatim in
    /// `If-Match`.
    fn version_of(headers: &header::HeaderMap, record: &UserRecord) -> String {
        headers
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| format!("\"{}\"", record.updated_at))
    }

    async fn read_record(response: reqwest::Response) -> Result<VersionedMetadata, DirectoryError> {
        let headers = response.headers().clone();
        let record: UserRecord = response
            .json()
            .await
            .map_err(|e| DirectoryError::Upstream(format!("malformed user record: {}", e)))?;

        Ok(VersionedMetadata {
            version: Self::version_of(&headers, &record),
            metadata: record.public_metadata,
        })
    }
}

#[async_trait]
impl AccountDirectory for HttpAccountDirectory {
    async fn fetch_metadata(&self, user_id: &str) -> Result<VersionedMetadata, DirectoryError> {
        let response = self
            .client
            .get(self.user_url(user_id, &[])?)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| DirectoryError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DirectoryError::Upstream(format!(
                "GET user {} returned {}",
                user_id,
                response.status()
            )));
        }
        Self::read_record(response).await
    }

    async fn write_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
        expected_version: &str,
    ) -> Result<VersionedMetadata, DirectoryError> {
        let response = self
            .client
            .patch(self.user_url(user_id, &["metadata"])?)
            .bearer_auth(&self.secret_key)
            .header(header::IF_MATCH, expected_version)
            .json(&json!({ "public_metadata": metadata }))
            .send()
            .await
            .map_err(|e| DirectoryError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Err(DirectoryError::VersionConflict),
            status if status.is_success() => Self::read_record(response).await,
            status => Err(DirectoryError::Upstream(format!(
                "PATCH metadata for user {} returned {}",
                user_id, status
            ))),
        }
    }
}

/// In-process directory for development and tests. Versions are counters.
#[derive(Default)]
pub struct MemoryAccountDirectory {
    users: RwLock<HashMap<String, (Map<String, Value>, u64)>>,
}

impl MemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user_id: impl Into<String>, metadata: Map<String, Value>) {
        self.users.write().await.insert(user_id.into(), (metadata, 1));
    }

    pub async fn metadata(&self, user_id: &str) -> Option<Map<String, Value>> {
        self.users.read().await.get(user_id).map(|(metadata, _)| metadata.clone())
    }
}

#[async_trait]
impl AccountDirectory for MemoryAccountDirectory {
    async fn fetch_metadata(&self, user_id: &str) -> Result<VersionedMetadata, DirectoryError> {
        let users = self.users.read().await;
        let (metadata, version) = users
            .get(user_id)
            .ok_or_else(|| DirectoryError::Upstream(format!("user {} not found", user_id)))?;

        Ok(VersionedMetadata {
            metadata: metadata.clone(),
            version: version.to_string(),
        })
    }

    async fn write_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
        expected_version: &str,
    ) -> Result<VersionedMetadata, DirectoryError> {
        let mut users = self.users.write().await;
        let (stored, version) = users
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::Upstream(format!("user {} not found", user_id)))?;

        if version.to_string() != expected_version {
            return Err(DirectoryError::VersionConflict);
        }

        *stored = metadata.clone();
        *version += 1;
        Ok(VersionedMetadata {
            metadata: stored.clone(),
            version: version.to_string(),
        })
    }
}
