use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use super::account_directory::{AccountDirectory, DirectoryError};

pub const UPDATED_AT_KEY: &str = "updatedAt";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("metadata update failed: {0}")]
    MetadataUpdateFailed(String),

    #[error("metadata for user {user_id} was modified concurrently")]
    ConcurrentModification { user_id: String },
}

/// `{...existing, ...patch, updatedAt: now}`
pub fn merge_metadata(
    mut existing: Map<String, Value>,
    patch: Map<String, Value>,
    now: DateTime<Utc>,
) -> Map<String, Value> {
    existing.extend(patch);
    existing.insert(
        UPDATED_AT_KEY.to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    );
    existing
}

/// Keeps billing state on the identity provider's account record
#[derive(Clone)]
pub struct SubscriptionService {
    directory: Arc<dyn AccountDirectory>,
}

impl SubscriptionService {
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self { directory }
    }

    /// Read-merge-write guarded by the version read. A writer that lost the
    /// race gets `ConcurrentModification` instead of silently dropping the
    /// other writer's fields. No retry.
    pub async fn merge_subscription_metadata(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> Result<Map<String, Value>, IdentityError> {
        let current = self
            .directory
            .fetch_metadata(user_id)
            .await
            .map_err(|e| IdentityError::MetadataUpdateFailed(e.to_string()))?;

        let merged = merge_metadata(current.metadata, patch, Utc::now());

        match self.directory.write_metadata(user_id, &merged, &current.version).await {
            Ok(written) => {
                tracing::info!("Updated subscription metadata for user '{}'", user_id);
                Ok(written.metadata)
            }
            Err(DirectoryError::VersionConflict) => Err(IdentityError::ConcurrentModification {
                user_id: user_id.to_string(),
            }),
            Err(DirectoryError::Upstream(msg)) => Err(IdentityError::MetadataUpdateFailed(msg)),
        }
    }
}
