use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

#[derive(Debug, Deserialize)]
pub struct SubscriptionEvent {
    pub user_id: String,
    pub metadata: Value,
}

/// POST /api/webhooks/subscription - Billing provider pushes subscription state
///
/// Expected Input:
/// ```json
/// { "user_id": "user_2abc", "metadata": { "plan": "pro", "status": "active" } }
/// ```
///
/// Merges `metadata` into the user's account metadata and returns the result.
pub async fn subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SubscriptionEvent>, JsonRejection>,
) -> ApiResult<Map<String, Value>> {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !secret_matches(provided, &state.webhook_secret) {
        tracing::warn!("Rejected subscription webhook with invalid secret");
        return Err(ApiError::unauthorized("Invalid webhook secret"));
    }

    let Json(event) = payload?;
    if event.user_id.trim().is_empty() {
        return Err(ApiError::bad_request("user_id is required"));
    }
    let Value::Object(patch) = event.metadata else {
        return Err(ApiError::bad_request("metadata must be a JSON object"));
    };

    let merged = state
        .subscriptions
        .merge_subscription_metadata(event.user_id.trim(), patch)
        .await?;
    Ok(ApiResponse::success(merged))
}

/// Compares digests so timing does not depend on where the inputs differ
fn secret_matches(provided: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
