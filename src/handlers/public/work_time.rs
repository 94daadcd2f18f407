use axum::{
    extract::{rejection::QueryRejection, Extension, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::Authentication;
use crate::database::models::WorkTimeShift;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkTimeQuery {
    #[serde(rename = "organizationID")]
    pub organization_id: Option<String>,
}

/// GET /api/get-work-time?organizationID=<id> - Shifts of the named organization
///
/// Public read endpoint: the organization comes from the query string. With
/// strict tenant binding enabled it must also be the caller's own.
///
/// Responds with a bare JSON array of shifts, `400` when `organizationID` is
/// absent, `500` on storage failure.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    query: Result<Query<WorkTimeQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkTimeShift>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e.body_text())))?;

    let tenant = state.tenants.for_request(&auth, query.organization_id.as_deref())?;
    let shifts = state.repository.list::<WorkTimeShift>(&tenant).await?;

    tracing::debug!("Listed {} work-time shifts for '{}'", shifts.len(), tenant);
    Ok(Json(shifts))
}
