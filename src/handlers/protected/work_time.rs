use axum::{
    extract::{rejection::JsonRejection, Extension, Query, State},
    Json,
};

use crate::auth::Authentication;
use crate::database::models::{Employee, NewWorkTimeShift, Route, WorkTimeShift};
use crate::error::ApiError;
use crate::handlers::public::work_time::WorkTimeQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::WorkTimeInfo;
use crate::AppState;

/// GET /api/pdf-worktime-info - Timecard lines for the caller's organization
///
/// The organization is always taken from the authenticated principal; an
/// `organizationID` in the query string is ignored.
///
/// Expected Output:
/// ```json
/// { "data": [ { "employee_name": "Ada Lovelace", "route_name": "North loop", "hours": "4.33", ... } ] }
/// ```
pub async fn pdf_info(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    query: Option<Query<WorkTimeQuery>>,
) -> ApiResult<Vec<WorkTimeInfo>> {
    let requested = query.as_ref().and_then(|Query(q)| q.organization_id.as_deref());
    let tenant = state.tenants.for_principal(&auth, requested)?;
    let lines = state.timecards.work_time_info(&tenant).await?;
    Ok(ApiResponse::success(lines))
}

/// POST /api/work-time - Record a shift in the caller's organization
///
/// Employee and route must belong to the same organization.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    payload: Result<Json<NewWorkTimeShift>, JsonRejection>,
) -> ApiResult<WorkTimeShift> {
    let Json(draft) = payload?;
    draft.validate().map_err(ApiError::bad_request)?;

    let tenant = state.tenants.for_principal(&auth, None)?;

    let employees: Vec<Employee> = state.repository.list(&tenant).await?;
    if !employees.iter().any(|e| e.id == draft.employee_id) {
        return Err(ApiError::bad_request("Unknown employee_id"));
    }
    if let Some(route_id) = draft.route_id {
        let routes: Vec<Route> = state.repository.list(&tenant).await?;
        if !routes.iter().any(|r| r.id == route_id) {
            return Err(ApiError::bad_request("Unknown route_id"));
        }
    }

    let shift = state.repository.insert(&tenant, draft.into_shift(&tenant)).await?;
    tracing::info!("Recorded shift {} for employee {} in '{}'", shift.id, shift.employee_id, tenant);
    Ok(ApiResponse::created(shift))
}
