use axum::extract::{Extension, State};

use crate::auth::Authentication;
use crate::database::models::{Employee, Route};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/routes
pub async fn routes(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
) -> ApiResult<Vec<Route>> {
    let tenant = state.tenants.for_principal(&auth, None)?;
    Ok(ApiResponse::success(state.repository.list(&tenant).await?))
}

/// GET /api/employees
pub async fn employees(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
) -> ApiResult<Vec<Employee>> {
    let tenant = state.tenants.for_principal(&auth, None)?;
    Ok(ApiResponse::success(state.repository.list(&tenant).await?))
}
