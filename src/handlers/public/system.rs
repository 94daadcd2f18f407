use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - Service descriptor
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "data": {
            "name": "Work-time API",
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "work_time": "/api/get-work-time?organizationID=<id> (public)",
                "pdf_worktime_info": "/api/pdf-worktime-info (authenticated)",
                "create_work_time": "POST /api/work-time (authenticated)",
                "routes": "/api/routes (authenticated)",
                "employees": "/api/employees (authenticated)",
                "subscription_webhook": "POST /api/webhooks/subscription (shared secret)"
            }
        }
    }))
}

/// GET /health - Store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}
