pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod types;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::IdentityProvider;
use crate::config::{ApiConfig, SecurityConfig};
use crate::database::{Repository, TenantStore};
use crate::middleware::{auth_gate, PublicRoutes, TenantResolver};
use crate::services::{AccountDirectory, SubscriptionService, TimecardService};

/// Per-process collaborators shared by every request. Holds no per-request
/// or mutable state.
#[derive(Clone)]
pub struct AppState {
    pub repository: Repository,
    pub timecards: TimecardService,
    pub subscriptions: SubscriptionService,
    pub identity: Arc<dyn IdentityProvider>,
    pub tenants: TenantResolver,
    pub public_routes: Arc<PublicRoutes>,
    pub webhook_secret: Arc<str>,
    pub cors_origins: Arc<[String]>,
    pub max_request_size_bytes: usize,
    pub request_logging: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TenantStore>,
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn AccountDirectory>,
        api: &ApiConfig,
        security: &SecurityConfig,
    ) -> Self {
        let repository = Repository::new(store);
        Self {
            timecards: TimecardService::new(repository.clone()),
            repository,
            subscriptions: SubscriptionService::new(directory),
            identity,
            tenants: TenantResolver::new(security.strict_tenant_binding),
            public_routes: Arc::new(PublicRoutes::new(&security.public_routes)),
            webhook_secret: Arc::from(security.webhook_secret.as_str()),
            cors_origins: security.cors_origins.clone().into(),
            max_request_size_bytes: api.max_request_size_bytes,
            request_logging: api.enable_request_logging,
        }
    }

    fn cors_layer(&self) -> CorsLayer {
        if self.cors_origins.iter().any(|origin| origin == "*") {
            return CorsLayer::new().allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        CorsLayer::new().allow_origin(origins)
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(work_time_routes())
        .merge(catalog_routes())
        .merge(webhook_routes())
        // Gate matched routes only; unknown paths fall through to 404
        .route_layer(from_fn_with_state(state.clone(), auth_gate))
        // Global middleware
        .layer(DefaultBodyLimit::max(state.max_request_size_bytes))
        .layer(state.cors_layer());

    let router = if state.request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };
    router.with_state(state)
}

fn work_time_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/api/get-work-time", get(public::get_work_time))
        .route("/api/pdf-worktime-info", get(protected::pdf_worktime_info))
        .route("/api/work-time", post(protected::create_work_time))
}

fn catalog_routes() -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/api/routes", get(protected::list_routes))
        .route("/api/employees", get(protected::list_employees))
}

fn webhook_routes() -> Router<AppState> {
    use handlers::public;

    Router::new().route("/api/webhooks/subscription", post(public::subscription_webhook))
}
