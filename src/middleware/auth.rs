use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::AppState;

/// Allow-list of paths reachable without a principal.
///
/// Patterns are exact paths, or `prefix/*` to open a whole subtree. Matching
/// ignores a trailing slash.
#[derive(Debug, Clone, Default)]
pub struct PublicRoutes {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl PublicRoutes {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut routes = Self::default();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if let Some(prefix) = pattern.strip_suffix("/*") {
                routes.prefixes.push(format!("{}/", prefix));
            } else if !pattern.is_empty() {
                routes.exact.push(normalize(pattern).to_string());
            }
        }
        routes
    }

    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize(path);
        self.exact.iter().any(|p| p == path)
            || self
                .prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()) || format!("{}/", path) == *prefix)
    }
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Authenticates every request and stores the `Authentication` in request
/// extensions. Paths outside the allow-list are rejected without a principal.
pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let authentication = state.identity.authenticate(request.headers()).await;
    let public = state.public_routes.is_public(request.uri().path());

    if !public && authentication.principal().is_none() {
        tracing::debug!("Rejected unauthenticated request to {}", request.uri().path());
        return ApiError::unauthenticated("Unauthenticated").into_response();
    }

    request.extensions_mut().insert(authentication);
    next.run(request).await
}
