#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use worktime_api::auth::{generate_jwt, Claims, JwtIdentityProvider};
use worktime_api::config::{AppConfig, SecurityConfig};
use worktime_api::database::{Fixtures, MemoryStore};
use worktime_api::services::MemoryAccountDirectory;
use worktime_api::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const WEBHOOK_SECRET: &str = "integration-webhook-secret";

pub const ORG_A: &str = "org123";
pub const ORG_B: &str = "org456";
pub const EMPLOYEE_A: &str = "11111111-1111-4111-8111-111111111111";
pub const EMPLOYEE_B: &str = "22222222-2222-4222-8222-222222222222";
pub const ROUTE_A: &str = "33333333-3333-4333-8333-333333333333";
pub const SHIFT_A: &str = "55555555-5555-4555-8555-555555555555";
pub const SHIFT_B: &str = "77777777-7777-4777-8777-777777777777";

/// One employee, route and shift per organization
pub const FIXTURES: &str = r#"
employees:
  - id: 11111111-1111-4111-8111-111111111111
    organization_id: org123
    first_name: Ada
    last_name: Lovelace
    email: ada@example.com
  - id: 22222222-2222-4222-8222-222222222222
    organization_id: org456
    first_name: Grace
    last_name: Hopper
routes:
  - id: 33333333-3333-4333-8333-333333333333
    organization_id: org123
    name: North loop
  - id: 44444444-4444-4444-8444-444444444444
    organization_id: org456
    name: Harbor run
work_times:
  - id: 55555555-5555-4555-8555-555555555555
    organization_id: org123
    employee_id: 11111111-1111-4111-8111-111111111111
    route_id: 33333333-3333-4333-8333-333333333333
    start_time: 2024-03-05T08:00:00Z
    end_time: 2024-03-05T16:30:00Z
    break_minutes: 30
    created_at: 2024-03-05T16:31:00Z
  - id: 77777777-7777-4777-8777-777777777777
    organization_id: org456
    employee_id: 22222222-2222-4222-8222-222222222222
    start_time: 2024-03-05T09:00:00Z
    end_time: 2024-03-05T17:00:00Z
    created_at: 2024-03-05T17:05:00Z
"#;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub directory: Arc<MemoryAccountDirectory>,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_security(|_| {})
    }

    pub fn with_security(configure: impl FnOnce(&mut SecurityConfig)) -> Result<Self> {
        Self::with_config(|config| configure(&mut config.security))
    }

    /// Development config with the test secrets, adjusted by `configure`
    pub fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.jwt_secret = JWT_SECRET.to_string();
        config.security.webhook_secret = WEBHOOK_SECRET.to_string();
        configure(&mut config);

        let store = Arc::new(MemoryStore::with_fixtures(Fixtures::from_yaml(FIXTURES)?)?);
        let directory = Arc::new(MemoryAccountDirectory::new());
        let state = AppState::new(
            store.clone(),
            Arc::new(JwtIdentityProvider::new(&config.security)),
            directory.clone(),
            &config.api,
            &config.security,
        );

        Ok(Self {
            router: worktime_api::app(state),
            store,
            directory,
        })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send("GET", uri, token, &[], None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send("POST", uri, token, &[], Some(body.to_string())).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder.header("content-type", "application/json").body(Body::from(body))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }
}

pub fn token(user: &str, org: Option<&str>) -> String {
    let claims = Claims::new(user, org.map(str::to_string), chrono::Duration::hours(1));
    generate_jwt(&claims, JWT_SECRET).expect("sign test token")
}

/// Log sink for asserting what reached server-side logs
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's tracing output into a buffer until the guard drops.
/// Only reliable on the current-thread runtime `#[tokio::test]` uses.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    capture_logs_at(tracing::Level::INFO)
}

pub fn capture_logs_at(level: tracing::Level) -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
