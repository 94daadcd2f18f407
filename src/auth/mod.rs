use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::types::TenantId;

/// Session cookie set by the hosted identity provider's frontend SDK
pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, organization_id: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            org_id: organization_id,
            iss: None,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// The authenticated identity behind a request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub organization_id: Option<TenantId>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            organization_id: claims.org_id.as_deref().and_then(TenantId::parse),
        }
    }
}

/// Outcome of authenticating a request. "No session" is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Authenticated(Principal),
    Unauthenticated,
}

impl Authentication {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Authentication::Authenticated(principal) => Some(principal),
            Authentication::Unauthenticated => None,
        }
    }
}

/// Capability interface over the hosted identity service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Authentication;
}

/// Verifies HS256 session tokens issued by the identity service
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    configured: bool,
}

impl JwtIdentityProvider {
    pub fn new(security: &SecurityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &security.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            validation,
            configured: !security.jwt_secret.is_empty(),
        }
    }

    fn validate(&self, token: &str) -> Result<Claims, String> {
        if !self.configured {
            return Err("JWT secret not configured".to_string());
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid JWT token: {}", e))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn authenticate(&self, headers: &HeaderMap) -> Authentication {
        let Some(token) = extract_session_token(headers) else {
            return Authentication::Unauthenticated;
        };

        match self.validate(&token) {
            Ok(claims) => Authentication::Authenticated(Principal::from(claims)),
            Err(reason) => {
                tracing::debug!("Rejected session token: {}", reason);
                Authentication::Unauthenticated
            }
        }
    }
}

/// Bearer token from the Authorization header, falling back to the session cookie
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Mint a session token; used by the `token` CLI command and by tests
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
