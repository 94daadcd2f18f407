use thiserror::Error;

use crate::auth::Authentication;
use crate::types::TenantId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TenantError {
    #[error("no authenticated principal")]
    Unauthenticated,

    #[error("organization could not be resolved")]
    MissingTenant,

    #[error("requested organization '{requested}' does not match the principal's organization")]
    TenantMismatch { requested: String },
}

/// Derives the tenant a request may touch.
///
/// Stateless and rebuilt per call site; nothing here is cached across
/// requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantResolver {
    strict_binding: bool,
}

impl TenantResolver {
    pub fn new(strict_binding: bool) -> Self {
        Self { strict_binding }
    }

    /// Tenant of the authenticated principal. A request-supplied tenant never
    /// overrides it.
    pub fn for_principal(
        &self,
        auth: &Authentication,
        requested: Option<&str>,
    ) -> Result<TenantId, TenantError> {
        let principal = auth.principal().ok_or(TenantError::Unauthenticated)?;
        let tenant = principal.organization_id.clone().ok_or(TenantError::MissingTenant)?;

        if let Some(requested) = requested.and_then(TenantId::parse) {
            if requested != tenant {
                tracing::warn!(
                    "Ignoring requested organization '{}' for user '{}' in favor of '{}'",
                    requested,
                    principal.user_id,
                    tenant
                );
            }
        }
        Ok(tenant)
    }

    /// Tenant named by the caller on public read endpoints.
    ///
    /// Without strict binding the caller-supplied tenant is trusted as-is.
    /// With strict binding it must equal the principal's organization.
    pub fn for_request(
        &self,
        auth: &Authentication,
        requested: Option<&str>,
    ) -> Result<TenantId, TenantError> {
        let requested = requested.and_then(TenantId::parse).ok_or(TenantError::MissingTenant)?;
        if !self.strict_binding {
            return Ok(requested);
        }

        let principal = auth.principal().ok_or(TenantError::Unauthenticated)?;
        match &principal.organization_id {
            Some(own) if *own == requested => Ok(requested),
            _ => Err(TenantError::TenantMismatch {
                requested: requested.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Principal;

    fn signed_in(org: Option<&str>) -> Authentication {
        Authentication::Authenticated(Principal {
            user_id: "user_1".to_string(),
            organization_id: org.and_then(TenantId::parse),
        })
    }

    #[test]
    fn principal_tenant_takes_precedence() {
        let resolver = TenantResolver::default();
        let tenant = resolver.for_principal(&signed_in(Some("org123")), Some("org456")).unwrap();
        assert_eq!(tenant.as_str(), "org123");
    }

    #[test]
    fn principal_paths_require_identity_and_org() {
        let resolver = TenantResolver::default();
        assert_eq!(
            resolver.for_principal(&Authentication::Unauthenticated, Some("org123")),
            Err(TenantError::Unauthenticated)
        );
        assert_eq!(resolver.for_principal(&signed_in(None), None), Err(TenantError::MissingTenant));
    }

    #[test]
    fn public_reads_trust_the_parameter() {
        let resolver = TenantResolver::new(false);
        let tenant = resolver.for_request(&Authentication::Unauthenticated, Some("org456")).unwrap();
        assert_eq!(tenant.as_str(), "org456");
        assert_eq!(
            resolver.for_request(&Authentication::Unauthenticated, Some(" ")),
            Err(TenantError::MissingTenant)
        );
        assert_eq!(
            resolver.for_request(&Authentication::Unauthenticated, None),
            Err(TenantError::MissingTenant)
        );
    }

    #[test]
    fn strict_binding_checks_ownership() {
        let resolver = TenantResolver::new(true);
        assert!(resolver.for_request(&signed_in(Some("org123")), Some("org123")).is_ok());
        assert_eq!(
            resolver.for_request(&signed_in(Some("org123")), Some("org456")),
            Err(TenantError::TenantMismatch { requested: "org456".into() })
        );
        assert_eq!(
            resolver.for_request(&Authentication::Unauthenticated, Some("org123")),
            Err(TenantError::Unauthenticated)
        );
    }
}
