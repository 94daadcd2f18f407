/// Shared types used across the codebase

use serde::Serialize;
use std::fmt;

/// Organization identifier; the unit of data isolation.
///
/// Always non-empty with no surrounding whitespace. Only constructed through
/// `parse`; derived per request by the tenant resolver and never cached
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Returns `None` for empty or padded input. Ids are matched exactly
    /// against the tenant column, so `" org123 "` is not an alias of `org123`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.trim() != raw {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for TenantId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
