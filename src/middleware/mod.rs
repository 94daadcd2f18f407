pub mod auth;
pub mod response;
pub mod tenant;

pub use auth::{auth_gate, PublicRoutes};
pub use response::{ApiResponse, ApiResult};
pub use tenant::{TenantError, TenantResolver};
