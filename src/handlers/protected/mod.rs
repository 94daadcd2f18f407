// handlers/protected - require an authenticated principal
//
// The auth gate has already rejected anonymous callers. Handlers still
// resolve the tenant from the principal themselves: a signed-in user without
// an active organization gets 400, never another tenant's data.

pub mod catalog;
pub mod work_time;

pub use catalog::{employees as list_employees, routes as list_routes};
pub use work_time::{create as create_work_time, pdf_info as pdf_worktime_info};
