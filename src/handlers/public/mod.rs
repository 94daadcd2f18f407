// handlers/public - reachable without a principal
//
// Every path served from here must appear in the public route allow-list
// (`security.public_routes`); otherwise the auth gate rejects anonymous
// callers before the handler runs.

pub mod system;
pub mod webhook;
pub mod work_time;

pub use system::{health, root};
pub use webhook::subscription as subscription_webhook;
pub use work_time::get as get_work_time;
