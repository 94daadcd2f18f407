// handlers - two security tiers
//
// Public (allow-listed, anonymous callers allowed) → Protected (principal required).
// The tier is decided by `PublicRoutes`, not by where a handler lives; the
// split here keeps the two groups easy to audit against the allow-list.

pub mod protected;
pub mod public;
