pub mod auth;
pub mod rate_limit;

pub use auth::{authenticate, require_role, CurrentUser};
pub use rate_limit::RateLimiter;
