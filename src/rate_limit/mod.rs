//! Rate Limit Module
//!
//! Fixed-window limiting of sensitive paths (login, registration).

mod limiter;
mod middleware;

pub use limiter::{FixedWindowLimiter, RateDecision, RateLimitConfig, RateWindowCounter};
pub use middleware::{client_id, rate_limit_middleware, UNKNOWN_CLIENT};
