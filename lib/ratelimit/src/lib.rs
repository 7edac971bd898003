//! Sliding-window rate limiting keyed by client identity.
//!
//! A [`RateLimiter`] remembers when each client was admitted and refuses
//! further requests once `max_requests` admits fall inside the trailing
//! window. State lives in memory only and is lost on restart.

mod clock;
mod limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::{Admission, ConfigError, RateLimitConfig, RateLimiter};
