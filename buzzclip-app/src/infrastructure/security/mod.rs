mod rate_limiter;

pub use rate_limiter::{RateLimiter, DEFAULT_VOTES_PER_MINUTE};
