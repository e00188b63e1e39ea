use buzzclip_errors::AppError;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const DEFAULT_VOTES_PER_MINUTE: u32 = 30;
const WINDOW_SECS: u64 = 60;
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
struct RequestRecord {
    count: u32,
    window_start: Instant,
}

impl Default for RequestRecord {
    fn default() -> Self {
        Self {
            count: 0,
            window_start: Instant::now(),
        }
    }
}

/// Fixed one-minute window limiter keyed by user.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<Uuid, RequestRecord>>,
    max_per_minute: u32,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(max_per_minute: u32) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            max_per_minute,
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn check(&self, user_id: Uuid) -> Result<(), AppError> {
        self.maybe_cleanup();

        let now = Instant::now();
        let window = Duration::from_secs(WINDOW_SECS);
        let mut record = self.requests.entry(user_id).or_default();

        if now.duration_since(record.window_start) > window {
            record.count = 0;
            record.window_start = now;
        }

        if record.count >= self.max_per_minute {
            let waited = now.duration_since(record.window_start).as_secs();
            return Err(AppError::RateLimited(WINDOW_SECS.saturating_sub(waited)));
        }

        record.count += 1;
        Ok(())
    }

    fn maybe_cleanup(&self) {
        let Ok(mut last_cleanup) = self.last_cleanup.lock() else {
            return;
        };
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            let window = Duration::from_secs(WINDOW_SECS);
            self.requests.retain(|_, v| v.window_start.elapsed() <= window);
            *last_cleanup = Instant::now();
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_VOTES_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_per_user() {
        let limiter = RateLimiter::default();
        let user = Uuid::new_v4();

        for _ in 0..DEFAULT_VOTES_PER_MINUTE {
            assert!(limiter.check(user).is_ok());
        }
        assert!(matches!(limiter.check(user), Err(AppError::RateLimited(_))));

        // other users have their own budget
        assert!(limiter.check(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_retry_hint_within_window() {
        let limiter = RateLimiter::new(1);
        let user = Uuid::new_v4();

        limiter.check(user).unwrap();
        match limiter.check(user) {
            Err(AppError::RateLimited(secs)) => assert!(secs <= WINDOW_SECS),
            other => panic!("expected rate limit, got {other:?}"),
        }
    }
}
