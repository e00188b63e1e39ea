use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_VOTES: i32 = 2;
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_SHORT_WINDOW_MINS: i64 = 60;
pub const DEFAULT_LONG_WINDOW_MINS: i64 = 180;

/// Thresholds for velocity-based trending.
///
/// A video trends when its vote pace over the short window beats
/// `multiplier` times its average pace over the long window, and it gained
/// at least `min_votes` over the long window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendingPolicy {
    pub min_votes: i32,
    pub multiplier: f64,
    pub short_window_mins: i64,
    pub long_window_mins: i64,
}

impl Default for TrendingPolicy {
    fn default() -> Self {
        Self {
            min_votes: DEFAULT_MIN_VOTES,
            multiplier: DEFAULT_MULTIPLIER,
            short_window_mins: DEFAULT_SHORT_WINDOW_MINS,
            long_window_mins: DEFAULT_LONG_WINDOW_MINS,
        }
    }
}

impl TrendingPolicy {
    pub fn short_window(&self) -> Duration {
        Duration::minutes(self.short_window_mins)
    }

    pub fn long_window(&self) -> Duration {
        Duration::minutes(self.long_window_mins)
    }

    /// Classifies one video from three snapshot values: the latest counter,
    /// the counter one short window ago and the counter one long window ago.
    pub fn classify(&self, latest: i32, at_short: i32, at_long: i32) -> bool {
        let votes_short = latest - at_short;
        let votes_long = latest - at_long;

        if votes_long < self.min_votes {
            return false;
        }

        let short_hours = self.short_window_mins as f64 / 60.0;
        let long_hours = self.long_window_mins as f64 / 60.0;

        let long_velocity = f64::from(votes_long) / long_hours;
        let short_velocity = f64::from(votes_short) / short_hours;

        short_velocity > long_velocity * self.multiplier && votes_short > 0
    }
}
