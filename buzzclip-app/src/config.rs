use crate::domain::{TrendingPolicy, DEFAULT_RETENTION_DAYS};
use crate::infrastructure::scheduler::DEFAULT_SNAPSHOT_INTERVAL;
use crate::infrastructure::security::DEFAULT_VOTES_PER_MINUTE;
use buzzclip_errors::{AppError, AppResult};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub snapshot_interval: Duration,
    pub snapshot_retention_days: i64,
    pub trending: TrendingPolicy,
    pub vote_rate_limit_per_minute: u32,
    pub scheduler_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let defaults = TrendingPolicy::default();
        let trending = TrendingPolicy {
            min_votes: parse_or(&lookup, "TRENDING_MIN_VOTES", defaults.min_votes)?,
            multiplier: parse_or(&lookup, "TRENDING_MULTIPLIER", defaults.multiplier)?,
            short_window_mins: parse_or(
                &lookup,
                "TRENDING_SHORT_WINDOW_MINS",
                defaults.short_window_mins,
            )?,
            long_window_mins: parse_or(
                &lookup,
                "TRENDING_LONG_WINDOW_MINS",
                defaults.long_window_mins,
            )?,
        };
        if trending.short_window_mins <= 0
            || trending.long_window_mins <= trending.short_window_mins
        {
            return Err(AppError::Config(
                "trending windows must satisfy 0 < short < long".to_string(),
            ));
        }
        if !trending.multiplier.is_finite() || trending.multiplier < 0.0 {
            return Err(AppError::Config(
                "TRENDING_MULTIPLIER must be a non-negative number".to_string(),
            ));
        }

        let interval_secs: u64 = parse_or(
            &lookup,
            "SNAPSHOT_INTERVAL_SECS",
            DEFAULT_SNAPSHOT_INTERVAL.as_secs(),
        )?;
        if interval_secs == 0 {
            return Err(AppError::Config(
                "SNAPSHOT_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        let snapshot_retention_days =
            parse_or(&lookup, "SNAPSHOT_RETENTION_DAYS", DEFAULT_RETENTION_DAYS)?;
        if snapshot_retention_days <= 0 {
            return Err(AppError::Config(
                "SNAPSHOT_RETENTION_DAYS must be positive".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            snapshot_interval: Duration::from_secs(interval_secs),
            snapshot_retention_days,
            trending,
            vote_rate_limit_per_minute: parse_or(
                &lookup,
                "VOTE_RATE_LIMIT_PER_MINUTE",
                DEFAULT_VOTES_PER_MINUTE,
            )?,
            scheduler_enabled: parse_or(&lookup, "SCHEDULER_ENABLED", true)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
