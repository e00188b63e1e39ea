use buzzclip_errors::AppError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::RankedVideo;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
pub const TRENDING_LIMIT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankingPeriod {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "all")]
    AllTime,
}

impl RankingPeriod {
    /// Lookback for windowed periods, `None` for all-time.
    pub fn window(&self) -> Option<Duration> {
        match self {
            Self::Day => Some(Duration::hours(24)),
            Self::Week => Some(Duration::weeks(1)),
            Self::Month => Some(Duration::days(30)),
            Self::AllTime => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "1w",
            Self::Month => "1m",
            Self::AllTime => "all",
        }
    }
}

impl FromStr for RankingPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::Day),
            "1w" => Ok(Self::Week),
            "1m" => Ok(Self::Month),
            "all" => Ok(Self::AllTime),
            other => Err(AppError::BadRequest(format!(
                "Unknown ranking period: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingQuery {
    pub period: RankingPeriod,
    pub category: Option<String>,
    pub platforms: Vec<String>,
    pub page: u64,
    pub per_page: u64,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            period: RankingPeriod::Day,
            category: None,
            platforms: Vec::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl RankingQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(AppError::BadRequest(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        // the row offset is bound as a signed 64-bit value
        let offset_fits = self
            .page
            .checked_mul(self.per_page)
            .is_some_and(|end| end <= i64::MAX as u64);
        if !offset_fits {
            return Err(AppError::BadRequest("page is out of range".to_string()));
        }
        Ok(())
    }
}

/// Splits a comma-separated platform filter, dropping blank entries.
pub fn parse_platforms(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingPage {
    pub items: Vec<RankedVideo>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub trending_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub rank: u32,
    pub user_id: uuid::Uuid,
    pub vote_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorRanking {
    pub contributors: Vec<Contributor>,
    pub period: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!("24h".parse::<RankingPeriod>().unwrap(), RankingPeriod::Day);
        assert_eq!("1w".parse::<RankingPeriod>().unwrap(), RankingPeriod::Week);
        assert_eq!("1m".parse::<RankingPeriod>().unwrap(), RankingPeriod::Month);
        assert_eq!("all".parse::<RankingPeriod>().unwrap(), RankingPeriod::AllTime);
        assert!(matches!(
            "2d".parse::<RankingPeriod>(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_period_windows() {
        assert_eq!(RankingPeriod::Day.window(), Some(Duration::hours(24)));
        assert_eq!(RankingPeriod::Week.window(), Some(Duration::days(7)));
        assert_eq!(RankingPeriod::Month.window(), Some(Duration::days(30)));
        assert_eq!(RankingPeriod::AllTime.window(), None);
    }

    #[test]
    fn test_parse_platforms() {
        assert_eq!(parse_platforms(Some("x, youtube,,")), vec!["x", "youtube"]);
        assert!(parse_platforms(Some(" , ")).is_empty());
        assert!(parse_platforms(None).is_empty());
    }

    #[test]
    fn test_query_validation() {
        assert!(RankingQuery::default().validate().is_ok());

        let query = RankingQuery {
            page: 0,
            ..RankingQuery::default()
        };
        assert!(query.validate().is_err());

        let query = RankingQuery {
            per_page: 101,
            ..RankingQuery::default()
        };
        assert!(query.validate().is_err());

        let query = RankingQuery {
            page: u64::MAX / 2,
            ..RankingQuery::default()
        };
        assert!(matches!(query.validate(), Err(AppError::BadRequest(_))));
    }
}
