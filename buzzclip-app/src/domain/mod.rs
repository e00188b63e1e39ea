mod ranking;
mod snapshot;
mod trending;
mod video;
mod vote;

pub use ranking::{
    parse_platforms, Contributor, ContributorRanking, RankingPage, RankingPeriod, RankingQuery,
    DEFAULT_PER_PAGE, MAX_PER_PAGE, TRENDING_LIMIT,
};
pub use snapshot::{SnapshotReport, DEFAULT_RETENTION_DAYS};
pub use trending::TrendingPolicy;
pub use video::RankedVideo;
pub use vote::{VoteEvent, VoteOutcome};
