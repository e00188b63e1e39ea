mod ranking_engine;
mod snapshot_store;
mod trending_detector;
mod vote_ledger;

pub use ranking_engine::RankingEngine;
pub use snapshot_store::SnapshotStore;
pub use trending_detector::TrendingDetector;
pub use vote_ledger::VoteLedger;
