use serde::{Deserialize, Serialize};

pub const DEFAULT_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub videos: u64,
    pub pruned: u64,
    pub taken_at: chrono::DateTime<chrono::Utc>,
}
