use crate::domain::{SnapshotReport, DEFAULT_RETENTION_DAYS};
use crate::infrastructure::db::{db_error, SnapshotRepository, VideoRepository};
use crate::infrastructure::scheduler::ScheduledJob;
use async_trait::async_trait;
use buzzclip_errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Periodic copies of every active video's counter, kept for `retention`.
#[derive(Clone)]
pub struct SnapshotStore {
    db: DatabaseConnection,
    retention: Duration,
}

impl SnapshotStore {
    pub fn new(db: DatabaseConnection, retention: Duration) -> Self {
        Self { db, retention }
    }

    pub fn with_default_retention(db: DatabaseConnection) -> Self {
        Self::new(db, Duration::days(DEFAULT_RETENTION_DAYS))
    }

    pub async fn take_snapshot(&self) -> AppResult<SnapshotReport> {
        self.take_snapshot_at(Utc::now()).await
    }

    /// Records one snapshot per active video stamped `now` and prunes
    /// snapshots past retention. Either everything commits or nothing does.
    pub async fn take_snapshot_at(&self, now: DateTime<Utc>) -> AppResult<SnapshotReport> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let counters = VideoRepository::list_active_counters(&txn)
            .await
            .map_err(db_error)?;
        let videos = SnapshotRepository::insert_batch(&txn, &counters, now)
            .await
            .map_err(db_error)?;
        let pruned = SnapshotRepository::prune_older_than(&txn, now - self.retention)
            .await
            .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        tracing::info!(videos, pruned, "Vote snapshot taken");
        Ok(SnapshotReport {
            videos,
            pruned,
            taken_at: now,
        })
    }
}

#[async_trait]
impl ScheduledJob for SnapshotStore {
    fn name(&self) -> &'static str {
        "vote_snapshot"
    }

    async fn run(&self) -> AppResult<()> {
        self.take_snapshot()
            .await
            .map(|_| ())
            .map_err(|e| AppError::SchedulerRun(e.to_string()))
    }
}
