use crate::application::{RankingEngine, SnapshotStore, TrendingDetector, VoteLedger};
use crate::config::AppConfig;
use crate::infrastructure::db::{create_connection, db_error, run_migrations};
use crate::infrastructure::notify::DbNotificationSink;
use crate::infrastructure::scheduler::SnapshotScheduler;
use crate::infrastructure::security::RateLimiter;
use buzzclip_errors::AppResult;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppContext {
    pub vote_ledger: Arc<VoteLedger>,
    pub ranking_engine: Arc<RankingEngine>,
    pub snapshot_store: Arc<SnapshotStore>,
    pub rate_limiter: RateLimiter,
    snapshot_interval: Duration,
}

impl AppContext {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let detector = TrendingDetector::new(db.clone(), config.trending);
        let notifier = Arc::new(DbNotificationSink::new(db.clone()));

        Self {
            vote_ledger: Arc::new(VoteLedger::new(db.clone(), notifier)),
            ranking_engine: Arc::new(RankingEngine::new(db.clone(), detector)),
            snapshot_store: Arc::new(SnapshotStore::new(
                db,
                chrono::Duration::days(config.snapshot_retention_days),
            )),
            rate_limiter: RateLimiter::new(config.vote_rate_limit_per_minute),
            snapshot_interval: config.snapshot_interval,
        }
    }

    /// Connects, applies migrations and wires the services.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let db = create_connection(&config.database_url)
            .await
            .map_err(db_error)?;
        run_migrations(&db).await.map_err(db_error)?;
        tracing::info!("Database ready");

        Ok(Self::new(db, config))
    }

    /// A scheduler that snapshots vote counters on the configured interval.
    pub fn snapshot_scheduler(&self) -> SnapshotScheduler {
        SnapshotScheduler::new(self.snapshot_interval, self.snapshot_store.clone())
    }
}
