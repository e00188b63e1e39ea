use crate::domain::TrendingPolicy;
use crate::infrastructure::db::{db_error, SnapshotRepository, VideoRepository};
use buzzclip_errors::AppResult;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Finds videos whose recent vote pace outruns their longer-term pace,
/// using snapshot history only.
#[derive(Clone)]
pub struct TrendingDetector {
    db: DatabaseConnection,
    policy: TrendingPolicy,
}

impl TrendingDetector {
    pub fn new(db: DatabaseConnection, policy: TrendingPolicy) -> Self {
        Self { db, policy }
    }

    pub async fn detect(&self) -> AppResult<Vec<Uuid>> {
        self.detect_at(Utc::now()).await
    }

    /// Ids of trending videos as of `now`, sorted. Every detected video gets
    /// its `was_trending` badge.
    pub async fn detect_at(&self, now: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        let t_short = now - self.policy.short_window();
        let t_long = now - self.policy.long_window();

        let candidates = SnapshotRepository::active_videos_since(&self.db, t_long)
            .await
            .map_err(db_error)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let latest = SnapshotRepository::latest_at_or_before(&self.db, &candidates, now)
            .await
            .map_err(db_error)?;
        let at_short = SnapshotRepository::latest_at_or_before(&self.db, &candidates, t_short)
            .await
            .map_err(db_error)?;
        let at_long = SnapshotRepository::latest_at_or_before(&self.db, &candidates, t_long)
            .await
            .map_err(db_error)?;

        let mut trending: Vec<Uuid> = candidates
            .into_iter()
            .filter(|id| match (latest.get(id), at_short.get(id), at_long.get(id)) {
                (Some(&v_latest), Some(&v_short), Some(&v_long)) => {
                    self.policy.classify(v_latest, v_short, v_long)
                }
                _ => false,
            })
            .collect();
        trending.sort();

        if !trending.is_empty() {
            let newly_badged = VideoRepository::mark_trending(&self.db, &trending)
                .await
                .map_err(db_error)?;
            tracing::info!(count = trending.len(), newly_badged, "Trending videos detected");
        }

        Ok(trending)
    }
}
