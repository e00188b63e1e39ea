use crate::domain::{VoteEvent, VoteOutcome};
use crate::infrastructure::db::{db_error, VideoRepository, VoteRepository};
use crate::infrastructure::notify::NotificationSink;
use buzzclip_errors::{AppError, AppResult};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlErr, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

const ALREADY_VOTED: &str = "Already voted for this video";

/// Owns the vote rows and keeps `videos.vote_count` equal to their count.
#[derive(Clone)]
pub struct VoteLedger {
    db: DatabaseConnection,
    notifier: Arc<dyn NotificationSink>,
}

impl VoteLedger {
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { db, notifier }
    }

    pub async fn cast_vote(&self, user_id: Uuid, video_id: Uuid) -> AppResult<VoteOutcome> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let video = VideoRepository::find_active_for_update(&txn, video_id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if VoteRepository::exists(&txn, user_id, video_id)
            .await
            .map_err(db_error)?
        {
            return Err(AppError::Conflict(ALREADY_VOTED.to_string()));
        }

        if let Err(e) = VoteRepository::create(&txn, user_id, video_id, chrono::Utc::now()).await {
            return Err(insert_error(e, user_id, video_id));
        }

        let new_vote_count = recount(&txn, video_id).await?;
        txn.commit().await.map_err(db_error)?;

        let event = VoteEvent {
            actor_id: user_id,
            video_id,
            owner_id: video.submitted_by,
        };
        if let Err(e) = self.notifier.vote_cast(&event).await {
            tracing::warn!(error = %e, %video_id, "Failed to deliver vote notification");
        }

        Ok(VoteOutcome {
            video_id,
            new_vote_count,
            user_voted: true,
        })
    }

    pub async fn remove_vote(&self, user_id: Uuid, video_id: Uuid) -> AppResult<VoteOutcome> {
        let txn = self.db.begin().await.map_err(db_error)?;

        VideoRepository::find_active_for_update(&txn, video_id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let removed = VoteRepository::delete(&txn, user_id, video_id)
            .await
            .map_err(db_error)?;
        if removed == 0 {
            return Err(AppError::NotFound("No vote to remove".to_string()));
        }

        let new_vote_count = recount(&txn, video_id).await?;
        txn.commit().await.map_err(db_error)?;

        Ok(VoteOutcome {
            video_id,
            new_vote_count,
            user_voted: false,
        })
    }
}

/// Rewrites the counter from the vote rows and returns it.
async fn recount<C: ConnectionTrait>(conn: &C, video_id: Uuid) -> AppResult<i32> {
    let count = VoteRepository::count_for_video(conn, video_id)
        .await
        .map_err(db_error)?;
    let count = i32::try_from(count)
        .map_err(|_| AppError::Internal(format!("vote count overflow for video {video_id}")))?;

    VideoRepository::set_vote_count(conn, video_id, count)
        .await
        .map_err(db_error)?;
    Ok(count)
}

fn insert_error(err: DbErr, user_id: Uuid, video_id: Uuid) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!(%user_id, %video_id, "Concurrent duplicate vote rejected");
            AppError::Conflict(ALREADY_VOTED.to_string())
        }
        _ => db_error(err),
    }
}
