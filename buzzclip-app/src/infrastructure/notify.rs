use crate::domain::VoteEvent;
use crate::infrastructure::db::{db_error, entities::notification};
use async_trait::async_trait;
use buzzclip_errors::AppResult;
use sea_orm::{entity::*, DatabaseConnection};
use uuid::Uuid;

pub const VOTE_NOTIFICATION: &str = "vote";

/// Receives vote events after the vote has committed. Delivery is best
/// effort: callers log failures and never undo the vote.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn vote_cast(&self, event: &VoteEvent) -> AppResult<()>;
}

/// Stores a notification row for the video owner.
#[derive(Clone)]
pub struct DbNotificationSink {
    db: DatabaseConnection,
}

impl DbNotificationSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationSink for DbNotificationSink {
    async fn vote_cast(&self, event: &VoteEvent) -> AppResult<()> {
        let Some(owner_id) = event.owner_id else {
            return Ok(());
        };
        // no self-notifications
        if owner_id == event.actor_id {
            return Ok(());
        }

        let active = notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            kind: Set(VOTE_NOTIFICATION.to_string()),
            actor_id: Set(Some(event.actor_id)),
            video_id: Set(Some(event.video_id)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now()),
        };
        active.insert(&self.db).await.map_err(db_error)?;
        Ok(())
    }
}

pub struct NoopNotificationSink;

#[async_trait]
impl NotificationSink for NoopNotificationSink {
    async fn vote_cast(&self, _event: &VoteEvent) -> AppResult<()> {
        Ok(())
    }
}
