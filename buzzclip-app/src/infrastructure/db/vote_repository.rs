use super::entities::{vote, Vote};
use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr};
use std::collections::HashSet;
use uuid::Uuid;

pub struct VoteRepository;

impl VoteRepository {
    pub async fn exists<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        video_id: Uuid,
    ) -> Result<bool, DbErr> {
        let vote = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::VideoId.eq(video_id))
            .one(conn)
            .await?;
        Ok(vote.is_some())
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        video_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<vote::Model, DbErr> {
        let active = vote::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            video_id: Set(video_id),
            created_at: Set(created_at),
        };
        active.insert(conn).await
    }

    /// Returns the number of rows removed, 0 when the user had not voted.
    pub async fn delete<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        video_id: Uuid,
    ) -> Result<u64, DbErr> {
        let result = Vote::delete_many()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::VideoId.eq(video_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Authoritative vote total for a video.
    pub async fn count_for_video<C: ConnectionTrait>(conn: &C, video_id: Uuid) -> Result<u64, DbErr> {
        Vote::find()
            .filter(vote::Column::VideoId.eq(video_id))
            .count(conn)
            .await
    }

    /// Which of `video_ids` the user has voted for.
    pub async fn voted_video_ids<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        video_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, DbErr> {
        if video_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<Uuid> = Vote::find()
            .select_only()
            .column(vote::Column::VideoId)
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::VideoId.is_in(video_ids.iter().copied()))
            .into_tuple()
            .all(conn)
            .await?;
        Ok(ids.into_iter().collect())
    }
}
