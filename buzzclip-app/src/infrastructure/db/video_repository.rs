use super::entities::{video, Video};
use sea_orm::{entity::*, query::*, sea_query::Expr, ConnectionTrait, DbErr};
use uuid::Uuid;

/// Access to the externally owned `videos` table. Every method takes the
/// connection explicitly so it can run inside a caller's transaction.
pub struct VideoRepository;

impl VideoRepository {
    pub async fn find_active<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<Option<video::Model>, DbErr> {
        Video::find_by_id(id)
            .filter(video::Column::IsActive.eq(true))
            .one(conn)
            .await
    }

    /// Same as [`Self::find_active`] but takes a row lock, serializing
    /// counter writers on the same video until the transaction ends.
    pub async fn find_active_for_update<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<Option<video::Model>, DbErr> {
        Video::find_by_id(id)
            .filter(video::Column::IsActive.eq(true))
            .lock_exclusive()
            .one(conn)
            .await
    }

    /// `(id, vote_count)` of every active video, without loading full rows.
    pub async fn list_active_counters<C: ConnectionTrait>(
        conn: &C,
    ) -> Result<Vec<(Uuid, i32)>, DbErr> {
        Video::find()
            .select_only()
            .column(video::Column::Id)
            .column(video::Column::VoteCount)
            .filter(video::Column::IsActive.eq(true))
            .into_tuple()
            .all(conn)
            .await
    }

    pub async fn set_vote_count<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        vote_count: i32,
    ) -> Result<(), DbErr> {
        Video::update_many()
            .col_expr(video::Column::VoteCount, Expr::value(vote_count))
            .filter(video::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Sets `was_trending` on the given videos. Never clears it.
    /// Returns how many videos earned the badge for the first time.
    pub async fn mark_trending<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Video::update_many()
            .col_expr(video::Column::WasTrending, Expr::value(true))
            .filter(video::Column::Id.is_in(ids.iter().copied()))
            .filter(video::Column::WasTrending.eq(false))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Active videos among `ids`, most voted first.
    pub async fn find_active_by_ids<C: ConnectionTrait>(
        conn: &C,
        ids: &[Uuid],
        platforms: &[String],
        limit: u64,
    ) -> Result<Vec<video::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Video::find()
            .filter(video::Column::Id.is_in(ids.iter().copied()))
            .filter(video::Column::IsActive.eq(true));
        if !platforms.is_empty() {
            query = query.filter(video::Column::Platform.is_in(platforms.iter().cloned()));
        }

        query
            .order_by_desc(video::Column::VoteCount)
            .order_by_desc(video::Column::CreatedAt)
            .limit(limit)
            .all(conn)
            .await
    }
}
