use super::entities::{video, vote_snapshot, VoteSnapshot};
use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*, sea_query::Expr, ConnectionTrait, DbErr, JoinType};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Rows per INSERT, keeps bind parameters well under the Postgres limit.
const INSERT_CHUNK: usize = 1000;

pub struct SnapshotRepository;

impl SnapshotRepository {
    /// Appends one snapshot per `(video_id, vote_count)` stamped `taken_at`.
    pub async fn insert_batch<C: ConnectionTrait>(
        conn: &C,
        counters: &[(Uuid, i32)],
        taken_at: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let mut inserted = 0;
        for chunk in counters.chunks(INSERT_CHUNK) {
            let rows = chunk.iter().map(|&(video_id, vote_count)| vote_snapshot::ActiveModel {
                id: Set(Uuid::new_v4()),
                video_id: Set(video_id),
                vote_count: Set(vote_count),
                snapshot_at: Set(taken_at),
            });
            inserted += VoteSnapshot::insert_many(rows)
                .exec_without_returning(conn)
                .await?;
        }
        Ok(inserted)
    }

    pub async fn prune_older_than<C: ConnectionTrait>(
        conn: &C,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = VoteSnapshot::delete_many()
            .filter(vote_snapshot::Column::SnapshotAt.lt(cutoff))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Active videos with at least one snapshot taken at or after `since`.
    pub async fn active_videos_since<C: ConnectionTrait>(
        conn: &C,
        since: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, DbErr> {
        VoteSnapshot::find()
            .select_only()
            .column(vote_snapshot::Column::VideoId)
            .distinct()
            .join(JoinType::InnerJoin, vote_snapshot::Relation::Video.def())
            .filter(video::Column::IsActive.eq(true))
            .filter(vote_snapshot::Column::SnapshotAt.gte(since))
            .into_tuple()
            .all(conn)
            .await
    }

    /// For each video, the counter of its latest snapshot taken at or before
    /// `at`. Videos without such a snapshot are absent from the map.
    pub async fn latest_at_or_before<C: ConnectionTrait>(
        conn: &C,
        video_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, i32>, DbErr> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let latest: Vec<(Uuid, DateTime<Utc>)> = VoteSnapshot::find()
            .select_only()
            .column(vote_snapshot::Column::VideoId)
            .column_as(
                Expr::col((vote_snapshot::Entity, vote_snapshot::Column::SnapshotAt)).max(),
                "latest_at",
            )
            .filter(vote_snapshot::Column::VideoId.is_in(video_ids.iter().copied()))
            .filter(vote_snapshot::Column::SnapshotAt.lte(at))
            .group_by(vote_snapshot::Column::VideoId)
            .into_tuple()
            .all(conn)
            .await?;

        if latest.is_empty() {
            return Ok(HashMap::new());
        }

        // Runs stamp every video with the same instant, so the distinct
        // timestamps are few even when the video set is large.
        let stamps: HashSet<DateTime<Utc>> = latest.iter().map(|(_, at)| *at).collect();
        let wanted: HashMap<Uuid, DateTime<Utc>> = latest.into_iter().collect();

        let rows = VoteSnapshot::find()
            .filter(vote_snapshot::Column::VideoId.is_in(wanted.keys().copied()))
            .filter(vote_snapshot::Column::SnapshotAt.is_in(stamps))
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|row| wanted.get(&row.video_id) == Some(&row.snapshot_at))
            .map(|row| (row.video_id, row.vote_count))
            .collect())
    }
}
