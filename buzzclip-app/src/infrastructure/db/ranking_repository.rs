use super::entities::{category, video, video_category, vote, Video};
use chrono::{DateTime, Utc};
use sea_orm::{
    entity::*,
    query::*,
    sea_query::{Expr, IntoCondition, SimpleExpr},
    ConnectionTrait, DbErr, FromQueryResult, JoinType, RelationDef, Select,
};
use uuid::Uuid;

/// Narrowing applied before counting and sorting.
#[derive(Debug, Clone, Default)]
pub struct RankingFilter {
    pub category: Option<String>,
    pub platforms: Vec<String>,
}

/// A video row plus the number of votes counted for the requested window.
#[derive(Debug, Clone, FromQueryResult)]
pub struct RankedRow {
    pub id: Uuid,
    pub url: String,
    pub platform: String,
    pub title: Option<String>,
    pub submitted_by: Option<Uuid>,
    pub vote_count: i32,
    pub was_trending: bool,
    pub created_at: DateTime<Utc>,
    pub period_votes: i64,
}

impl From<video::Model> for RankedRow {
    fn from(v: video::Model) -> Self {
        Self {
            period_votes: i64::from(v.vote_count),
            id: v.id,
            url: v.url,
            platform: v.platform,
            title: v.title,
            submitted_by: v.submitted_by,
            vote_count: v.vote_count,
            was_trending: v.was_trending,
            created_at: v.created_at,
        }
    }
}

pub struct RankingRepository;

impl RankingRepository {
    /// Page of active videos ordered by votes cast since `since`, newest
    /// first on ties. Returns the page and the total number of matches.
    pub async fn windowed<C: ConnectionTrait>(
        conn: &C,
        since: DateTime<Utc>,
        filter: &RankingFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<RankedRow>, u64), DbErr> {
        let paginator = Self::windowed_query(since, filter)
            .into_model::<RankedRow>()
            .paginate(conn, per_page);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Page of active videos ordered by the denormalized counter.
    pub async fn all_time<C: ConnectionTrait>(
        conn: &C,
        filter: &RankingFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<RankedRow>, u64), DbErr> {
        let query = Self::apply_filter(Video::find().filter(video::Column::IsActive.eq(true)), filter)
            .order_by_desc(video::Column::VoteCount)
            .order_by_desc(video::Column::CreatedAt);

        let paginator = query.paginate(conn, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows.into_iter().map(RankedRow::from).collect(), total))
    }

    /// Most active videos since `since`, used when no video qualifies as trending.
    pub async fn most_active<C: ConnectionTrait>(
        conn: &C,
        since: DateTime<Utc>,
        platforms: &[String],
        limit: u64,
    ) -> Result<Vec<RankedRow>, DbErr> {
        let filter = RankingFilter {
            category: None,
            platforms: platforms.to_vec(),
        };
        Self::windowed_query(since, &filter)
            .limit(limit)
            .into_model::<RankedRow>()
            .all(conn)
            .await
    }

    /// Submitters ranked by votes their active videos received since `since`.
    pub async fn top_submitters<C: ConnectionTrait>(
        conn: &C,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<(Uuid, i64)>, DbErr> {
        Video::find()
            .select_only()
            .column(video::Column::SubmittedBy)
            .column_as(vote_total(), "period_votes")
            .join(JoinType::InnerJoin, votes_since(since))
            .filter(video::Column::IsActive.eq(true))
            .filter(video::Column::SubmittedBy.is_not_null())
            .group_by(video::Column::SubmittedBy)
            .order_by_desc(vote_total())
            .limit(limit)
            .into_tuple()
            .all(conn)
            .await
    }

    fn windowed_query(since: DateTime<Utc>, filter: &RankingFilter) -> Select<Video> {
        let query = Video::find()
            .column_as(vote_total(), "period_votes")
            .join(JoinType::LeftJoin, votes_since(since))
            .filter(video::Column::IsActive.eq(true));

        Self::apply_filter(query, filter)
            .group_by(video::Column::Id)
            .order_by_desc(vote_total())
            .order_by_desc(video::Column::CreatedAt)
    }

    fn apply_filter(mut query: Select<Video>, filter: &RankingFilter) -> Select<Video> {
        if !filter.platforms.is_empty() {
            query = query.filter(video::Column::Platform.is_in(filter.platforms.iter().cloned()));
        }
        if let Some(slug) = &filter.category {
            query = query
                .join(JoinType::InnerJoin, video::Relation::VideoCategories.def())
                .join(JoinType::InnerJoin, video_category::Relation::Category.def())
                .filter(category::Column::Slug.eq(slug.as_str()));
        }
        query
    }
}

/// `videos -> votes` join restricted to votes cast at or after `since`.
fn votes_since(since: DateTime<Utc>) -> RelationDef {
    video::Relation::Votes.def().on_condition(move |_left, right| {
        Expr::col((right, vote::Column::CreatedAt))
            .gte(since)
            .into_condition()
    })
}

fn vote_total() -> SimpleExpr {
    Expr::col((vote::Entity, vote::Column::Id)).count()
}
