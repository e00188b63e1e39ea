use crate::application::TrendingDetector;
use crate::domain::{
    Contributor, ContributorRanking, RankedVideo, RankingPage, RankingPeriod, RankingQuery,
    TRENDING_LIMIT,
};
use crate::infrastructure::db::{
    db_error, RankedRow, RankingFilter, RankingRepository, VideoRepository, VoteRepository,
};
use buzzclip_errors::AppResult;
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use uuid::Uuid;

const CONTRIBUTOR_LIMIT: u64 = 10;

/// Read side: period rankings, the trending list and top contributors.
#[derive(Clone)]
pub struct RankingEngine {
    db: DatabaseConnection,
    detector: TrendingDetector,
}

impl RankingEngine {
    pub fn new(db: DatabaseConnection, detector: TrendingDetector) -> Self {
        Self { db, detector }
    }

    pub async fn get_rankings(
        &self,
        query: &RankingQuery,
        viewer: Option<Uuid>,
    ) -> AppResult<RankingPage> {
        self.get_rankings_at(query, viewer, Utc::now()).await
    }

    pub async fn get_rankings_at(
        &self,
        query: &RankingQuery,
        viewer: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<RankingPage> {
        query.validate()?;

        let filter = RankingFilter {
            category: query.category.clone(),
            platforms: query.platforms.clone(),
        };

        let (rows, total) = match query.period.window() {
            Some(window) => {
                let since = now - window;
                RankingRepository::windowed(&self.db, since, &filter, query.page, query.per_page)
                    .await
            }
            None => RankingRepository::all_time(&self.db, &filter, query.page, query.per_page).await,
        }
        .map_err(db_error)?;

        let items = self.annotate(rows, viewer, false).await?;

        Ok(RankingPage {
            items,
            total,
            page: query.page,
            per_page: query.per_page,
            has_next: query.page.saturating_mul(query.per_page) < total,
            trending_count: 0,
        })
    }

    pub async fn get_trending(
        &self,
        platforms: &[String],
        viewer: Option<Uuid>,
    ) -> AppResult<RankingPage> {
        self.get_trending_at(platforms, viewer, Utc::now()).await
    }

    /// Trending videos, or the most voted of the last day when nothing
    /// trends. Only the former count towards `trending_count`.
    pub async fn get_trending_at(
        &self,
        platforms: &[String],
        viewer: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<RankingPage> {
        // badges are stamped before the platform filter narrows the list
        let trending_ids = self.detector.detect_at(now).await?;

        let items = if trending_ids.is_empty() {
            let since = now - window_of(RankingPeriod::Day);
            let rows = RankingRepository::most_active(&self.db, since, platforms, TRENDING_LIMIT)
                .await
                .map_err(db_error)?;
            self.annotate(rows, viewer, false).await?
        } else {
            let videos = VideoRepository::find_active_by_ids(
                &self.db,
                &trending_ids,
                platforms,
                TRENDING_LIMIT,
            )
            .await
            .map_err(db_error)?;
            let rows = videos.into_iter().map(RankedRow::from).collect();
            self.annotate(rows, viewer, true).await?
        };

        let len = items.len() as u64;
        let trending_count = if trending_ids.is_empty() { 0 } else { len };

        Ok(RankingPage {
            items,
            total: len,
            page: 1,
            per_page: TRENDING_LIMIT,
            has_next: false,
            trending_count,
        })
    }

    pub async fn get_contributors(&self) -> AppResult<ContributorRanking> {
        self.get_contributors_at(Utc::now()).await
    }

    pub async fn get_contributors_at(&self, now: DateTime<Utc>) -> AppResult<ContributorRanking> {
        let period = RankingPeriod::Week;
        let since = now - window_of(period);

        let top = RankingRepository::top_submitters(&self.db, since, CONTRIBUTOR_LIMIT)
            .await
            .map_err(db_error)?;

        let contributors = top
            .into_iter()
            .zip(1u32..)
            .map(|((user_id, vote_count), rank)| Contributor {
                rank,
                user_id,
                vote_count,
            })
            .collect();

        Ok(ContributorRanking {
            contributors,
            period: period.as_str().to_string(),
        })
    }

    async fn annotate(
        &self,
        rows: Vec<RankedRow>,
        viewer: Option<Uuid>,
        is_trending: bool,
    ) -> AppResult<Vec<RankedVideo>> {
        let voted: HashSet<Uuid> = match viewer {
            Some(user_id) => {
                let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
                VoteRepository::voted_video_ids(&self.db, user_id, &ids)
                    .await
                    .map_err(db_error)?
            }
            None => HashSet::new(),
        };

        Ok(rows
            .into_iter()
            .map(|row| RankedVideo {
                user_voted: voted.contains(&row.id),
                is_trending,
                id: row.id,
                url: row.url,
                platform: row.platform,
                title: row.title,
                submitted_by: row.submitted_by,
                vote_count: row.vote_count,
                period_votes: row.period_votes,
                was_trending: row.was_trending,
                created_at: row.created_at,
            })
            .collect())
    }
}

fn window_of(period: RankingPeriod) -> Duration {
    period.window().unwrap_or_else(|| Duration::days(1))
}
