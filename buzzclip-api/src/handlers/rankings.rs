use crate::extractors::MaybeAuthUser;
use axum::{
    extract::{Query, State},
    Json,
};
use buzzclip_app::domain::{
    parse_platforms, ContributorRanking, RankingPage, RankingQuery, DEFAULT_PER_PAGE,
};
use buzzclip_app::AppContext;
use buzzclip_errors::AppResult;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    pub period: Option<String>,
    pub category: Option<String>,
    /// Comma-separated, e.g. `x,youtube`.
    pub platform: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl RankingParams {
    fn into_query(self) -> AppResult<RankingQuery> {
        Ok(RankingQuery {
            period: match self.period.as_deref() {
                Some(raw) => raw.parse()?,
                None => Default::default(),
            },
            category: self.category.filter(|c| !c.trim().is_empty()),
            platforms: parse_platforms(self.platform.as_deref()),
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendingParams {
    pub platform: Option<String>,
}

pub async fn rankings(
    State(ctx): State<AppContext>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(params): Query<RankingParams>,
) -> AppResult<Json<RankingPage>> {
    let query = params.into_query()?;
    let page = ctx.ranking_engine.get_rankings(&query, viewer).await?;
    Ok(Json(page))
}

pub async fn trending(
    State(ctx): State<AppContext>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(params): Query<TrendingParams>,
) -> AppResult<Json<RankingPage>> {
    let platforms = parse_platforms(params.platform.as_deref());
    let page = ctx.ranking_engine.get_trending(&platforms, viewer).await?;
    Ok(Json(page))
}

pub async fn contributors(State(ctx): State<AppContext>) -> AppResult<Json<ContributorRanking>> {
    let ranking = ctx.ranking_engine.get_contributors().await?;
    Ok(Json(ranking))
}
