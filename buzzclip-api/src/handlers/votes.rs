use crate::extractors::AuthUser;
use axum::{
    extract::{Path, State},
    Json,
};
use buzzclip_app::domain::VoteOutcome;
use buzzclip_app::AppContext;
use buzzclip_errors::AppResult;
use uuid::Uuid;

pub async fn cast_vote(
    State(ctx): State<AppContext>,
    AuthUser(user_id): AuthUser,
    Path(video_id): Path<Uuid>,
) -> AppResult<Json<VoteOutcome>> {
    ctx.rate_limiter.check(user_id)?;
    let outcome = ctx.vote_ledger.cast_vote(user_id, video_id).await?;
    Ok(Json(outcome))
}

pub async fn remove_vote(
    State(ctx): State<AppContext>,
    AuthUser(user_id): AuthUser,
    Path(video_id): Path<Uuid>,
) -> AppResult<Json<VoteOutcome>> {
    ctx.rate_limiter.check(user_id)?;
    let outcome = ctx.vote_ledger.remove_vote(user_id, video_id).await?;
    Ok(Json(outcome))
}
