use serde::{Deserialize, Serialize};

/// A video as returned by ranking reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedVideo {
    pub id: uuid::Uuid,
    pub url: String,
    pub platform: String,
    pub title: Option<String>,
    pub submitted_by: Option<uuid::Uuid>,
    pub vote_count: i32,
    /// Votes counted for the requested period. Equals `vote_count` for all-time.
    pub period_votes: i64,
    pub user_voted: bool,
    pub is_trending: bool,
    pub was_trending: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
