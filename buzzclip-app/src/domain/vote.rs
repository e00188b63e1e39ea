use serde::{Deserialize, Serialize};

/// Result of casting or removing a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub video_id: uuid::Uuid,
    pub new_vote_count: i32,
    pub user_voted: bool,
}

/// Emitted after a vote commits, for the video owner's notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEvent {
    pub actor_id: uuid::Uuid,
    pub video_id: uuid::Uuid,
    pub owner_id: Option<uuid::Uuid>,
}
