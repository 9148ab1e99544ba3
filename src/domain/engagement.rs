use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A comment annotated with its author, as embedded in post listings.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetail {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: User,
}

/// Outcome of a reaction toggle. At most one reaction exists per
/// (user, post) pair; toggling flips between the two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionStatus {
    Liked,
    Unliked,
}
