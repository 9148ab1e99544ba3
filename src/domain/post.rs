use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::engagement::CommentDetail;
use crate::domain::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A post as it appears in listings: the row itself plus its author, its
/// comments (each with their author) and derived engagement counts.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: User,
    pub comments: Vec<CommentDetail>,
    pub comment_count: i64,
    pub reaction_count: i64,
}
