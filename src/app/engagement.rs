use anyhow::Result;
use sqlx::Row;

use crate::domain::engagement::{Comment, ReactionStatus};
use crate::infra::db::Db;

#[derive(Clone)]
pub struct EngagementService {
    db: Db,
}

impl EngagementService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a comment. The target post is not looked up first; a dangling
    /// post id fails the comments.post_id foreign key at the storage level.
    pub async fn create_comment(
        &self,
        user_id: i64,
        post_id: i64,
        content: String,
    ) -> Result<Comment> {
        let row = sqlx::query(
            "INSERT INTO comments (user_id, post_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, post_id, content, created_at",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Comment {
            id: row.get("id"),
            user_id: row.get("user_id"),
            post_id: row.get("post_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        })
    }

    /// Flip the (user, post) reaction. The delete-then-insert pair runs in
    /// one transaction; the UNIQUE (user_id, post_id) constraint absorbs
    /// concurrent duplicate toggles.
    pub async fn toggle_reaction(&self, user_id: i64, post_id: i64) -> Result<ReactionStatus> {
        let mut tx = self.db.pool().begin().await?;

        let deleted = sqlx::query("DELETE FROM reactions WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let status = if deleted.rows_affected() > 0 {
            ReactionStatus::Unliked
        } else {
            sqlx::query(
                "INSERT INTO reactions (user_id, post_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
            ReactionStatus::Liked
        };

        tx.commit().await?;
        Ok(status)
    }
}
