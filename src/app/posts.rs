use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::collections::HashMap;

use crate::domain::engagement::CommentDetail;
use crate::domain::post::{Post, PostDetail};
use crate::domain::user::User;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_post(
        &self,
        user_id: i64,
        title: String,
        content: String,
        image: Option<String>,
    ) -> Result<Post> {
        let row = sqlx::query(
            "INSERT INTO posts (user_id, title, content, image) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, title, content, image, created_at",
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(image)
        .fetch_one(self.db.pool())
        .await?;

        Ok(post_from_row(&row))
    }

    /// Existence and ownership probe: `None` when the post does not exist,
    /// otherwise the owning user id.
    pub async fn post_owner(&self, post_id: i64) -> Result<Option<i64>> {
        let owner = sqlx::query_scalar("SELECT user_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(owner)
    }

    /// Partial update: absent fields keep their current value, and the image
    /// reference is replaced only when a new one is supplied.
    pub async fn update_post(
        &self,
        post_id: i64,
        title: Option<String>,
        content: Option<String>,
        image: Option<String>,
    ) -> Result<Option<Post>> {
        let row = sqlx::query(
            "UPDATE posts \
             SET title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 image = COALESCE($4, image) \
             WHERE id = $1 \
             RETURNING id, user_id, title, content, image, created_at",
        )
        .bind(post_id)
        .bind(title)
        .bind(content)
        .bind(image)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| post_from_row(&row)))
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All posts, newest first, offset by `(page - 1) * limit`.
    pub async fn list_posts(&self, page: i64, limit: i64) -> Result<Vec<PostDetail>> {
        let rows = sqlx::query(&format!(
            "{POST_DETAIL_SELECT} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(self.db.pool())
        .await?;

        self.load_details(rows).await
    }

    /// One user's posts, same ordering and pagination as `list_posts`.
    pub async fn list_posts_by_user(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<Vec<PostDetail>> {
        let rows = sqlx::query(&format!(
            "{POST_DETAIL_SELECT} \
             WHERE p.user_id = $1 \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(self.db.pool())
        .await?;

        self.load_details(rows).await
    }

    // Attach each page's comments (with their authors) to the already
    // hydrated post rows, preserving the page order.
    async fn load_details(&self, rows: Vec<PgRow>) -> Result<Vec<PostDetail>> {
        let mut details = Vec::with_capacity(rows.len());
        for row in &rows {
            details.push(PostDetail {
                id: row.get("id"),
                user_id: row.get("user_id"),
                title: row.get("title"),
                content: row.get("content"),
                image: row.get("image"),
                created_at: row.get("created_at"),
                author: author_from_row(row),
                comments: Vec::new(),
                comment_count: row.get("comment_count"),
                reaction_count: row.get("reaction_count"),
            });
        }

        if details.is_empty() {
            return Ok(details);
        }

        let post_ids: Vec<i64> = details.iter().map(|post| post.id).collect();
        let comment_rows = sqlx::query(
            "SELECT c.id, c.user_id, c.post_id, c.content, c.created_at, \
                    u.id AS author_id, u.name AS author_name, \
                    u.email AS author_email, u.created_at AS author_created_at \
             FROM comments c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.post_id = ANY($1) \
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(&post_ids)
        .fetch_all(self.db.pool())
        .await?;

        let mut by_post: HashMap<i64, Vec<CommentDetail>> = HashMap::new();
        for row in &comment_rows {
            let comment = CommentDetail {
                id: row.get("id"),
                user_id: row.get("user_id"),
                post_id: row.get("post_id"),
                content: row.get("content"),
                created_at: row.get("created_at"),
                author: author_from_row(row),
            };
            by_post.entry(comment.post_id).or_default().push(comment);
        }

        for detail in &mut details {
            if let Some(comments) = by_post.remove(&detail.id) {
                detail.comments = comments;
            }
        }

        Ok(details)
    }
}

const POST_DETAIL_SELECT: &str =
    "SELECT p.id, p.user_id, p.title, p.content, p.image, p.created_at, \
            u.id AS author_id, u.name AS author_name, \
            u.email AS author_email, u.created_at AS author_created_at, \
            (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count, \
            (SELECT COUNT(*) FROM reactions r WHERE r.post_id = p.id) AS reaction_count \
     FROM posts p \
     JOIN users u ON u.id = p.user_id";

fn post_from_row(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        created_at: row.get("created_at"),
    }
}

fn author_from_row(row: &PgRow) -> User {
    User {
        id: row.get("author_id"),
        name: row.get("author_name"),
        email: row.get("author_email"),
        created_at: row.get("author_created_at"),
    }
}
