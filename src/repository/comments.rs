//! Comments repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::comment::{Comment, NewComment},
};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.text, c.item_id, u.name AS author_name, c.created
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment>;
    /// Oldest first
    async fn list_by_item(&self, item_id: i64) -> AppResult<Vec<Comment>>;
    /// Oldest first
    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>>;
}

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentsRepository {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment> {
        let created = sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (text, item_id, author_id, created)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, item_id, author_id, created
            )
            SELECT inserted.id, inserted.text, inserted.item_id, u.name AS author_name, inserted.created
            FROM inserted
            JOIN users u ON u.id = inserted.author_id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.item_id)
        .bind(comment.author_id)
        .bind(comment.created)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_by_item(&self, item_id: i64) -> AppResult<Vec<Comment>> {
        let query = format!("{} WHERE c.item_id = $1 ORDER BY c.created, c.id", COMMENT_SELECT);
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "{} WHERE c.item_id = ANY($1) ORDER BY c.created, c.id",
            COMMENT_SELECT
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(item_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }
}
