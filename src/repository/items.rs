//! Items repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{Item, NewItem},
};

const ITEM_COLUMNS: &str = "id, name, description, available, owner_id, request_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create(&self, item: &NewItem) -> AppResult<Item>;
    async fn get_by_id(&self, id: i64) -> AppResult<Item>;
    async fn update(&self, item: &Item) -> AppResult<Item>;
    async fn delete(&self, id: i64) -> AppResult<()>;
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>>;
    async fn list_by_request(&self, request_id: i64) -> AppResult<Vec<Item>>;
    async fn list_by_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>>;
    /// Available items whose name or description contains `text`, ignoring case
    async fn search(&self, text: &str) -> AppResult<Vec<Item>>;
}

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ItemStore for ItemsRepository {
    async fn create(&self, item: &NewItem) -> AppResult<Item> {
        let query = format!(
            "INSERT INTO items (name, description, available, owner_id, request_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.available)
            .bind(item.owner_id)
            .bind(item.request_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        let query = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    async fn update(&self, item: &Item) -> AppResult<Item> {
        let query = format!(
            "UPDATE items SET name = $1, description = $2, available = $3 WHERE id = $4 RETURNING {}",
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.available)
            .bind(item.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        let query = format!("SELECT {} FROM items WHERE owner_id = $1 ORDER BY id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_by_request(&self, request_id: i64) -> AppResult<Vec<Item>> {
        let query = format!("SELECT {} FROM items WHERE request_id = $1 ORDER BY id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(request_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_by_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM items WHERE request_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(request_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        let query = format!(
            "SELECT {} FROM items \
             WHERE available AND (name ILIKE $1 OR description ILIKE $1) \
             ORDER BY id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(like_pattern(text))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("drill"), "%drill%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
