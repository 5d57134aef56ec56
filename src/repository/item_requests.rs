//! Item requests repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item_request::{ItemRequest, ItemRequestRow, NewItemRequest},
};

const REQUEST_SELECT: &str = r#"
    SELECT r.id, r.description, r.created,
           u.id AS requestor_id, u.name AS requestor_name, u.email AS requestor_email
    FROM requests r
    JOIN users u ON u.id = r.requestor_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create(&self, request: &NewItemRequest) -> AppResult<ItemRequest>;
    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest>;
    async fn update(&self, request: &ItemRequest) -> AppResult<ItemRequest>;
    async fn delete(&self, id: i64) -> AppResult<()>;
    /// Newest first
    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>>;
    /// Newest first
    async fn list_all(&self) -> AppResult<Vec<ItemRequest>>;
}

#[derive(Clone)]
pub struct ItemRequestsRepository {
    pool: Pool<Postgres>,
}

impl ItemRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStore for ItemRequestsRepository {
    async fn create(&self, request: &NewItemRequest) -> AppResult<ItemRequest> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO requests (description, requestor_id, created) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&request.description)
        .bind(request.requestor_id)
        .bind(request.created)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        let query = format!("{} WHERE r.id = $1", REQUEST_SELECT);
        sqlx::query_as::<_, ItemRequestRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ItemRequest::from)
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    async fn update(&self, request: &ItemRequest) -> AppResult<ItemRequest> {
        let result = sqlx::query("UPDATE requests SET description = $1 WHERE id = $2")
            .bind(&request.description)
            .bind(request.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Request with id {} not found", request.id)));
        }
        self.get_by_id(request.id).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Request with id {} not found", id)));
        }
        Ok(())
    }

    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>> {
        let query = format!(
            "{} WHERE r.requestor_id = $1 ORDER BY r.created DESC, r.id DESC",
            REQUEST_SELECT
        );
        let rows = sqlx::query_as::<_, ItemRequestRow>(&query)
            .bind(requestor_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ItemRequest::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<ItemRequest>> {
        let query = format!("{} ORDER BY r.created DESC, r.id DESC", REQUEST_SELECT);
        let rows = sqlx::query_as::<_, ItemRequestRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ItemRequest::from).collect())
    }
}
