//! Bookings repository for database operations

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingFilter, BookingRow, NewBooking},
};

const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           i.id AS item_id, i.name AS item_name, i.description AS item_description,
           i.available AS item_available, i.owner_id AS item_owner_id,
           i.request_id AS item_request_id,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    JOIN users u ON u.id = b.booker_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking>;
    async fn get_by_id(&self, id: i64) -> AppResult<Booking>;
    /// Persist start, end and status
    async fn update(&self, booking: &Booking) -> AppResult<Booking>;
    async fn delete(&self, id: i64) -> AppResult<()>;
    /// One page of the user's bookings in `filter.state`, by start ascending
    async fn list_by_booker(&self, booker_id: i64, filter: &BookingFilter) -> AppResult<Vec<Booking>>;
    /// Same as `list_by_booker`, over bookings of every item owned by `owner_id`
    async fn list_by_owner(&self, owner_id: i64, filter: &BookingFilter) -> AppResult<Vec<Booking>>;
    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>>;
    /// Whether the user has a booking on the item that ended before `before`
    async fn exists_completed(
        &self,
        item_id: i64,
        booker_id: i64,
        before: NaiveDateTime,
    ) -> AppResult<bool>;
}

/// Paged list query scoped by `scope` (`b.booker_id` or `i.owner_id` = `$1`)
fn list_query(scope: &str, filter: &BookingFilter) -> String {
    let mut query = format!(
        "{} WHERE {} = $1 AND {} ORDER BY b.start_date, b.id",
        BOOKING_SELECT,
        scope,
        filter.state.sql_predicate()
    );
    if let Some(size) = filter.size {
        query.push_str(&format!(" LIMIT {}", size));
    }
    if filter.from > 0 {
        query.push_str(&format!(" OFFSET {}", filter.from));
    }
    query
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn list_scoped(&self, scope: &str, user_id: i64, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        let query = list_query(scope, filter);
        let mut rows = sqlx::query_as::<_, BookingRow>(&query).bind(user_id);
        if filter.state.uses_now() {
            rows = rows.bind(filter.now);
        }
        let rows = rows.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.item_id)
        .bind(booking.booker_id)
        .bind(booking.status)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        let query = format!("{} WHERE b.id = $1", BOOKING_SELECT);
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Booking::from)
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    async fn update(&self, booking: &Booking) -> AppResult<Booking> {
        let result = sqlx::query(
            "UPDATE bookings SET start_date = $1, end_date = $2, status = $3 WHERE id = $4",
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.status)
        .bind(booking.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking with id {} not found", booking.id)));
        }
        self.get_by_id(booking.id).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking with id {} not found", id)));
        }
        Ok(())
    }

    async fn list_by_booker(&self, booker_id: i64, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        self.list_scoped("b.booker_id", booker_id, filter).await
    }

    async fn list_by_owner(&self, owner_id: i64, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        self.list_scoped("i.owner_id", owner_id, filter).await
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("{} WHERE b.item_id = ANY($1) ORDER BY b.start_date", BOOKING_SELECT);
        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(item_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn exists_completed(
        &self,
        item_id: i64,
        booker_id: i64,
        before: NaiveDateTime,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE item_id = $1 AND booker_id = $2 AND end_date < $3
            )
            "#,
        )
        .bind(item_id)
        .bind(booker_id)
        .bind(before)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{booking::BookingState, local_now};

    fn filter(state: BookingState, from: i64, size: Option<i64>) -> BookingFilter {
        BookingFilter {
            state,
            now: local_now(),
            from,
            size,
        }
    }

    #[test]
    fn test_list_query_filters_and_pages_in_sql() {
        let query = list_query("b.booker_id", &filter(BookingState::Current, 20, Some(10)));
        assert!(query.contains("WHERE b.booker_id = $1 AND $2 BETWEEN b.start_date AND b.end_date"));
        assert!(query.ends_with("ORDER BY b.start_date, b.id LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn test_list_query_without_paging() {
        let query = list_query("i.owner_id", &filter(BookingState::Waiting, 0, None));
        assert!(query.contains("WHERE i.owner_id = $1 AND b.status = 'WAITING'"));
        assert!(query.ends_with("ORDER BY b.start_date, b.id"));
        assert!(!query.contains("$2"));
    }
}
