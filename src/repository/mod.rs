//! Repository layer for database operations
//!
//! Each entity has a store trait consumed by the services and a PostgreSQL
//! implementation backed by the shared pool.

pub mod bookings;
pub mod comments;
pub mod item_requests;
pub mod items;
pub mod users;

use sqlx::{Pool, Postgres};

pub use bookings::{BookingStore, BookingsRepository};
pub use comments::{CommentStore, CommentsRepository};
pub use item_requests::{ItemRequestsRepository, RequestStore};
pub use items::{ItemStore, ItemsRepository};
pub use users::{UserStore, UsersRepository};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: UsersRepository,
    pub items: ItemsRepository,
    pub requests: ItemRequestsRepository,
    pub bookings: BookingsRepository,
    pub comments: CommentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: UsersRepository::new(pool.clone()),
            items: ItemsRepository::new(pool.clone()),
            requests: ItemRequestsRepository::new(pool.clone()),
            bookings: BookingsRepository::new(pool.clone()),
            comments: CommentsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness check
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
