//! User management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new user; the email must not be taken (case-insensitive)
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;

        if self.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }

        let created = self.users.create(&user).await?;
        tracing::info!("Created user {}", created.id);
        Ok(created)
    }

    /// Apply a partial update to a user
    pub async fn update_user(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        update.validate()?;

        let mut user = self.users.get_by_id(id).await?;

        if let Some(email) = user.changed_email(&update) {
            if self.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    email
                )));
            }
        }

        user.apply(update);
        let updated = self.users.update(&user).await?;
        tracing::info!("Updated user {}", id);
        Ok(updated)
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.users.get_by_id(id).await?;
        self.users.delete(id).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::users::MockUserStore;
    use mockall::predicate::*;

    fn alice() -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let mut store = MockUserStore::new();
        store
            .expect_email_exists()
            .with(eq("alice@example.com"), eq(None::<i64>))
            .returning(|_, _| Ok(true));
        store.expect_create().never();

        let service = UsersService::new(Arc::new(store));
        let result = service
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_email_before_store() {
        let mut store = MockUserStore::new();
        store.expect_email_exists().never();
        store.expect_create().never();

        let service = UsersService::new(Arc::new(store));
        let result = service
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "nope".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_user_same_email_skips_uniqueness_check() {
        let mut store = MockUserStore::new();
        store.expect_get_by_id().with(eq(1_i64)).returning(|_| Ok(alice()));
        store.expect_email_exists().never();
        store.expect_update().returning(|user| Ok(user.clone()));

        let service = UsersService::new(Arc::new(store));
        let updated = service
            .update_user(
                1,
                UpdateUser {
                    name: Some("Alicia".to_string()),
                    email: Some("ALICE@example.com".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Alicia");
    }

    #[tokio::test]
    async fn test_update_user_email_taken_by_other() {
        let mut store = MockUserStore::new();
        store.expect_get_by_id().returning(|_| Ok(alice()));
        store
            .expect_email_exists()
            .with(eq("bob@example.com"), eq(Some(1_i64)))
            .returning(|_, _| Ok(true));
        store.expect_update().never();

        let service = UsersService::new(Arc::new(store));
        let result = service
            .update_user(
                1,
                UpdateUser {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut store = MockUserStore::new();
        store
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("User with id {} not found", id))));
        store.expect_delete().never();

        let service = UsersService::new(Arc::new(store));
        assert!(matches!(service.delete_user(9).await, Err(AppError::NotFound(_))));
    }
}
