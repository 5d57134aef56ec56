//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::not_blank;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Unique (case-insensitive)
    pub email: String,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "Incorrect email format"))]
    pub email: String,
}

/// Partial user update: only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Incorrect email format"))]
    pub email: Option<String>,
}

impl User {
    /// Email the update would switch to, if it actually changes the current one
    pub fn changed_email<'a>(&self, update: &'a UpdateUser) -> Option<&'a str> {
        update
            .email
            .as_deref()
            .filter(|email| !email.eq_ignore_ascii_case(&self.email))
    }

    pub fn apply(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
    }
}
