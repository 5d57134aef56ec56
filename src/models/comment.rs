//! Item comment model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::not_blank;

/// Comment left on an item after a finished booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_name: String,
    pub created: NaiveDateTime,
}

/// Add comment request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

/// Insert payload for the comment store
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: NaiveDateTime,
}
