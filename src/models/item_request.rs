//! Item request model: a user asking for an item nobody offers yet

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{item::Item, not_blank, user::User};

/// Item request with its requestor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor: User,
    pub created: NaiveDateTime,
}

/// Item request together with the items offered in answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemRequestDetails {
    pub id: i64,
    pub description: String,
    pub requestor: User,
    pub created: NaiveDateTime,
    pub items: Vec<Item>,
}

impl ItemRequestDetails {
    pub fn new(request: ItemRequest, items: Vec<Item>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            requestor: request.requestor,
            created: request.created,
            items,
        }
    }
}

/// Internal row structure joining the requestor columns
#[derive(Debug, Clone, FromRow)]
pub struct ItemRequestRow {
    id: i64,
    description: String,
    created: NaiveDateTime,
    requestor_id: i64,
    requestor_name: String,
    requestor_email: String,
}

impl From<ItemRequestRow> for ItemRequest {
    fn from(row: ItemRequestRow) -> Self {
        ItemRequest {
            id: row.id,
            description: row.description,
            requestor: User {
                id: row.requestor_id,
                name: row.requestor_name,
                email: row.requestor_email,
            },
            created: row.created,
        }
    }
}

/// Create item request payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

/// Partial item request update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
}

/// Insert payload for the request store
#[derive(Debug, Clone)]
pub struct NewItemRequest {
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

impl ItemRequest {
    pub fn is_requestor(&self, user_id: i64) -> bool {
        self.requestor.id == user_id
    }

    pub fn apply(&mut self, update: UpdateItemRequest) {
        if let Some(description) = update.description {
            self.description = description;
        }
    }
}
