//! Item model and related types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{comment::Comment, not_blank};

/// Shared item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    /// Request this item was added in answer to
    pub request_id: Option<i64>,
}

/// Item with booking window and comments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    /// End of the latest approved booking that is already over
    pub last_booking: Option<NaiveDateTime>,
    /// Start of the earliest upcoming waiting or approved booking
    pub next_booking: Option<NaiveDateTime>,
    pub comments: Vec<Comment>,
}

impl ItemDetails {
    pub fn new(
        item: Item,
        last_booking: Option<NaiveDateTime>,
        next_booking: Option<NaiveDateTime>,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            last_booking,
            next_booking,
            comments,
        }
    }
}

/// Create item request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
}

/// Partial item update: only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Insert payload for the item store
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Matched case-insensitively against name and description
    pub text: String,
}

impl Item {
    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    pub fn apply(&mut self, update: UpdateItem) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            id: 7,
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: true,
            owner_id: 1,
            request_id: None,
        }
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut item = item();
        item.apply(UpdateItem {
            available: Some(false),
            ..Default::default()
        });
        assert_eq!(item.name, "Drill");
        assert_eq!(item.description, "Cordless drill");
        assert!(!item.available);
    }

    #[test]
    fn test_item_json_is_camel_case() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["ownerId"], 1);
        assert!(json["requestId"].is_null());
    }

    #[test]
    fn test_create_item_requires_description() {
        let create: CreateItem = serde_json::from_value(serde_json::json!({
            "name": "Saw",
            "description": " ",
            "available": true
        }))
        .unwrap();
        assert!(create.validate().is_err());
        assert_eq!(create.request_id, None);
    }
}
