//! Gateway item routes

use axum::{
    extract::{Path, Query, RawQuery, State},
    response::Response,
    Json,
};
use serde_json::Value;

use crate::{
    api::SharerUserId,
    error::AppResult,
    models::{
        comment::CreateComment,
        item::{CreateItem, SearchQuery, UpdateItem},
    },
};

use super::{validated, GatewayState};

pub async fn create_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<CreateItem>(&body)?;
    state.client.post("/items", Some(user_id), &body).await
}

pub async fn list_items(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Response> {
    state.client.get("/items", None, Some(user_id)).await
}

pub async fn get_item(
    State(state): State<GatewayState>,
    user: Option<SharerUserId>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .client
        .get(&format!("/items/{}", id), None, user.map(|u| u.0))
        .await
}

pub async fn update_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<UpdateItem>(&body)?;
    state
        .client
        .patch(&format!("/items/{}", id), None, Some(user_id), Some(&body))
        .await
}

pub async fn delete_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.client.delete(&format!("/items/{}", id), Some(user_id)).await
}

pub async fn search_items(
    State(state): State<GatewayState>,
    Query(_): Query<SearchQuery>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    state.client.get("/items/search", query.as_deref(), None).await
}

pub async fn list_items_by_request(
    State(state): State<GatewayState>,
    Path(request_id): Path<i64>,
) -> AppResult<Response> {
    state
        .client
        .get(&format!("/items/by-request/{}", request_id), None, None)
        .await
}

pub async fn add_comment(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<CreateComment>(&body)?;
    state
        .client
        .post(&format!("/items/{}/comment", id), Some(user_id), &body)
        .await
}
