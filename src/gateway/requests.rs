//! Gateway item request routes

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde_json::Value;

use crate::{
    api::SharerUserId,
    error::AppResult,
    models::item_request::{CreateItemRequest, UpdateItemRequest},
};

use super::{validated, GatewayState};

pub async fn create_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<CreateItemRequest>(&body)?;
    state.client.post("/requests", Some(user_id), &body).await
}

pub async fn list_own_requests(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Response> {
    state.client.get("/requests", None, Some(user_id)).await
}

pub async fn list_all_requests(
    State(state): State<GatewayState>,
    user: Option<SharerUserId>,
) -> AppResult<Response> {
    state.client.get("/requests/all", None, user.map(|u| u.0)).await
}

pub async fn get_request(
    State(state): State<GatewayState>,
    user: Option<SharerUserId>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .client
        .get(&format!("/requests/{}", id), None, user.map(|u| u.0))
        .await
}

pub async fn update_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<UpdateItemRequest>(&body)?;
    state
        .client
        .put(&format!("/requests/{}", id), Some(user_id), &body)
        .await
}

pub async fn delete_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.client.delete(&format!("/requests/{}", id), Some(user_id)).await
}
