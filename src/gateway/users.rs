//! Gateway user routes

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser},
};

use super::{validated, GatewayState};

pub async fn create_user(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<CreateUser>(&body)?;
    state.client.post("/users", None, &body).await
}

pub async fn list_users(State(state): State<GatewayState>) -> AppResult<Response> {
    state.client.get("/users", None, None).await
}

pub async fn get_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.client.get(&format!("/users/{}", id), None, None).await
}

pub async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<UpdateUser>(&body)?;
    state
        .client
        .patch(&format!("/users/{}", id), None, None, Some(&body))
        .await
}

pub async fn delete_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.client.delete(&format!("/users/{}", id), None).await
}
