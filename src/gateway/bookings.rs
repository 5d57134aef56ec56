//! Gateway booking routes

use axum::{
    extract::{Path, Query, RawQuery, State},
    response::Response,
    Json,
};
use serde_json::Value;
use validator::Validate;

use crate::{
    api::SharerUserId,
    error::AppResult,
    models::booking::{ApproveQuery, BookingListQuery, CreateBooking, UpdateBooking},
};

use super::{validated, GatewayState};

/// Unknown state or bad paging never reaches the server
fn check_list_query(query: &BookingListQuery) -> AppResult<()> {
    query.validate()?;
    query.state()?;
    Ok(())
}

pub async fn create_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    validated::<CreateBooking>(&body)?;
    state.client.post("/bookings", Some(user_id), &body).await
}

pub async fn get_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .client
        .get(&format!("/bookings/{}", id), None, Some(user_id))
        .await
}

pub async fn update_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    super::parsed::<UpdateBooking>(&body)?;
    state
        .client
        .put(&format!("/bookings/{}", id), Some(user_id), &body)
        .await
}

pub async fn approve_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(_): Query<ApproveQuery>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    state
        .client
        .patch(&format!("/bookings/{}", id), query.as_deref(), Some(user_id), None)
        .await
}

pub async fn delete_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.client.delete(&format!("/bookings/{}", id), Some(user_id)).await
}

pub async fn list_bookings(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(list): Query<BookingListQuery>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    check_list_query(&list)?;
    state.client.get("/bookings", query.as_deref(), Some(user_id)).await
}

pub async fn list_owner_bookings(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(list): Query<BookingListQuery>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    check_list_query(&list)?;
    state
        .client
        .get("/bookings/owner", query.as_deref(), Some(user_id))
        .await
}
