//! Item request endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::item_request::{CreateItemRequest, ItemRequest, ItemRequestDetails, UpdateItemRequest},
    AppState,
};

use super::{AppJson, SharerUserId};

/// Create an item request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor")
    ),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Request created", body = ItemRequest),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    SharerUserId(requestor_id): SharerUserId,
    AppJson(request): AppJson<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemRequest>)> {
    let created = state.services.requests.create_request(requestor_id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's requests, newest first
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor")
    ),
    responses(
        (status = 200, description = "Own requests with offered items", body = Vec<ItemRequestDetails>),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_own_requests(
    State(state): State<AppState>,
    SharerUserId(requestor_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let requests = state.services.requests.list_by_requestor(requestor_id).await?;
    Ok(Json(requests))
}

/// List every request, newest first
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    responses(
        (status = 200, description = "All requests with offered items", body = Vec<ItemRequestDetails>)
    )
)]
pub async fn list_all_requests(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let requests = state.services.requests.list_all().await?;
    Ok(Json(requests))
}

/// Get request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request with offered items", body = ItemRequestDetails),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestDetails>> {
    let request = state.services.requests.get_request(id).await?;
    Ok(Json(request))
}

/// Update a request
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Request updated", body = ItemRequest),
        (status = 403, description = "Caller did not create the request", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request(
    State(state): State<AppState>,
    SharerUserId(requestor_id): SharerUserId,
    Path(id): Path<i64>,
    AppJson(update): AppJson<UpdateItemRequest>,
) -> AppResult<Json<ItemRequest>> {
    let request = state
        .services
        .requests
        .update_request(requestor_id, id, update)
        .await?;
    Ok(Json(request))
}

/// Delete a request
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor")
    ),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Caller did not create the request", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    SharerUserId(requestor_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.requests.delete_request(requestor_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
