//! Item endpoints: CRUD, search, request answers and comments

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        comment::{Comment, CreateComment},
        item::{CreateItem, Item, ItemDetails, SearchQuery, UpdateItem},
    },
    AppState,
};

use super::{AppJson, SharerUserId};

/// List the caller's items with booking window and comments
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Owned items", body = Vec<ItemDetails>),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.list_by_owner(owner_id).await?;
    Ok(Json(items))
}

/// Get item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_item(id).await?;
    Ok(Json(item))
}

/// Create a new item owned by the caller
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Owner or request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    AppJson(item): AppJson<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let created = state.services.items.create_item(owner_id, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an item
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 403, description = "Caller does not own the item", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    Path(id): Path<i64>,
    AppJson(update): AppJson<UpdateItem>,
) -> AppResult<Json<Item>> {
    let item = state.services.items.update_item(owner_id, id, update).await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Deleted item", body = Item),
        (status = 403, description = "Caller does not own the item", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    let item = state.services.items.delete_item(owner_id, id).await?;
    Ok(Json(item))
}

/// Search available items by name or description
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.services.items.search(&query.text).await?;
    Ok(Json(items))
}

/// List items offered in answer to a request
#[utoipa::path(
    get,
    path = "/items/by-request/{request_id}",
    tag = "items",
    params(
        ("request_id" = i64, Path, description = "Item request ID")
    ),
    responses(
        (status = 200, description = "Items answering the request", body = Vec<ItemDetails>),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_items_by_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.list_by_request(request_id).await?;
    Ok(Json(items))
}

/// Comment on an item after a finished booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Comment author")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "No completed booking or blank text", body = crate::error::ErrorResponse),
        (status = 404, description = "Item or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    SharerUserId(author_id): SharerUserId,
    Path(id): Path<i64>,
    AppJson(comment): AppJson<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let created = state.services.items.add_comment(author_id, id, comment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
