//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::booking::{ApproveQuery, Booking, BookingListQuery, CreateBooking, UpdateBooking},
    AppState,
};

use super::{AppJson, SharerUserId};

/// Book an item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker")
    ),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created, waiting for approval", body = Booking),
        (status = 400, description = "Invalid dates, item unavailable or own item", body = crate::error::ErrorResponse),
        (status = 404, description = "Item or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    SharerUserId(booker_id): SharerUserId,
    AppJson(booking): AppJson<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let created = state.services.bookings.create_booking(booker_id, booking).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get booking by ID (booker or item owner only)
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booker or item owner")
    ),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 403, description = "Caller is neither booker nor owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_booking(id, user_id).await?;
    Ok(Json(booking))
}

/// Reschedule and/or cancel a booking (booker only)
#[utoipa::path(
    put,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booker")
    ),
    request_body = UpdateBooking,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 400, description = "Invalid range or status change", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not the booker", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    AppJson(update): AppJson<UpdateBooking>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.update_booking(id, user_id, update).await?;
    Ok(Json(booking))
}

/// Approve or reject a waiting booking (item owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner"),
        ApproveQuery
    ),
    responses(
        (status = 200, description = "Booking approved or rejected", body = Booking),
        (status = 400, description = "Booking is not waiting", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller does not own the item", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    Path(id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> AppResult<Json<Booking>> {
    let approved = query.approved.unwrap_or(false);
    let booking = state
        .services
        .bookings
        .approve_booking(id, owner_id, approved)
        .await?;
    Ok(Json(booking))
}

/// Delete a booking (booker only)
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booker")
    ),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 403, description = "Caller is not the booker", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.bookings.delete_booking(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's bookings by state
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings sorted by start", body = Vec<Booking>),
        (status = 400, description = "Unknown state or bad paging", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    SharerUserId(booker_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.bookings.list_for_booker(booker_id, &query).await?;
    Ok(Json(bookings))
}

/// List bookings on the caller's items by state
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings sorted by start", body = Vec<Booking>),
        (status = 400, description = "Unknown state or bad paging", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.bookings.list_for_owner(owner_id, &query).await?;
    Ok(Json(bookings))
}
