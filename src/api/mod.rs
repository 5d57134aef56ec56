//! API handlers for ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
    routing::{get, post},
    Router,
};

use crate::{error::AppError, AppState};

/// Header carrying the id of the acting user
pub const SHARER_USER_ID: &str = "x-sharer-user-id";

/// JSON body extractor whose rejections (bad syntax, wrong shape, missing
/// content type) are reported as 400 validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Extractor for the acting user id from the `X-Sharer-User-Id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_ID)
            .ok_or_else(|| AppError::BadRequest("Missing X-Sharer-User-Id header".to_string()))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(SharerUserId)
            .ok_or_else(|| AppError::BadRequest("Invalid X-Sharer-User-Id header".to_string()))
    }
}

/// Business routes of the server, without middleware
pub fn routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/search", get(items::search_items))
        .route("/items/by-request/:request_id", get(items::list_items_by_request))
        .route(
            "/items/:id",
            get(items::get_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        .route("/items/:id/comment", post(items::add_comment))
        // Item requests
        .route("/requests", get(requests::list_own_requests).post(requests::create_request))
        .route("/requests/all", get(requests::list_all_requests))
        .route(
            "/requests/:id",
            get(requests::get_request)
                .put(requests::update_request)
                .delete(requests::delete_request),
        )
        // Bookings
        .route("/bookings", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/bookings/owner", get(bookings::list_owner_bookings))
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .patch(bookings::approve_booking)
                .delete(bookings::delete_booking),
        )
        .with_state(state)
}
