//! Validating gateway in front of the ShareIt server
//!
//! Each route checks its payload, header and query parameters, then relays
//! the request unchanged through [`client::ServerClient`]. Whatever the
//! server answers (status, content type, body) goes back to the caller as is.

pub mod bookings;
pub mod client;
pub mod items;
pub mod requests;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub use client::ServerClient;

/// State shared by gateway handlers
#[derive(Clone)]
pub struct GatewayState {
    pub client: ServerClient,
}

/// Decode a JSON body into `T`; shape errors are a 400
pub(crate) fn parsed<T: DeserializeOwned>(body: &Value) -> AppResult<T> {
    T::deserialize(body).map_err(|e| AppError::Validation(e.to_string()))
}

/// Decode and validate a JSON body without consuming it
pub(crate) fn validated<T: DeserializeOwned + Validate>(body: &Value) -> AppResult<T> {
    let value: T = parsed(body)?;
    value.validate()?;
    Ok(value)
}

/// Gateway routes, mirroring the server's business routes
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(crate::api::health::health_check))
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
