//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt API",
        version = "1.0.0",
        description = "Item sharing REST API: users, items, requests, bookings and comments"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::search_items,
        items::list_items_by_request,
        items::add_comment,
        // Requests
        requests::create_request,
        requests::list_own_requests,
        requests::list_all_requests,
        requests::get_request,
        requests::update_request,
        requests::delete_request,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::update_booking,
        bookings::approve_booking,
        bookings::delete_booking,
        bookings::list_bookings,
        bookings::list_owner_bookings,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemDetails,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::comment::Comment,
            crate::models::comment::CreateComment,
            // Requests
            crate::models::item_request::ItemRequest,
            crate::models::item_request::ItemRequestDetails,
            crate::models::item_request::CreateItemRequest,
            crate::models::item_request::UpdateItemRequest,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingStatus,
            crate::models::booking::BookingState,
            crate::models::booking::CreateBooking,
            crate::models::booking::UpdateBooking,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management"),
        (name = "items", description = "Shared items, search and comments"),
        (name = "requests", description = "Requests for items nobody offers yet"),
        (name = "bookings", description = "Booking lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_booking_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/bookings/{id}"));
        assert!(doc.paths.paths.contains_key("/items/by-request/{request_id}"));
    }
}
