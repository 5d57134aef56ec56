//! ShareIt item sharing backend
//!
//! Library behind two binaries: the server (users, items, requests,
//! bookings and comments over PostgreSQL) and the gateway that validates
//! requests before relaying them to the server.

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    pub repository: repository::Repository,
}

/// Wrap a router with request tracing and permissive CORS
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(TraceLayer::new_for_http()).layer(cors)
}

/// Create the server router with all routes and OpenAPI documentation
pub fn create_router(state: AppState) -> Router {
    let router = api::routes(state).merge(api::openapi::create_openapi_router());
    with_middleware(router)
}
