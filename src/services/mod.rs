//! Business logic services

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

use std::sync::Arc;

use crate::repository::{
    BookingStore, CommentStore, ItemStore, Repository, RequestStore, UserStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub requests: requests::RequestsService,
    pub bookings: bookings::BookingsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(repository.users);
        let items: Arc<dyn ItemStore> = Arc::new(repository.items);
        let requests: Arc<dyn RequestStore> = Arc::new(repository.requests);
        let bookings: Arc<dyn BookingStore> = Arc::new(repository.bookings);
        let comments: Arc<dyn CommentStore> = Arc::new(repository.comments);

        Self {
            users: users::UsersService::new(users.clone()),
            items: items::ItemsService::new(
                items.clone(),
                users.clone(),
                requests.clone(),
                bookings.clone(),
                comments,
            ),
            requests: requests::RequestsService::new(requests, users.clone(), items.clone()),
            bookings: bookings::BookingsService::new(bookings, items, users),
        }
    }
}
