//! Item service: item CRUD, expanded views, search and comments

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingStatus},
        comment::{Comment, CreateComment, NewComment},
        item::{CreateItem, Item, ItemDetails, NewItem, UpdateItem},
        local_now,
    },
    repository::{BookingStore, CommentStore, ItemStore, RequestStore, UserStore},
};

/// `(lastBooking, nextBooking)` for one item's bookings at instant `now`.
///
/// Last is the end of the latest approved booking already over, next is the
/// start of the earliest waiting or approved booking still ahead.
pub fn booking_window(
    bookings: &[Booking],
    now: NaiveDateTime,
) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let last = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Approved && b.end < now)
        .map(|b| b.end)
        .max();

    let next = bookings
        .iter()
        .filter(|b| matches!(b.status, BookingStatus::Waiting | BookingStatus::Approved))
        .filter(|b| b.start > now)
        .map(|b| b.start)
        .min();

    (last, next)
}

#[derive(Clone)]
pub struct ItemsService {
    items: Arc<dyn ItemStore>,
    users: Arc<dyn UserStore>,
    requests: Arc<dyn RequestStore>,
    bookings: Arc<dyn BookingStore>,
    comments: Arc<dyn CommentStore>,
}

impl ItemsService {
    pub fn new(
        items: Arc<dyn ItemStore>,
        users: Arc<dyn UserStore>,
        requests: Arc<dyn RequestStore>,
        bookings: Arc<dyn BookingStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            items,
            users,
            requests,
            bookings,
            comments,
        }
    }

    pub async fn create_item(&self, owner_id: i64, item: CreateItem) -> AppResult<Item> {
        item.validate()?;
        self.users.get_by_id(owner_id).await?;
        if let Some(request_id) = item.request_id {
            self.requests.get_by_id(request_id).await?;
        }

        let created = self
            .items
            .create(&NewItem {
                name: item.name,
                description: item.description,
                available: item.available,
                owner_id,
                request_id: item.request_id,
            })
            .await?;

        tracing::info!("User {} created item {}", owner_id, created.id);
        Ok(created)
    }

    pub async fn update_item(&self, owner_id: i64, item_id: i64, update: UpdateItem) -> AppResult<Item> {
        update.validate()?;
        let mut item = self.owned_item(owner_id, item_id).await?;

        item.apply(update);
        let updated = self.items.update(&item).await?;
        tracing::info!("User {} updated item {}", owner_id, item_id);
        Ok(updated)
    }

    /// Remove an item, returning it as it was before deletion
    pub async fn delete_item(&self, owner_id: i64, item_id: i64) -> AppResult<Item> {
        let item = self.owned_item(owner_id, item_id).await?;

        self.items.delete(item_id).await?;
        tracing::info!("User {} deleted item {}", owner_id, item_id);
        Ok(item)
    }

    pub async fn get_item(&self, item_id: i64) -> AppResult<ItemDetails> {
        let item = self.items.get_by_id(item_id).await?;
        let bookings = self.bookings.list_by_items(&[item_id]).await?;
        let comments = self.comments.list_by_item(item_id).await?;

        let (last, next) = booking_window(&bookings, local_now());
        Ok(ItemDetails::new(item, last, next, comments))
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<ItemDetails>> {
        self.users.get_by_id(owner_id).await?;
        let items = self.items.list_by_owner(owner_id).await?;
        self.expand(items).await
    }

    /// Items offered in answer to a request
    pub async fn list_by_request(&self, request_id: i64) -> AppResult<Vec<ItemDetails>> {
        self.requests.get_by_id(request_id).await?;
        let items = self.items.list_by_request(request_id).await?;
        self.expand(items).await
    }

    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.items.search(text).await
    }

    /// Comment on an item the author has finished a booking for
    pub async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        comment: CreateComment,
    ) -> AppResult<Comment> {
        comment.validate()?;
        self.items.get_by_id(item_id).await?;
        self.users.get_by_id(author_id).await?;

        let now = local_now();
        if !self.bookings.exists_completed(item_id, author_id, now).await? {
            return Err(AppError::InvalidState(format!(
                "User {} has no completed booking of item {}",
                author_id, item_id
            )));
        }

        let created = self
            .comments
            .create(&NewComment {
                text: comment.text,
                item_id,
                author_id,
                created: now,
            })
            .await?;

        tracing::info!("User {} commented on item {}", author_id, item_id);
        Ok(created)
    }

    async fn owned_item(&self, owner_id: i64, item_id: i64) -> AppResult<Item> {
        let item = self.items.get_by_id(item_id).await?;
        if !item.is_owner(owner_id) {
            tracing::warn!("User {} tried to modify item {} they do not own", owner_id, item_id);
            return Err(AppError::Authorization(format!(
                "User {} does not own item {}",
                owner_id, item_id
            )));
        }
        Ok(item)
    }

    async fn expand(&self, items: Vec<Item>) -> AppResult<Vec<ItemDetails>> {
        let ids: Vec<i64> = items.iter().map(|item| item.id).collect();

        let mut bookings: HashMap<i64, Vec<Booking>> = HashMap::new();
        for booking in self.bookings.list_by_items(&ids).await? {
            bookings.entry(booking.item.id).or_default().push(booking);
        }

        let mut comments: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in self.comments.list_by_items(&ids).await? {
            comments.entry(comment.item_id).or_default().push(comment);
        }

        let now = local_now();
        Ok(items
            .into_iter()
            .map(|item| {
                let (last, next) = bookings
                    .get(&item.id)
                    .map(|b| booking_window(b, now))
                    .unwrap_or((None, None));
                let item_comments = comments.remove(&item.id).unwrap_or_default();
                ItemDetails::new(item, last, next, item_comments)
            })
            .collect())
    }
}
