//! Booking service: lifecycle transitions and state-bucketed listings

use std::sync::Arc;

use chrono::NaiveDateTime;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{
            validate_range, Booking, BookingListQuery, BookingStatus, CreateBooking, NewBooking,
            UpdateBooking,
        },
        local_now,
    },
    repository::{BookingStore, ItemStore, UserStore},
};

#[derive(Clone)]
pub struct BookingsService {
    bookings: Arc<dyn BookingStore>,
    items: Arc<dyn ItemStore>,
    users: Arc<dyn UserStore>,
}

impl BookingsService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        items: Arc<dyn ItemStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            bookings,
            items,
            users,
        }
    }

    /// Book an available item owned by someone else; the booking starts WAITING
    pub async fn create_booking(&self, booker_id: i64, booking: CreateBooking) -> AppResult<Booking> {
        booking.validate()?;
        validate_range(booking.start, booking.end)?;

        let item = self.items.get_by_id(booking.item_id).await?;
        self.users.get_by_id(booker_id).await?;

        if !item.available {
            return Err(AppError::InvalidState(format!(
                "Item {} is not available",
                item.id
            )));
        }
        if item.is_owner(booker_id) {
            return Err(AppError::InvalidState(format!(
                "User {} cannot book their own item {}",
                booker_id, item.id
            )));
        }

        let created = self
            .bookings
            .create(&NewBooking {
                start: booking.start,
                end: booking.end,
                item_id: item.id,
                booker_id,
                status: BookingStatus::Waiting,
            })
            .await?;

        tracing::info!(
            "User {} booked item {} from {} to {} (booking {})",
            booker_id,
            item.id,
            created.start,
            created.end,
            created.id
        );
        Ok(created)
    }

    pub async fn update_booking_times(
        &self,
        booking_id: i64,
        requester_id: i64,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> AppResult<Booking> {
        let mut booking = self.bookings.get_by_id(booking_id).await?;
        booking.reschedule(requester_id, start, end)?;

        let updated = self.bookings.update(&booking).await?;
        tracing::info!("Booking {} rescheduled to {} - {}", booking_id, updated.start, updated.end);
        Ok(updated)
    }

    pub async fn cancel_booking(&self, booking_id: i64, requester_id: i64) -> AppResult<Booking> {
        let mut booking = self.bookings.get_by_id(booking_id).await?;
        booking.cancel(requester_id)?;

        let updated = self.bookings.update(&booking).await?;
        tracing::info!("Booking {} cancelled by user {}", booking_id, requester_id);
        Ok(updated)
    }

    /// Owner decision on a waiting booking
    pub async fn approve_booking(
        &self,
        booking_id: i64,
        owner_id: i64,
        approved: bool,
    ) -> AppResult<Booking> {
        let mut booking = self.bookings.get_by_id(booking_id).await?;
        booking.decide(owner_id, approved)?;

        let updated = self.bookings.update(&booking).await?;
        tracing::info!("Booking {} is now {}", booking_id, updated.status);
        Ok(updated)
    }

    /// Booker-side update: new bounds and/or cancellation, saved together
    pub async fn update_booking(
        &self,
        booking_id: i64,
        requester_id: i64,
        update: UpdateBooking,
    ) -> AppResult<Booking> {
        let mut booking = self.bookings.get_by_id(booking_id).await?;
        if !booking.is_booker(requester_id) {
            return Err(AppError::Authorization(format!(
                "User {} is not the booker of booking {}",
                requester_id, booking_id
            )));
        }

        if update.start.is_some() || update.end.is_some() {
            booking.reschedule(requester_id, update.start, update.end)?;
        }

        match update.status {
            None => {}
            Some(BookingStatus::Cancelled) => booking.cancel(requester_id)?,
            Some(status) => {
                return Err(AppError::InvalidState(format!(
                    "Booker cannot set booking {} to {}",
                    booking_id, status
                )))
            }
        }

        let updated = self.bookings.update(&booking).await?;
        tracing::info!("Booking {} updated by user {}", booking_id, requester_id);
        Ok(updated)
    }

    pub async fn delete_booking(&self, booking_id: i64, requester_id: i64) -> AppResult<()> {
        let booking = self.bookings.get_by_id(booking_id).await?;
        if !booking.is_booker(requester_id) {
            return Err(AppError::Authorization(format!(
                "User {} is not the booker of booking {}",
                requester_id, booking_id
            )));
        }

        self.bookings.delete(booking_id).await?;
        tracing::info!("Booking {} deleted by user {}", booking_id, requester_id);
        Ok(())
    }

    /// Visible to the booker and to the item owner only
    pub async fn get_booking(&self, booking_id: i64, user_id: i64) -> AppResult<Booking> {
        self.users.get_by_id(user_id).await?;
        let booking = self.bookings.get_by_id(booking_id).await?;

        if !booking.is_booker(user_id) && !booking.is_owner(user_id) {
            return Err(AppError::Authorization(format!(
                "User {} cannot view booking {}",
                user_id, booking_id
            )));
        }
        Ok(booking)
    }

    pub async fn list_for_booker(
        &self,
        booker_id: i64,
        query: &BookingListQuery,
    ) -> AppResult<Vec<Booking>> {
        query.validate()?;
        let filter = query.filter(local_now())?;
        self.users.get_by_id(booker_id).await?;

        self.bookings.list_by_booker(booker_id, &filter).await
    }

    /// Bookings on every item the user owns
    pub async fn list_for_owner(
        &self,
        owner_id: i64,
        query: &BookingListQuery,
    ) -> AppResult<Vec<Booking>> {
        query.validate()?;
        let filter = query.filter(local_now())?;
        self.users.get_by_id(owner_id).await?;

        self.bookings.list_by_owner(owner_id, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{booking::BookingState, item::Item, user::User};
    use crate::repository::{bookings::MockBookingStore, items::MockItemStore, users::MockUserStore};
    use chrono::Duration;

    const OWNER: i64 = 1;
    const BOOKER: i64 = 2;

    fn item(available: bool) -> Item {
        Item {
            id: 10,
            name: "Kayak".to_string(),
            description: "Single seat kayak".to_string(),
            available,
            owner_id: OWNER,
            request_id: None,
        }
    }

    fn user(id: i64) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
        }
    }

    fn booking(id: i64, start: NaiveDateTime, end: NaiveDateTime, status: BookingStatus) -> Booking {
        Booking {
            id,
            start,
            end,
            item: item(true),
            booker: user(BOOKER),
            status,
        }
    }

    fn tomorrow() -> CreateBooking {
        let now = local_now();
        CreateBooking {
            start: now + Duration::days(1),
            end: now + Duration::days(2),
            item_id: 10,
        }
    }

    fn service(bookings: MockBookingStore, items: MockItemStore, users: MockUserStore) -> BookingsService {
        BookingsService::new(Arc::new(bookings), Arc::new(items), Arc::new(users))
    }

    /// Booking store that keeps one booking in memory across get/update
    fn stateful_store(initial: Booking) -> MockBookingStore {
        let current = Arc::new(std::sync::Mutex::new(initial));
        let mut store = MockBookingStore::new();

        let read = current.clone();
        store
            .expect_get_by_id()
            .returning(move |_| Ok(read.lock().unwrap().clone()));

        let write = current;
        store.expect_update().returning(move |b| {
            *write.lock().unwrap() = b.clone();
            Ok(b.clone())
        });
        store
    }

    #[tokio::test]
    async fn test_create_waiting_then_approve_then_cancel() {
        let request = tomorrow();
        let (start, end) = (request.start, request.end);

        let mut items = MockItemStore::new();
        items.expect_get_by_id().returning(|_| Ok(item(true)));
        let mut users = MockUserStore::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));
        let mut create_store = MockBookingStore::new();
        create_store.expect_create().returning(|b| {
            Ok(booking(1, b.start, b.end, b.status))
        });

        let created = service(create_store, items, users)
            .create_booking(BOOKER, request)
            .await
            .unwrap();
        assert_eq!(created.status, BookingStatus::Waiting);
        assert!(created.start < created.end);

        let svc = service(
            stateful_store(booking(1, start, end, BookingStatus::Waiting)),
            MockItemStore::new(),
            MockUserStore::new(),
        );
        let approved = svc.approve_booking(1, OWNER, true).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let cancelled = svc.cancel_booking(1, BOOKER).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_owner_cannot_book_own_item() {
        let mut items = MockItemStore::new();
        items.expect_get_by_id().returning(|_| Ok(item(true)));
        let mut users = MockUserStore::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));
        let mut bookings = MockBookingStore::new();
        bookings.expect_create().never();

        let result = service(bookings, items, users)
            .create_booking(OWNER, tomorrow())
            .await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_unavailable_item_cannot_be_booked() {
        let mut items = MockItemStore::new();
        items.expect_get_by_id().returning(|_| Ok(item(false)));
        let mut users = MockUserStore::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));
        let mut bookings = MockBookingStore::new();
        bookings.expect_create().never();

        let result = service(bookings, items, users)
            .create_booking(BOOKER, tomorrow())
            .await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let mut request = tomorrow();
        std::mem::swap(&mut request.start, &mut request.end);

        let result = service(MockBookingStore::new(), MockItemStore::new(), MockUserStore::new())
            .create_booking(BOOKER, request)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_approve() {
        let now = local_now();
        let mut store = MockBookingStore::new();
        store.expect_get_by_id().returning(move |id| {
            Ok(booking(id, now + Duration::days(1), now + Duration::days(2), BookingStatus::Waiting))
        });
        store.expect_update().never();

        let result = service(store, MockItemStore::new(), MockUserStore::new())
            .approve_booking(1, BOOKER, true)
            .await;
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_update_booking_rejects_other_status() {
        let now = local_now();
        let svc = service(
            stateful_store(booking(1, now + Duration::days(1), now + Duration::days(2), BookingStatus::Waiting)),
            MockItemStore::new(),
            MockUserStore::new(),
        );

        let result = svc
            .update_booking(
                1,
                BOOKER,
                UpdateBooking {
                    status: Some(BookingStatus::Approved),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));

        let cancelled = svc
            .update_booking(
                1,
                BOOKER,
                UpdateBooking {
                    status: Some(BookingStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_update_booking_times_keeps_range() {
        let now = local_now();
        let svc = service(
            stateful_store(booking(1, now + Duration::days(1), now + Duration::days(2), BookingStatus::Waiting)),
            MockItemStore::new(),
            MockUserStore::new(),
        );

        let inverted = svc
            .update_booking_times(1, BOOKER, Some(now + Duration::days(3)), None)
            .await;
        assert!(matches!(inverted, Err(AppError::Validation(_))));

        let moved = svc
            .update_booking_times(1, BOOKER, None, Some(now + Duration::days(4)))
            .await
            .unwrap();
        assert_eq!(moved.end, now + Duration::days(4));
        assert!(moved.start < moved.end);

        let by_owner = svc.update_booking_times(1, OWNER, None, None).await;
        assert!(matches!(by_owner, Err(AppError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_stranger_cannot_view_booking() {
        let now = local_now();
        let mut users = MockUserStore::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));
        let mut store = MockBookingStore::new();
        store.expect_get_by_id().returning(move |id| {
            Ok(booking(id, now + Duration::days(1), now + Duration::days(2), BookingStatus::Waiting))
        });

        let svc = service(store, MockItemStore::new(), users);
        assert!(matches!(svc.get_booking(1, 3).await, Err(AppError::Authorization(_))));
        assert!(svc.get_booking(1, OWNER).await.is_ok());
        assert!(svc.get_booking(1, BOOKER).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_state_is_bad_request() {
        let query = BookingListQuery {
            state: Some("LATER".to_string()),
            ..Default::default()
        };
        let result = service(MockBookingStore::new(), MockItemStore::new(), MockUserStore::new())
            .list_for_booker(BOOKER, &query)
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_owner_list_is_filtered_and_paged_by_store() {
        let mut users = MockUserStore::new();
        users.expect_get_by_id().returning(|id| Ok(user(id)));

        let mut store = MockBookingStore::new();
        store.expect_list_by_booker().never();
        store
            .expect_list_by_owner()
            .withf(|owner, filter| {
                *owner == OWNER
                    && filter.state == BookingState::Future
                    && filter.from == 5
                    && filter.size == Some(2)
            })
            .times(1)
            .returning(|_, filter| {
                let start = filter.now + Duration::days(1);
                Ok(vec![booking(6, start, start + Duration::days(1), BookingStatus::Waiting)])
            });

        let query = BookingListQuery {
            state: Some("future".to_string()),
            from: Some(5),
            size: Some(2),
        };
        let page = service(store, MockItemStore::new(), users)
            .list_for_owner(OWNER, &query)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 6);
    }

    #[tokio::test]
    async fn test_negative_from_never_reaches_store() {
        let mut store = MockBookingStore::new();
        store.expect_list_by_booker().never();

        let query = BookingListQuery {
            from: Some(-1),
            ..Default::default()
        };
        let result = service(store, MockItemStore::new(), MockUserStore::new())
            .list_for_booker(BOOKER, &query)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
