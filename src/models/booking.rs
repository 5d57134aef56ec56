//! Booking model, status lifecycle and state buckets

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{item::Item, local_now, user::User};
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Lifecycle status stored with each booking.
///
/// WAITING moves to APPROVED or REJECTED by the item owner, or to CANCELLED
/// by the booker. APPROVED can only be CANCELLED. REJECTED and CANCELLED are
/// final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

// ---------------------------------------------------------------------------
// BookingState
// ---------------------------------------------------------------------------

/// Time/status bucket used by the booking list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    #[default]
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(AppError::BadRequest(format!("Unknown state: {}", s))),
        }
    }
}

impl BookingState {
    /// Whether `booking` falls into this bucket at instant `now`
    pub fn matches(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        match self {
            BookingState::All => true,
            BookingState::Current => booking.start <= now && now <= booking.end,
            BookingState::Past => now > booking.end,
            BookingState::Future => now < booking.start,
            BookingState::Waiting => booking.status == BookingStatus::Waiting,
            BookingState::Rejected => booking.status == BookingStatus::Rejected,
        }
    }

    /// SQL condition selecting the same bookings as [`BookingState::matches`].
    ///
    /// Columns are those of `bookings b`; `now` is bound as `$2`.
    pub fn sql_predicate(&self) -> &'static str {
        match self {
            BookingState::All => "TRUE",
            BookingState::Current => "$2 BETWEEN b.start_date AND b.end_date",
            BookingState::Past => "b.end_date < $2",
            BookingState::Future => "b.start_date > $2",
            BookingState::Waiting => "b.status = 'WAITING'",
            BookingState::Rejected => "b.status = 'REJECTED'",
        }
    }

    /// Whether the SQL condition references the bound `now`
    pub fn uses_now(&self) -> bool {
        matches!(
            self,
            BookingState::Current | BookingState::Past | BookingState::Future
        )
    }
}

/// Booking list selection handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingFilter {
    pub state: BookingState,
    pub now: NaiveDateTime,
    /// Rows to skip
    pub from: i64,
    /// Page size, unbounded when absent
    pub size: Option<i64>,
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Booking of an item by a user for a time range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item: Item,
    pub booker: User,
    pub status: BookingStatus,
}

/// Internal row structure for bookings joined with their item and booker
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    id: i64,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    status: BookingStatus,
    item_id: i64,
    item_name: String,
    item_description: String,
    item_available: bool,
    item_owner_id: i64,
    item_request_id: Option<i64>,
    booker_id: i64,
    booker_name: String,
    booker_email: String,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            start: row.start_date,
            end: row.end_date,
            item: Item {
                id: row.item_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
                owner_id: row.item_owner_id,
                request_id: row.item_request_id,
            },
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
            status: row.status,
        }
    }
}

/// Reject ranges where start is not strictly before end
pub fn validate_range(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if start >= end {
        return Err(AppError::Validation(format!(
            "Booking start {} must be before end {}",
            start, end
        )));
    }
    Ok(())
}

impl Booking {
    pub fn is_booker(&self, user_id: i64) -> bool {
        self.booker.id == user_id
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.item.owner_id == user_id
    }

    fn require_booker(&self, user_id: i64) -> AppResult<()> {
        if !self.is_booker(user_id) {
            return Err(AppError::Authorization(format!(
                "User {} is not the booker of booking {}",
                user_id, self.id
            )));
        }
        Ok(())
    }

    /// Booker cancels a waiting or approved booking
    pub fn cancel(&mut self, requester_id: i64) -> AppResult<()> {
        self.require_booker(requester_id)?;
        match self.status {
            BookingStatus::Waiting | BookingStatus::Approved => {
                self.status = BookingStatus::Cancelled;
                Ok(())
            }
            status => Err(AppError::InvalidState(format!(
                "Booking {} is {} and cannot be cancelled",
                self.id, status
            ))),
        }
    }

    /// Booker moves the bounds of a booking that is still waiting
    pub fn reschedule(
        &mut self,
        requester_id: i64,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> AppResult<()> {
        self.require_booker(requester_id)?;
        if self.status != BookingStatus::Waiting {
            return Err(AppError::InvalidState(format!(
                "Booking {} is {}, only waiting bookings can be rescheduled",
                self.id, self.status
            )));
        }

        let start = start.unwrap_or(self.start);
        let end = end.unwrap_or(self.end);
        validate_range(start, end)?;

        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Item owner approves or rejects a waiting booking
    pub fn decide(&mut self, owner_id: i64, approved: bool) -> AppResult<()> {
        if !self.is_owner(owner_id) {
            return Err(AppError::Authorization(format!(
                "User {} does not own item {}",
                owner_id, self.item.id
            )));
        }
        if self.status != BookingStatus::Waiting {
            return Err(AppError::InvalidState(format!(
                "Booking {} is already {}",
                self.id, self.status
            )));
        }

        self.status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

fn in_future(value: &NaiveDateTime) -> Result<(), ValidationError> {
    if *value <= local_now() {
        let mut error = ValidationError::new("in_future");
        error.message = Some(Cow::from("must be in the future"));
        return Err(error);
    }
    Ok(())
}

/// Create booking request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(custom(function = "in_future"))]
    pub start: NaiveDateTime,
    #[validate(custom(function = "in_future"))]
    pub end: NaiveDateTime,
    pub item_id: i64,
}

/// Update booking request: new bounds and/or a status change requested by the booker
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

/// Insert payload for the booking store
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Booking list query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
pub struct BookingListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (case-insensitive)
    pub state: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub from: Option<i64>,
    #[validate(range(min = 1, message = "must be positive"))]
    pub size: Option<i64>,
}

impl BookingListQuery {
    pub fn state(&self) -> AppResult<BookingState> {
        match self.state.as_deref() {
            Some(state) => state.parse(),
            None => Ok(BookingState::All),
        }
    }

    /// Parse the state and resolve paging defaults against `now`
    pub fn filter(&self, now: NaiveDateTime) -> AppResult<BookingFilter> {
        Ok(BookingFilter {
            state: self.state()?,
            now,
            from: self.from.unwrap_or(0).max(0),
            size: self.size.map(|size| size.max(0)),
        })
    }
}

/// Approval query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct ApproveQuery {
    /// Defaults to false (reject)
    pub approved: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> NaiveDateTime {
        local_now()
    }

    fn booking(status: BookingStatus) -> Booking {
        let now = now();
        Booking {
            id: 1,
            start: now + Duration::days(1),
            end: now + Duration::days(2),
            item: Item {
                id: 10,
                name: "Ladder".to_string(),
                description: "Three meter ladder".to_string(),
                available: true,
                owner_id: 100,
                request_id: None,
            },
            booker: User {
                id: 200,
                name: "Booker".to_string(),
                email: "booker@example.com".to_string(),
            },
            status,
        }
    }

    #[test]
    fn test_approve_then_cancel() {
        let mut booking = booking(BookingStatus::Waiting);
        booking.decide(100, true).unwrap();
        assert_eq!(booking.status, BookingStatus::Approved);
        booking.cancel(200).unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_reject_is_final() {
        let mut booking = booking(BookingStatus::Waiting);
        booking.decide(100, false).unwrap();
        assert_eq!(booking.status, BookingStatus::Rejected);

        assert!(matches!(booking.cancel(200), Err(AppError::InvalidState(_))));
        assert!(matches!(booking.decide(100, true), Err(AppError::InvalidState(_))));
        assert_eq!(booking.status, BookingStatus::Rejected);
    }

    #[test]
    fn test_transition_graph_is_closed() {
        use BookingStatus::*;
        let all = [Waiting, Approved, Rejected, Cancelled];

        for from in all {
            for approved in [true, false] {
                let mut b = booking(from);
                if b.decide(100, approved).is_ok() {
                    assert_eq!(from, Waiting);
                }
            }
            let mut b = booking(from);
            if b.cancel(200).is_ok() {
                assert!(matches!(from, Waiting | Approved));
                assert_eq!(b.status, Cancelled);
            }
        }
    }

    #[test]
    fn test_only_owner_decides_only_booker_cancels() {
        let mut booking = booking(BookingStatus::Waiting);
        assert!(matches!(booking.decide(200, true), Err(AppError::Authorization(_))));
        assert!(matches!(booking.cancel(100), Err(AppError::Authorization(_))));
        assert_eq!(booking.status, BookingStatus::Waiting);
    }

    #[test]
    fn test_reschedule_keeps_range_ordered() {
        let mut b = booking(BookingStatus::Waiting);
        let old_end = b.end;

        let too_late = b.end + Duration::hours(1);
        assert!(matches!(
            b.reschedule(200, Some(too_late), None),
            Err(AppError::Validation(_))
        ));
        assert!(b.start < b.end);

        let new_end = old_end + Duration::days(3);
        b.reschedule(200, None, Some(new_end)).unwrap();
        assert_eq!(b.end, new_end);
        assert!(b.start < b.end);

        let mut approved = booking(BookingStatus::Approved);
        assert!(matches!(
            approved.reschedule(200, None, Some(new_end)),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!("current".parse::<BookingState>().unwrap(), BookingState::Current);
        assert_eq!("Past".parse::<BookingState>().unwrap(), BookingState::Past);
        assert!(matches!(
            "SOMETIME".parse::<BookingState>(),
            Err(AppError::BadRequest(msg)) if msg == "Unknown state: SOMETIME"
        ));
        assert_eq!(BookingListQuery::default().state().unwrap(), BookingState::All);
    }

    #[test]
    fn test_state_classification() {
        let now = now();
        let mut b = booking(BookingStatus::Approved);

        b.start = now - Duration::hours(1);
        b.end = now + Duration::hours(1);
        assert!(BookingState::Current.matches(&b, now));
        assert!(!BookingState::Past.matches(&b, now));
        assert!(!BookingState::Future.matches(&b, now));

        b.start = now - Duration::days(2);
        b.end = now - Duration::days(1);
        assert!(BookingState::Past.matches(&b, now));

        b.start = now + Duration::days(1);
        b.end = now + Duration::days(2);
        assert!(BookingState::Future.matches(&b, now));
        assert!(BookingState::All.matches(&b, now));
        assert!(!BookingState::Waiting.matches(&b, now));
        assert!(!BookingState::Rejected.matches(&b, now));
    }

    #[test]
    fn test_list_query_filter_defaults() {
        let now = now();
        let filter = BookingListQuery::default().filter(now).unwrap();
        assert_eq!(
            filter,
            BookingFilter {
                state: BookingState::All,
                now,
                from: 0,
                size: None,
            }
        );

        let query = BookingListQuery {
            state: Some("waiting".to_string()),
            from: Some(20),
            size: Some(10),
        };
        let filter = query.filter(now).unwrap();
        assert_eq!(filter.state, BookingState::Waiting);
        assert_eq!((filter.from, filter.size), (20, Some(10)));
    }

    #[test]
    fn test_sql_predicate_binds_now_only_for_time_states() {
        use BookingState::*;
        for state in [All, Current, Past, Future, Waiting, Rejected] {
            assert_eq!(state.sql_predicate().contains("$2"), state.uses_now(), "{:?}", state);
        }
        assert_eq!(Waiting.sql_predicate(), "b.status = 'WAITING'");
        assert_eq!(Rejected.sql_predicate(), format!("b.status = '{}'", BookingStatus::Rejected));
    }

    #[test]
    fn test_create_booking_starting_shortly_is_accepted() {
        let now = now();
        let soon = CreateBooking {
            start: now + Duration::minutes(2),
            end: now + Duration::hours(1),
            item_id: 1,
        };
        assert!(soon.validate().is_ok());
    }

    #[test]
    fn test_create_booking_must_be_in_future() {
        let now = now();
        let past = CreateBooking {
            start: now - Duration::days(1),
            end: now + Duration::days(1),
            item_id: 1,
        };
        assert!(past.validate().is_err());

        let future = CreateBooking {
            start: now + Duration::days(1),
            end: now + Duration::days(2),
            item_id: 1,
        };
        assert!(future.validate().is_ok());
    }

    #[test]
    fn test_status_json_is_uppercase() {
        assert_eq!(
            serde_json::to_value(BookingStatus::Cancelled).unwrap(),
            serde_json::json!("CANCELLED")
        );
        let update: UpdateBooking =
            serde_json::from_value(serde_json::json!({"status": "CANCELLED"})).unwrap();
        assert_eq!(update.status, Some(BookingStatus::Cancelled));
    }
}
