//! Data models for ShareIt

pub mod booking;
pub mod comment;
pub mod item;
pub mod item_request;
pub mod user;

use std::borrow::Cow;

use chrono::{Local, NaiveDateTime};
use validator::ValidationError;

// Re-export commonly used types
pub use booking::{Booking, BookingState, BookingStatus};
pub use comment::Comment;
pub use item::{Item, ItemDetails};
pub use item_request::{ItemRequest, ItemRequestDetails};
pub use user::User;

/// Current server-local wall-clock time.
///
/// Booking and comment timestamps are local date-times without offset, so
/// every "now" comparison uses the server's local clock.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Rejects empty and whitespace-only strings
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some(Cow::from("must not be blank"));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_now_follows_local_clock() {
        let drift = (local_now() - Local::now().naive_local()).num_seconds().abs();
        assert!(drift < 5);
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("drill").is_ok());
        assert!(not_blank(" \t").is_err());
    }
}
