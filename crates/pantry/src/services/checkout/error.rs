//! Checkout error types.

use chrono::NaiveDate;
use thiserror::Error;

use comet_cupboard_core::{PickupTime, UserId};

use crate::db::RepositoryError;
use crate::services::directory::DirectoryError;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested pickup slot cannot be booked.
    #[error("pickup slot {time} on {date} is not available")]
    SlotUnavailable {
        /// Requested local date.
        date: NaiveDate,
        /// Requested slot.
        time: PickupTime,
    },

    /// The user already ordered this week.
    #[error("weekly order limit reached")]
    WeeklyLimit {
        /// First local date on which ordering reopens.
        next_eligible_date: Option<NaiveDate>,
    },

    /// The user is not in the directory.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Only students place orders.
    #[error("user {0} is not a student")]
    NotAStudent(UserId),

    /// Directory error.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
