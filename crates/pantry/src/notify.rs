//! User-facing notices.
//!
//! The engine tells a [`Notifier`] about rejected adds, blocked orders and
//! auto-cancelled pickups. Notifiers are informed, never consulted: nothing
//! they do changes the outcome of an operation.

use std::cell::RefCell;
use std::fmt;

use chrono::NaiveDate;

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An add was ignored because the cart is full.
    CartFull {
        /// The global cart limit.
        limit: u32,
    },
    /// An add was ignored because the line is at its per-item limit.
    ItemLimitReached {
        /// Display name of the item.
        item: String,
        /// The item's limit.
        limit: u32,
    },
    /// Checkout was blocked by the weekly order limit.
    WeeklyLimit {
        /// First local date on which an order will be accepted.
        next_eligible_date: Option<NaiveDate>,
    },
    /// A sweep cancelled pickups whose grace period had lapsed.
    PickupsAutoCancelled {
        /// How many pickups were cancelled.
        count: usize,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CartFull { limit } => write!(
                f,
                "You've reached the limit of {limit} items per order. \
                 Please remove some items from your cart to add more."
            ),
            Self::ItemLimitReached { item, limit } => {
                write!(f, "You can request at most {limit} of {item} per order.")
            }
            Self::WeeklyLimit {
                next_eligible_date: Some(date),
            } => write!(
                f,
                "You can only place one order per week. You can place your next order on {}.",
                date.format("%A, %B %-d")
            ),
            Self::WeeklyLimit {
                next_eligible_date: None,
            } => write!(
                f,
                "You can only place one order per week. Please try again next week."
            ),
            Self::PickupsAutoCancelled { count } => write!(
                f,
                "One or more orders were automatically cancelled due to missed pickup time \
                 ({count} cancelled). Orders must be picked up within 30 minutes of scheduled time."
            ),
        }
    }
}

/// Receives notices.
pub trait Notifier {
    /// Deliver a notice.
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::PickupsAutoCancelled { count } => {
                tracing::warn!(count, "{notice}");
            }
            Notice::WeeklyLimit { next_eligible_date } => {
                tracing::info!(next_eligible_date = ?next_eligible_date, "{notice}");
            }
            Notice::CartFull { .. } | Notice::ItemLimitReached { .. } => {
                tracing::info!("{notice}");
            }
        }
    }
}

/// Keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Drain and return the received notices.
    pub fn take(&self) -> Vec<Notice> {
        self.notices.take()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_limit_message_names_the_date() {
        let notice = Notice::WeeklyLimit {
            next_eligible_date: NaiveDate::from_ymd_opt(2025, 4, 21),
        };
        assert_eq!(
            notice.to_string(),
            "You can only place one order per week. You can place your next order on Monday, April 21."
        );
    }

    #[test]
    fn test_cart_full_message() {
        let msg = Notice::CartFull { limit: 5 }.to_string();
        assert!(msg.starts_with("You've reached the limit of 5 items per order."));
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let recorder = RecordingNotifier::new();
        recorder.notify(&Notice::CartFull { limit: 5 });
        recorder.notify(&Notice::PickupsAutoCancelled { count: 2 });
        assert_eq!(
            recorder.notices(),
            vec![
                Notice::CartFull { limit: 5 },
                Notice::PickupsAutoCancelled { count: 2 }
            ]
        );
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.notices().is_empty());
    }
}
