//! Pickup window rules.
//!
//! An order stays valid for [`GRACE_PERIOD`] after its scheduled pickup
//! time. Past that, a sweep cancels it. Sweeps are pure: they return the
//! updated pickups and leave persisting and notifying to the caller.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use comet_cupboard_core::{OrderNumber, PickupStatus, PickupTime, RequestId};

use crate::cart::CartLine;
use crate::clock::LocalZone;

/// How long after the scheduled time an in-progress pickup stays valid.
pub const GRACE_PERIOD: TimeDelta = TimeDelta::minutes(30);

/// Errors from explicit pickup transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PickupError {
    /// The pickup already reached a terminal state.
    #[error("pickup {id} is already {status}")]
    AlreadyFinal {
        /// The pickup.
        id: RequestId,
        /// Its terminal status.
        status: PickupStatus,
    },

    /// No pickup has this id.
    #[error("pickup {0} not found")]
    NotFound(RequestId),
}

/// A scheduled pickup of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPickup {
    pub id: RequestId,
    pub order_number: OrderNumber,
    /// Local date of the pickup.
    #[serde(rename = "date")]
    pub scheduled_date: NaiveDate,
    /// Local wall-clock time of the pickup.
    #[serde(rename = "time")]
    pub scheduled_time: PickupTime,
    pub status: PickupStatus,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl ScheduledPickup {
    /// A new in-progress pickup.
    #[must_use]
    pub fn new(
        id: RequestId,
        order_number: OrderNumber,
        scheduled_date: NaiveDate,
        scheduled_time: PickupTime,
        items: Vec<CartLine>,
    ) -> Self {
        Self {
            id,
            order_number,
            scheduled_date,
            scheduled_time,
            status: PickupStatus::InProgress,
            items,
        }
    }

    /// Local date and time of the pickup.
    #[must_use]
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.scheduled_date.and_time(self.scheduled_time.as_naive())
    }

    /// Staff confirmed the pickup.
    ///
    /// # Errors
    ///
    /// Returns `PickupError::AlreadyFinal` if the pickup is not in progress.
    pub fn confirm(&mut self) -> Result<(), PickupError> {
        self.transition(PickupStatus::Successful)
    }

    /// Cancel the pickup by hand.
    ///
    /// # Errors
    ///
    /// Returns `PickupError::AlreadyFinal` if the pickup is not in progress.
    pub fn cancel(&mut self) -> Result<(), PickupError> {
        self.transition(PickupStatus::Cancelled)
    }

    fn transition(&mut self, to: PickupStatus) -> Result<(), PickupError> {
        if self.status.is_terminal() {
            return Err(PickupError::AlreadyFinal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Time left before an in-progress pickup is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingTime {
    /// Under one whole minute, including exactly at expiry.
    LessThanAMinute,
    /// Whole minutes, rounded down.
    Minutes(i64),
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LessThanAMinute => f.write_str("Less than a minute"),
            Self::Minutes(1) => f.write_str("1 minute"),
            Self::Minutes(n) => write!(f, "{n} minutes"),
        }
    }
}

/// Time until a pickup's scheduled start, for the student's countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupCountdown {
    /// The scheduled time is now or in the past.
    Passed,
    /// Time still to go, split into whole units.
    Upcoming {
        days: i64,
        hours: i64,
        minutes: i64,
    },
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

impl fmt::Display for PickupCountdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Passed => f.write_str("Pickup time has passed"),
            Self::Upcoming { days, hours, .. } if days > 0 => {
                write!(f, "{} and {}", plural(days, "day"), plural(hours, "hour"))
            }
            Self::Upcoming { hours, minutes, .. } if hours > 0 => {
                write!(f, "{} and {}", plural(hours, "hour"), plural(minutes, "minute"))
            }
            Self::Upcoming { minutes, .. } => f.write_str(&plural(minutes, "minute")),
        }
    }
}

/// Result of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Every input pickup, with expired ones now cancelled.
    pub updated: Vec<ScheduledPickup>,
    /// Whether any pickup changed.
    pub any_changed: bool,
    /// Ids of the pickups this sweep cancelled.
    pub cancelled: Vec<RequestId>,
}

/// Evaluates pickups against the grace period in the pantry's local time.
#[derive(Debug, Clone, Copy)]
pub struct PickupWindow {
    zone: LocalZone,
    grace: TimeDelta,
}

impl Default for PickupWindow {
    fn default() -> Self {
        Self::new(LocalZone::utc())
    }
}

impl PickupWindow {
    /// Window using the standard grace period.
    #[must_use]
    pub const fn new(zone: LocalZone) -> Self {
        Self {
            zone,
            grace: GRACE_PERIOD,
        }
    }

    /// Instant after which the pickup should be cancelled.
    ///
    /// `None` when that instant is beyond the representable range, in which
    /// case the pickup never expires.
    #[must_use]
    pub fn compute_expiry(&self, pickup: &ScheduledPickup) -> Option<DateTime<Utc>> {
        self.zone
            .to_utc(pickup.scheduled_at())?
            .checked_add_signed(self.grace)
    }

    /// True iff the pickup is in progress and `now` is past its expiry.
    #[must_use]
    pub fn should_auto_cancel(&self, pickup: &ScheduledPickup, now: DateTime<Utc>) -> bool {
        pickup.status == PickupStatus::InProgress
            && self.compute_expiry(pickup).is_some_and(|expiry| now > expiry)
    }

    /// Time left before cancellation, or `None` if the pickup is finished,
    /// already expired or never expires.
    #[must_use]
    pub fn remaining_time(&self, pickup: &ScheduledPickup, now: DateTime<Utc>) -> Option<RemainingTime> {
        if pickup.status != PickupStatus::InProgress {
            return None;
        }
        let expiry = self.compute_expiry(pickup)?;
        if now > expiry {
            return None;
        }
        match (expiry - now).num_minutes() {
            0 => Some(RemainingTime::LessThanAMinute),
            minutes => Some(RemainingTime::Minutes(minutes)),
        }
    }

    /// Time until the scheduled start (not the expiry).
    #[must_use]
    pub fn time_until_pickup(&self, pickup: &ScheduledPickup, now: DateTime<Utc>) -> PickupCountdown {
        // Same offset on both sides, so the local difference is exact.
        let diff = pickup
            .scheduled_at()
            .signed_duration_since(self.zone.to_local(now));
        if diff <= TimeDelta::zero() {
            return PickupCountdown::Passed;
        }
        PickupCountdown::Upcoming {
            days: diff.num_days(),
            hours: diff.num_hours() % 24,
            minutes: diff.num_minutes() % 60,
        }
    }

    /// Cancel every in-progress pickup whose grace period has lapsed.
    ///
    /// Pure and idempotent: running it again on its own output changes
    /// nothing.
    #[must_use]
    pub fn sweep(&self, pickups: &[ScheduledPickup], now: DateTime<Utc>) -> SweepOutcome {
        let mut cancelled = Vec::new();
        let updated = pickups
            .iter()
            .map(|pickup| {
                let mut pickup = pickup.clone();
                if self.should_auto_cancel(&pickup, now) {
                    pickup.status = PickupStatus::Cancelled;
                    cancelled.push(pickup.id.clone());
                }
                pickup
            })
            .collect();

        SweepOutcome {
            updated,
            any_changed: !cancelled.is_empty(),
            cancelled,
        }
    }
}
