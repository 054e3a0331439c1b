//! Time sources and the pantry's local wall clock.
//!
//! Every week and expiry computation depends on "now", so services take a
//! [`Clock`] instead of reading the system time directly.

use std::cell::Cell;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};

/// Source of the current instant.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by callers replaying a fixed scenario.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Jump to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Move forward (or backward, for a negative delta).
    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// The pantry's local time zone, as a fixed offset from UTC.
///
/// Pickup dates, slot times and ISO weeks are all local notions; instants
/// are stored in UTC and converted through this zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone {
    offset: FixedOffset,
}

impl LocalZone {
    /// UTC itself.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Zone `minutes` east of UTC (negative for west).
    ///
    /// Returns `None` if the offset is a day or more.
    #[must_use]
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    /// The underlying offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local wall-clock reading of an instant.
    #[must_use]
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// Local calendar date of an instant.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date()
    }

    /// Instant at which the local wall clock reads `local`, or `None` if
    /// that instant is outside the representable range.
    #[must_use]
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        local
            .checked_sub_signed(shift)
            .map(|utc| Utc.from_utc_datetime(&utc))
    }
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_fixed_clock_moves_only_when_told() {
        let clock = FixedClock::new(instant("2025-04-14T10:00:00Z"));
        assert_eq!(clock.now(), instant("2025-04-14T10:00:00Z"));
        clock.advance(TimeDelta::minutes(90));
        assert_eq!(clock.now(), instant("2025-04-14T11:30:00Z"));
        clock.set(instant("2025-04-21T00:00:00Z"));
        assert_eq!(clock.now(), instant("2025-04-21T00:00:00Z"));
    }

    #[test]
    fn test_zone_round_trip() {
        // Central Daylight Time
        let zone = LocalZone::from_offset_minutes(-300).unwrap();
        let utc = instant("2025-04-21T03:30:00Z");
        let local = zone.to_local(utc);
        assert_eq!(local.to_string(), "2025-04-20 22:30:00");
        assert_eq!(zone.to_utc(local), Some(utc));
    }

    #[test]
    fn test_to_utc_at_range_edges() {
        let west = LocalZone::from_offset_minutes(-300).unwrap();
        let east = LocalZone::from_offset_minutes(300).unwrap();
        assert!(west.to_utc(NaiveDateTime::MAX).is_none());
        assert!(east.to_utc(NaiveDateTime::MIN).is_none());
        assert_eq!(
            east.to_utc(NaiveDateTime::MAX),
            Some(Utc.from_utc_datetime(&(NaiveDateTime::MAX - TimeDelta::minutes(300))))
        );
    }

    #[test]
    fn test_local_date_can_differ_from_utc_date() {
        let zone = LocalZone::from_offset_minutes(-300).unwrap();
        let date = zone.local_date(instant("2025-04-21T01:00:00Z"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 4, 20).unwrap());
    }

    #[test]
    fn test_offset_bounds() {
        assert!(LocalZone::from_offset_minutes(24 * 60).is_none());
        assert!(LocalZone::from_offset_minutes(-(24 * 60)).is_none());
        assert!(LocalZone::from_offset_minutes(23 * 60).is_some());
    }
}
