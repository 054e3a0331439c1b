//! Weekly order eligibility.
//!
//! A student may place one order per ISO week (Monday to Sunday, week 1
//! being the week with the year's first Thursday). Weeks are compared as
//! calendar boundaries, not as a rolling seven days: an order placed late
//! on Sunday does not block an order early on Monday.
//!
//! An administrator can reset a student's limit; the override allows
//! exactly one more order and is cleared when that order is recorded.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::LocalZone;

/// Per-user eligibility state, stored on the user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEligibilityRecord {
    /// When the user's last successful order was placed.
    #[serde(
        rename = "lastOrderDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_order_timestamp: Option<DateTime<Utc>>,
    /// Set by an administrator to allow one order regardless of the week.
    #[serde(rename = "orderLimitReset", default)]
    pub admin_override: bool,
}

impl OrderEligibilityRecord {
    /// Record a successful checkout at `now`.
    ///
    /// Consumes any admin override. Not idempotent: every call restarts the
    /// weekly window, so call it exactly once per placed order.
    pub fn record_order_placed(&mut self, now: DateTime<Utc>) {
        self.last_order_timestamp = Some(now);
        self.admin_override = false;
    }

    /// Administrative reset: allow the next order whatever the week.
    pub fn reset_weekly_limit(&mut self) {
        self.admin_override = true;
        self.last_order_timestamp = None;
    }
}

/// Why an order is or is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityReason {
    /// An administrator reset the weekly limit.
    AdminOverride,
    /// The user has never ordered.
    NoPreviousOrder,
    /// The last order was in an earlier week.
    NewWeek,
    /// The user already ordered this week.
    WeeklyLimitReached,
    /// The user is not in the directory.
    UnknownUser,
}

/// Result of an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Whether a new order may be placed now.
    pub allowed: bool,
    /// When blocked by the weekly limit, the first local date on which
    /// ordering reopens.
    pub next_eligible_date: Option<NaiveDate>,
    /// Which rule decided.
    pub reason: EligibilityReason,
}

impl Eligibility {
    const fn allow(reason: EligibilityReason) -> Self {
        Self {
            allowed: true,
            next_eligible_date: None,
            reason,
        }
    }

    /// The answer for a user the directory does not know.
    #[must_use]
    pub const fn unknown_user() -> Self {
        Self {
            allowed: false,
            next_eligible_date: None,
            reason: EligibilityReason::UnknownUser,
        }
    }

    /// Short status label for the admin user list.
    #[must_use]
    pub const fn badge(&self) -> &'static str {
        match self.reason {
            EligibilityReason::AdminOverride => "Limit Reset by Admin",
            EligibilityReason::NoPreviousOrder | EligibilityReason::NewWeek => "Can Place Order",
            EligibilityReason::WeeklyLimitReached => "Weekly Limit Reached",
            EligibilityReason::UnknownUser => "User Not Found",
        }
    }
}

/// Applies the weekly rule in the pantry's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEvaluator {
    zone: LocalZone,
}

impl EligibilityEvaluator {
    #[must_use]
    pub const fn new(zone: LocalZone) -> Self {
        Self { zone }
    }

    /// Decide whether `record`'s owner may order at `now`.
    ///
    /// The override wins, then a missing last order. Otherwise the ISO week
    /// number and calendar year of the last order and of `now` are
    /// compared; if both match the order is blocked until the Monday after
    /// the last order.
    #[must_use]
    pub fn can_place_order(&self, record: &OrderEligibilityRecord, now: DateTime<Utc>) -> Eligibility {
        if record.admin_override {
            return Eligibility::allow(EligibilityReason::AdminOverride);
        }
        let Some(last_order) = record.last_order_timestamp else {
            return Eligibility::allow(EligibilityReason::NoPreviousOrder);
        };

        let last = self.zone.local_date(last_order);
        let today = self.zone.local_date(now);
        if week_key(last) != week_key(today) {
            return Eligibility::allow(EligibilityReason::NewWeek);
        }

        Eligibility {
            allowed: false,
            next_eligible_date: next_monday_after(last),
            reason: EligibilityReason::WeeklyLimitReached,
        }
    }
}

/// ISO week number paired with the calendar year.
fn week_key(date: NaiveDate) -> (u32, i32) {
    (date.iso_week().week(), date.year())
}

/// The Monday strictly after `date` (a Monday maps to the following one).
fn next_monday_after(date: NaiveDate) -> Option<NaiveDate> {
    let days_ahead = 8 - date.weekday().number_from_monday();
    date.checked_add_days(Days::new(u64::from(days_ahead)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ordered_at(s: &str) -> OrderEligibilityRecord {
        OrderEligibilityRecord {
            last_order_timestamp: Some(at(s)),
            admin_override: false,
        }
    }

    #[test]
    fn test_no_previous_order_is_allowed() {
        let evaluator = EligibilityEvaluator::default();
        let result = evaluator.can_place_order(&OrderEligibilityRecord::default(), at("2025-04-18T12:00:00Z"));
        assert!(result.allowed);
        assert_eq!(result.reason, EligibilityReason::NoPreviousOrder);
        assert_eq!(result.badge(), "Can Place Order");
    }

    #[test]
    fn test_same_week_is_blocked_until_next_monday() {
        let evaluator = EligibilityEvaluator::default();
        let record = ordered_at("2025-04-14T10:00:00Z");
        let result = evaluator.can_place_order(&record, at("2025-04-18T10:00:00Z"));
        assert!(!result.allowed);
        assert_eq!(result.next_eligible_date, Some(date(2025, 4, 21)));
        assert_eq!(result.badge(), "Weekly Limit Reached");
    }

    #[test]
    fn test_next_monday_allows() {
        let evaluator = EligibilityEvaluator::default();
        let record = ordered_at("2025-04-14T10:00:00Z");
        let result = evaluator.can_place_order(&record, at("2025-04-21T00:00:00Z"));
        assert!(result.allowed);
        assert_eq!(result.reason, EligibilityReason::NewWeek);
    }

    #[test]
    fn test_sunday_night_then_monday_morning_is_allowed() {
        let evaluator = EligibilityEvaluator::default();
        let record = ordered_at("2025-04-20T23:59:00Z");
        assert!(evaluator.can_place_order(&record, at("2025-04-21T00:01:00Z")).allowed);
    }

    #[test]
    fn test_sunday_order_reopens_next_day() {
        let evaluator = EligibilityEvaluator::default();
        let record = ordered_at("2025-04-20T09:00:00Z");
        let result = evaluator.can_place_order(&record, at("2025-04-20T18:00:00Z"));
        assert!(!result.allowed);
        assert_eq!(result.next_eligible_date, Some(date(2025, 4, 21)));
    }

    #[test]
    fn test_week_boundary_uses_local_time() {
        // 22:00 Sunday in UTC-5 is 03:00 Monday UTC.
        let evaluator = EligibilityEvaluator::new(LocalZone::from_offset_minutes(-300).unwrap());
        let record = ordered_at("2025-04-14T15:00:00Z");
        let result = evaluator.can_place_order(&record, at("2025-04-21T03:00:00Z"));
        assert!(!result.allowed);
        assert!(evaluator.can_place_order(&record, at("2025-04-21T05:00:00Z")).allowed);
    }

    #[test]
    fn test_same_week_number_in_another_year_is_allowed() {
        let evaluator = EligibilityEvaluator::default();
        let record = ordered_at("2024-04-15T10:00:00Z");
        // Both dates fall in ISO week 16.
        assert!(evaluator.can_place_order(&record, at("2025-04-15T10:00:00Z")).allowed);
    }

    #[test]
    fn test_year_end_week_compares_calendar_year() {
        // Mon 2024-12-30 and Thu 2025-01-02 share ISO week 1 but not the calendar year.
        let evaluator = EligibilityEvaluator::default();
        let record = ordered_at("2024-12-30T10:00:00Z");
        assert!(evaluator.can_place_order(&record, at("2025-01-02T10:00:00Z")).allowed);
    }

    #[test]
    fn test_admin_override_wins() {
        let evaluator = EligibilityEvaluator::default();
        let record = OrderEligibilityRecord {
            last_order_timestamp: Some(at("2025-04-14T10:00:00Z")),
            admin_override: true,
        };
        let result = evaluator.can_place_order(&record, at("2025-04-15T10:00:00Z"));
        assert!(result.allowed);
        assert_eq!(result.badge(), "Limit Reset by Admin");
    }

    #[test]
    fn test_reset_then_order_consumes_override() {
        let evaluator = EligibilityEvaluator::default();
        let mut record = ordered_at("2025-04-14T10:00:00Z");

        record.reset_weekly_limit();
        assert!(record.last_order_timestamp.is_none());
        assert!(evaluator.can_place_order(&record, at("2025-04-15T10:00:00Z")).allowed);

        record.record_order_placed(at("2025-04-15T10:00:00Z"));
        assert!(!record.admin_override);
        assert!(!evaluator.can_place_order(&record, at("2025-04-16T10:00:00Z")).allowed);
    }

    #[test]
    fn test_next_monday_after_each_weekday() {
        // 2025-04-14 is a Monday.
        for offset in 0..7_u64 {
            let day = date(2025, 4, 14).checked_add_days(Days::new(offset)).unwrap();
            assert_eq!(next_monday_after(day), Some(date(2025, 4, 21)));
        }
    }

    #[test]
    fn test_record_serializes_with_storage_keys() {
        let record = ordered_at("2025-04-14T10:00:00Z");
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["lastOrderDate"], "2025-04-14T10:00:00Z");
        assert_eq!(json["orderLimitReset"], false);

        let reset: OrderEligibilityRecord =
            serde_json::from_str(r#"{"orderLimitReset":true}"#).unwrap();
        assert!(reset.admin_override);
        assert!(reset.last_order_timestamp.is_none());

        let from_browser: OrderEligibilityRecord =
            serde_json::from_str(r#"{"lastOrderDate":"2025-04-14T10:00:00.000Z"}"#).unwrap();
        assert_eq!(from_browser.last_order_timestamp, Some(at("2025-04-14T10:00:00Z")));
    }
}
