//! Pickup slots.
//!
//! The pantry hands out orders from 12:00 PM to 4:30 PM in 30 minute
//! slots. Slots already started (or starting this minute) are not offered,
//! and after the 4:30 PM cutoff the default pickup day becomes tomorrow.

use chrono::{DateTime, Days, NaiveDate, Timelike, Utc};

use comet_cupboard_core::PickupTime;

use crate::clock::LocalZone;

/// First slot of the day, as (hour, minute).
pub const FIRST_SLOT: (u32, u32) = (12, 0);
/// Last slot of the day, which is also the ordering cutoff.
pub const LAST_SLOT: (u32, u32) = (16, 30);
/// Minutes between consecutive slots.
pub const SLOT_MINUTES: u32 = 30;

/// Slot rules in the pantry's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickupSchedule {
    zone: LocalZone,
}

impl PickupSchedule {
    #[must_use]
    pub const fn new(zone: LocalZone) -> Self {
        Self { zone }
    }

    /// Every slot of a pickup day, earliest first.
    #[must_use]
    pub fn slots() -> Vec<PickupTime> {
        let first = FIRST_SLOT.0 * 60 + FIRST_SLOT.1;
        let last = LAST_SLOT.0 * 60 + LAST_SLOT.1;
        (first..=last)
            .step_by(SLOT_MINUTES as usize)
            .filter_map(|minutes| PickupTime::from_hm(minutes / 60, minutes % 60))
            .collect()
    }

    /// Today's slots that have not started yet at `now`.
    #[must_use]
    pub fn available_slots(&self, now: DateTime<Utc>) -> Vec<PickupTime> {
        let local = self.zone.to_local(now);
        let current = (local.hour(), local.minute());
        Self::slots()
            .into_iter()
            .filter(|slot| (slot.hour(), slot.minute()) > current)
            .collect()
    }

    /// Slots open for booking on `date`, as seen at `now`.
    ///
    /// Past days have none, today is filtered by the current time, and
    /// later days offer every slot.
    #[must_use]
    pub fn available_slots_on(&self, date: NaiveDate, now: DateTime<Utc>) -> Vec<PickupTime> {
        let today = self.zone.local_date(now);
        match date.cmp(&today) {
            std::cmp::Ordering::Less => Vec::new(),
            std::cmp::Ordering::Equal => self.available_slots(now),
            std::cmp::Ordering::Greater => Self::slots(),
        }
    }

    /// Whether `time` on `date` can still be booked at `now`.
    #[must_use]
    pub fn is_available(&self, date: NaiveDate, time: PickupTime, now: DateTime<Utc>) -> bool {
        self.available_slots_on(date, now).contains(&time)
    }

    /// Whether the local time is at or past the 4:30 PM cutoff.
    #[must_use]
    pub fn is_after_cutoff(&self, now: DateTime<Utc>) -> bool {
        let local = self.zone.to_local(now);
        (local.hour(), local.minute()) >= LAST_SLOT
    }

    /// Today, or tomorrow once the cutoff has passed.
    #[must_use]
    pub fn default_pickup_date(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = self.zone.local_date(now);
        if self.is_after_cutoff(now) {
            today.checked_add_days(Days::new(1)).unwrap_or(today)
        } else {
            today
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn labels(slots: &[PickupTime]) -> Vec<String> {
        slots.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_full_day_has_ten_slots() {
        let slots = PickupSchedule::slots();
        assert_eq!(slots.len(), 10);
        assert_eq!(slots.first().unwrap().to_string(), "12:00 PM");
        assert_eq!(slots.last().unwrap().to_string(), "4:30 PM");
    }

    #[test]
    fn test_morning_offers_everything() {
        let schedule = PickupSchedule::default();
        assert_eq!(schedule.available_slots(at("2025-04-14T09:00:00Z")).len(), 10);
    }

    #[test]
    fn test_started_slots_are_dropped() {
        let schedule = PickupSchedule::default();
        let slots = schedule.available_slots(at("2025-04-14T15:00:00Z"));
        assert_eq!(labels(&slots), vec!["3:30 PM", "4:00 PM", "4:30 PM"]);

        let slots = schedule.available_slots(at("2025-04-14T15:10:00Z"));
        assert_eq!(labels(&slots), vec!["3:30 PM", "4:00 PM", "4:30 PM"]);
    }

    #[test]
    fn test_nothing_left_after_last_slot() {
        let schedule = PickupSchedule::default();
        assert!(schedule.available_slots(at("2025-04-14T16:30:00Z")).is_empty());
    }

    #[test]
    fn test_slots_by_date() {
        let schedule = PickupSchedule::default();
        let now = at("2025-04-14T16:00:00Z");
        let yesterday = NaiveDate::from_ymd_opt(2025, 4, 13).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 4, 14).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

        assert!(schedule.available_slots_on(yesterday, now).is_empty());
        assert_eq!(labels(&schedule.available_slots_on(today, now)), vec!["4:30 PM"]);
        assert_eq!(schedule.available_slots_on(tomorrow, now).len(), 10);

        let noon = PickupTime::parse("12:00 PM").unwrap();
        assert!(!schedule.is_available(today, noon, now));
        assert!(schedule.is_available(tomorrow, noon, now));
    }

    #[test]
    fn test_cutoff_moves_default_date() {
        let schedule = PickupSchedule::default();
        assert!(!schedule.is_after_cutoff(at("2025-04-14T16:29:00Z")));
        assert!(schedule.is_after_cutoff(at("2025-04-14T16:30:00Z")));
        assert_eq!(
            schedule.default_pickup_date(at("2025-04-14T16:29:00Z")),
            NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
        );
        assert_eq!(
            schedule.default_pickup_date(at("2025-04-14T17:00:00Z")),
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_local_zone_shifts_slots() {
        // 20:00 UTC is 3:00 PM at UTC-5.
        let schedule = PickupSchedule::new(LocalZone::from_offset_minutes(-300).unwrap());
        let slots = schedule.available_slots(at("2025-04-14T20:00:00Z"));
        assert_eq!(labels(&slots), vec!["3:30 PM", "4:00 PM", "4:30 PM"]);
    }
}
