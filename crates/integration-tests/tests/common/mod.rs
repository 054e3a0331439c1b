//! Shared fixtures: an in-memory pantry with a settable clock.

#![allow(dead_code, clippy::unwrap_used)]

use chrono::{DateTime, NaiveDate, Utc};

use comet_cupboard_core::PickupTime;
use comet_cupboard_pantry::cart::CartLine;
use comet_cupboard_pantry::clock::{FixedClock, LocalZone};
use comet_cupboard_pantry::notify::RecordingNotifier;
use comet_cupboard_pantry::services::{CartService, CheckoutService, PickupMonitor, UserDirectory};
use comet_cupboard_pantry::store::MemoryStore;

/// Seeded ids from the demo directory.
pub const ADMIN: &str = "1";
pub const STUDENT_ORDERED_TWO_DAYS_AGO: &str = "2";
pub const STUDENT_ORDERED_NOW: &str = "3";
pub const STUDENT_NEVER_ORDERED: &str = "4";

pub fn instant(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn time(s: &str) -> PickupTime {
    PickupTime::parse(s).unwrap()
}

pub fn line(id: &str, limit: u32) -> CartLine {
    CartLine::new(id, format!("Item {id}"), "Pantry", limit)
}

pub struct TestPantry {
    pub store: MemoryStore,
    pub clock: FixedClock,
    pub notifier: RecordingNotifier,
    pub zone: LocalZone,
}

impl TestPantry {
    pub fn at(now: &str) -> Self {
        Self {
            store: MemoryStore::new(),
            clock: FixedClock::new(instant(now)),
            notifier: RecordingNotifier::new(),
            zone: LocalZone::utc(),
        }
    }

    pub fn cart(&self) -> CartService<'_> {
        CartService::load(&self.store, &self.notifier).unwrap()
    }

    pub fn directory(&self) -> UserDirectory<'_> {
        UserDirectory::new(&self.store, &self.clock, self.zone)
    }

    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(&self.store, &self.clock, &self.notifier, self.zone)
    }

    pub fn monitor(&self) -> PickupMonitor<'_> {
        PickupMonitor::new(&self.store, &self.clock, &self.notifier, self.zone)
    }
}
