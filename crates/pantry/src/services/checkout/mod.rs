//! Checkout service.
//!
//! Places an order in one call: validates the cart and the pickup slot,
//! enforces the weekly limit, then books the pickup, records the order and
//! empties the cart. The order counts as placed once the user's record is
//! saved; a pickup whose record could not be saved is withdrawn again.

mod error;

pub use error::CheckoutError;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{error, info, instrument, warn};

use comet_cupboard_core::{OrderNumber, PickupTime, RequestId, UserId};

use crate::cart::CartLine;
use crate::clock::{Clock, LocalZone};
use crate::db::pickups::PickupRepository;
use crate::notify::{Notice, Notifier};
use crate::pickup::ScheduledPickup;
use crate::schedule::PickupSchedule;
use crate::services::cart::CartService;
use crate::services::directory::UserDirectory;
use crate::store::KeyValueStore;

/// What the student sees after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub request_id: RequestId,
    pub order_number: OrderNumber,
    pub date: NaiveDate,
    pub time: PickupTime,
    pub items: Vec<CartLine>,
}

/// Order placement.
pub struct CheckoutService<'a> {
    directory: UserDirectory<'a>,
    pickups: PickupRepository<'a>,
    schedule: PickupSchedule,
    clock: &'a dyn Clock,
    notifier: &'a dyn Notifier,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(
        store: &'a dyn KeyValueStore,
        clock: &'a dyn Clock,
        notifier: &'a dyn Notifier,
        zone: LocalZone,
    ) -> Self {
        Self {
            directory: UserDirectory::new(store, clock, zone),
            pickups: PickupRepository::new(store),
            schedule: PickupSchedule::new(zone),
            clock,
            notifier,
        }
    }

    /// Place an order for the contents of `cart`.
    ///
    /// On success the user's weekly window restarts, an in-progress pickup
    /// is stored, and the cart is empty. A rejected order leaves the cart,
    /// the pickups and the user's record untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::SlotUnavailable` if the slot cannot be booked now.
    /// Returns `CheckoutError::UserNotFound` if the user is not in the directory.
    /// Returns `CheckoutError::NotAStudent` if the user is not a student.
    /// Returns `CheckoutError::WeeklyLimit` if the user already ordered this week.
    #[instrument(skip_all, fields(user_id = %user_id, date = %date, time = %time))]
    pub fn place_order(
        &self,
        cart: &mut CartService<'_>,
        user_id: &UserId,
        date: NaiveDate,
        time: PickupTime,
    ) -> Result<Confirmation, CheckoutError> {
        if cart.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let now = self.clock.now();
        if !self.schedule.is_available(date, time, now) {
            return Err(CheckoutError::SlotUnavailable { date, time });
        }

        let user = self
            .directory
            .find_by_id(user_id)?
            .ok_or_else(|| CheckoutError::UserNotFound(user_id.clone()))?;
        if !user.is_student() {
            return Err(CheckoutError::NotAStudent(user_id.clone()));
        }
        let eligibility = self.directory.eligibility_of(&user);
        if !eligibility.allowed {
            self.notifier.notify(&Notice::WeeklyLimit {
                next_eligible_date: eligibility.next_eligible_date,
            });
            return Err(CheckoutError::WeeklyLimit {
                next_eligible_date: eligibility.next_eligible_date,
            });
        }

        let existing = self.pickups.all()?;
        let mut stamp = now.timestamp_millis();
        while existing
            .iter()
            .any(|pickup| pickup.id.as_str() == format!("REQ-{stamp}"))
        {
            stamp += 1;
        }
        let request_id = RequestId::new(format!("REQ-{stamp}"));
        let order_number = loop {
            let candidate = OrderNumber::from_seed(rand::rng().random());
            if !existing.iter().any(|pickup| pickup.order_number == candidate) {
                break candidate;
            }
        };

        let items = cart.cart().lines().to_vec();
        self.pickups.append(ScheduledPickup::new(
            request_id.clone(),
            order_number,
            date,
            time,
            items.clone(),
        ))?;
        if let Err(e) = self.directory.record_order_placed(user_id) {
            if let Err(rollback) = self.pickups.save_all(&existing) {
                error!(request_id = %request_id, error = %rollback, "Failed to withdraw pickup");
            }
            return Err(e.into());
        }
        if let Err(e) = cart.clear() {
            warn!(error = %e, "Order placed but the emptied cart was not saved");
        }

        info!(
            request_id = %request_id,
            order_number = %order_number,
            items = items.len(),
            "Order placed"
        );
        Ok(Confirmation {
            request_id,
            order_number,
            date,
            time,
            items,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use chrono::{DateTime, Utc};

    use comet_cupboard_core::PickupStatus;

    use super::*;
    use crate::clock::FixedClock;
    use crate::db::keys;
    use crate::notify::RecordingNotifier;
    use crate::store::{MemoryStore, StoreError};

    /// Memory store that rejects writes to one key while armed.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing_key: Cell<Option<&'static str>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.failing_key.get() == Some(key) {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn monday_morning() -> DateTime<Utc> {
        "2025-04-14T10:00:00Z".parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
    }

    fn three_pm() -> PickupTime {
        PickupTime::parse("3:00 PM").unwrap()
    }

    fn fill(cart: &mut CartService<'_>) {
        cart.add_item(CartLine::new("beans", "Black Beans", "Canned Goods", 2))
            .unwrap();
        cart.add_item(CartLine::new("rice", "Rice", "Grains", 1)).unwrap();
    }

    #[test]
    fn test_happy_path() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);

        let emily = UserId::new("4");
        let confirmation = checkout
            .place_order(&mut cart, &emily, today(), three_pm())
            .unwrap();

        assert_eq!(confirmation.items.len(), 2);
        assert!(confirmation.order_number.to_string().starts_with("CC-"));
        assert!(cart.cart().is_empty());
        assert!(notifier.notices().is_empty());

        let pickups = PickupRepository::new(&store).all().unwrap();
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].status, PickupStatus::InProgress);
        assert_eq!(pickups[0].order_number, confirmation.order_number);
        assert_eq!(pickups[0].id, confirmation.request_id);

        let directory = UserDirectory::new(&store, &clock, LocalZone::utc());
        let user = directory.find_by_id(&emily).unwrap().unwrap();
        assert_eq!(user.eligibility.last_order_timestamp, Some(monday_morning()));
    }

    #[test]
    fn test_empty_cart() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();

        let result = checkout.place_order(&mut cart, &UserId::new("4"), today(), three_pm());
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_past_slot_rejected_but_tomorrow_accepted() {
        let store = MemoryStore::new();
        let clock = FixedClock::new("2025-04-14T15:10:00Z".parse().unwrap());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);
        let emily = UserId::new("4");

        let result = checkout.place_order(&mut cart, &emily, today(), three_pm());
        assert!(matches!(result, Err(CheckoutError::SlotUnavailable { .. })));
        assert!(!cart.cart().is_empty());

        let tomorrow = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        assert!(checkout.place_order(&mut cart, &emily, tomorrow, three_pm()).is_ok());
    }

    #[test]
    fn test_weekly_limit_blocks_and_notifies() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);

        // John's seeded order is "now".
        let result = checkout.place_order(&mut cart, &UserId::new("3"), today(), three_pm());
        let expected = NaiveDate::from_ymd_opt(2025, 4, 21);
        assert!(matches!(
            result,
            Err(CheckoutError::WeeklyLimit { next_eligible_date }) if next_eligible_date == expected
        ));
        assert_eq!(
            notifier.notices(),
            vec![Notice::WeeklyLimit {
                next_eligible_date: expected
            }]
        );
        assert!(PickupRepository::new(&store).all().unwrap().is_empty());
        assert_eq!(cart.cart().total_count(), 2);
    }

    #[test]
    fn test_unknown_user() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);

        let result = checkout.place_order(&mut cart, &UserId::new("404"), today(), three_pm());
        assert!(matches!(result, Err(CheckoutError::UserNotFound(_))));
    }

    #[test]
    fn test_second_order_same_week_blocked() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        let emily = UserId::new("4");

        fill(&mut cart);
        checkout.place_order(&mut cart, &emily, today(), three_pm()).unwrap();

        fill(&mut cart);
        let result = checkout.place_order(&mut cart, &emily, today(), three_pm());
        assert!(matches!(result, Err(CheckoutError::WeeklyLimit { .. })));
    }

    #[test]
    fn test_non_student_rejected() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);

        let result = checkout.place_order(&mut cart, &UserId::new("1"), today(), three_pm());
        assert!(matches!(result, Err(CheckoutError::NotAStudent(_))));
        assert!(PickupRepository::new(&store).all().unwrap().is_empty());
        assert_eq!(cart.cart().total_count(), 2);
    }

    #[test]
    fn test_failed_user_write_withdraws_pickup() {
        let store = FlakyStore::default();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);
        let emily = UserId::new("4");

        // Seed the directory, then start failing writes to it.
        UserDirectory::new(&store, &clock, LocalZone::utc()).list().unwrap();
        store.failing_key.set(Some(keys::USERS));

        let result = checkout.place_order(&mut cart, &emily, today(), three_pm());
        assert!(matches!(result, Err(CheckoutError::Directory(_))));
        assert!(PickupRepository::new(&store).all().unwrap().is_empty());
        assert_eq!(cart.cart().total_count(), 2);

        store.failing_key.set(None);
        checkout.place_order(&mut cart, &emily, today(), three_pm()).unwrap();
        assert_eq!(PickupRepository::new(&store).all().unwrap().len(), 1);

        fill(&mut cart);
        let again = checkout.place_order(&mut cart, &emily, today(), three_pm());
        assert!(matches!(again, Err(CheckoutError::WeeklyLimit { .. })));
        assert_eq!(PickupRepository::new(&store).all().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_cart_write_still_places_order() {
        let store = FlakyStore::default();
        let clock = FixedClock::new(monday_morning());
        let notifier = RecordingNotifier::new();
        let checkout = CheckoutService::new(&store, &clock, &notifier, LocalZone::utc());
        let mut cart = CartService::load(&store, &notifier).unwrap();
        fill(&mut cart);
        store.failing_key.set(Some(keys::CART));

        let confirmation = checkout
            .place_order(&mut cart, &UserId::new("4"), today(), three_pm())
            .unwrap();
        assert_eq!(confirmation.items.len(), 2);
        assert!(cart.cart().is_empty());
        assert_eq!(PickupRepository::new(&store).all().unwrap().len(), 1);
    }
}
