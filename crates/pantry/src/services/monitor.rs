//! Pickup monitor.
//!
//! Staff confirm or cancel pickups by request id, and a periodic sweep
//! cancels in-progress pickups whose grace period has lapsed.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use comet_cupboard_core::RequestId;

use crate::clock::{Clock, LocalZone};
use crate::db::RepositoryError;
use crate::db::pickups::PickupRepository;
use crate::notify::{Notice, Notifier};
use crate::pickup::{PickupError, PickupWindow, ScheduledPickup, SweepOutcome};
use crate::store::KeyValueStore;

/// Errors that can occur during pickup operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The transition is not allowed.
    #[error(transparent)]
    Pickup(#[from] PickupError),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Pickup transitions and the expiry sweep.
pub struct PickupMonitor<'a> {
    pickups: PickupRepository<'a>,
    window: PickupWindow,
    clock: &'a dyn Clock,
    notifier: &'a dyn Notifier,
}

impl<'a> PickupMonitor<'a> {
    /// Create a new pickup monitor.
    #[must_use]
    pub const fn new(
        store: &'a dyn KeyValueStore,
        clock: &'a dyn Clock,
        notifier: &'a dyn Notifier,
        zone: LocalZone,
    ) -> Self {
        Self {
            pickups: PickupRepository::new(store),
            window: PickupWindow::new(zone),
            clock,
            notifier,
        }
    }

    /// The expiry rules in use.
    #[must_use]
    pub const fn window(&self) -> &PickupWindow {
        &self.window
    }

    /// Every stored pickup.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the pickups cannot be read.
    pub fn list(&self) -> Result<Vec<ScheduledPickup>, RepositoryError> {
        self.pickups.all()
    }

    /// Run one sweep at the current time.
    ///
    /// Writes back and notifies only when something was cancelled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the pickups cannot be read or written.
    pub fn sweep_once(&self) -> Result<SweepOutcome, RepositoryError> {
        let pickups = self.pickups.all()?;
        let outcome = self.window.sweep(&pickups, self.clock.now());

        if outcome.any_changed {
            self.pickups.save_all(&outcome.updated)?;
            info!(cancelled = ?outcome.cancelled, "Auto-cancelled expired pickups");
            self.notifier.notify(&Notice::PickupsAutoCancelled {
                count: outcome.cancelled.len(),
            });
        }
        Ok(outcome)
    }

    /// Staff confirmed the pickup was collected.
    ///
    /// # Errors
    ///
    /// Returns `PickupError::NotFound` for an unknown id and
    /// `PickupError::AlreadyFinal` if the pickup is not in progress.
    pub fn confirm(&self, id: &RequestId) -> Result<ScheduledPickup, MonitorError> {
        self.transition(id, ScheduledPickup::confirm)
    }

    /// Cancel a pickup by hand.
    ///
    /// # Errors
    ///
    /// Returns `PickupError::NotFound` for an unknown id and
    /// `PickupError::AlreadyFinal` if the pickup is not in progress.
    pub fn cancel(&self, id: &RequestId) -> Result<ScheduledPickup, MonitorError> {
        self.transition(id, ScheduledPickup::cancel)
    }

    fn transition(
        &self,
        id: &RequestId,
        apply: fn(&mut ScheduledPickup) -> Result<(), PickupError>,
    ) -> Result<ScheduledPickup, MonitorError> {
        let mut pickups = self.pickups.all()?;
        let pickup = pickups
            .iter_mut()
            .find(|pickup| &pickup.id == id)
            .ok_or_else(|| PickupError::NotFound(id.clone()))?;
        apply(pickup)?;
        let updated = pickup.clone();

        self.pickups.save_all(&pickups)?;
        info!(request_id = %id, status = %updated.status, "Pickup updated");
        Ok(updated)
    }

    /// Sweep every `period` until `shutdown` resolves.
    ///
    /// The first sweep runs immediately. A failed sweep is logged and the
    /// loop carries on.
    pub async fn run(&self, period: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(period_secs = period.as_secs(), "Pickup monitor started");
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once() {
                        error!(error = %e, "Pickup sweep failed");
                    }
                }
            }
        }
        info!("Pickup monitor stopped");
    }
}
