//! Pickup commands.
//!
//! # Usage
//!
//! ```bash
//! cc-cli pickups list
//! cc-cli pickups confirm REQ-1744646400000
//! cc-cli pickups watch
//! ```

use chrono::NaiveDate;

use comet_cupboard_core::{PickupStatus, RequestId};
use comet_cupboard_pantry::clock::Clock;
use comet_cupboard_pantry::db::RepositoryError;
use comet_cupboard_pantry::pickup::PickupCountdown;
use comet_cupboard_pantry::schedule::PickupSchedule;
use comet_cupboard_pantry::services::MonitorError;

use super::Context;

/// Print every pickup with its countdown or status.
#[allow(clippy::print_stdout)]
pub fn list(ctx: &Context) -> Result<(), RepositoryError> {
    let monitor = ctx.monitor();
    let now = ctx.clock().now();
    let pickups = monitor.list()?;
    if pickups.is_empty() {
        println!("No pickups scheduled");
        return Ok(());
    }

    let window = monitor.window();
    for pickup in &pickups {
        let detail = match pickup.status {
            PickupStatus::InProgress => match (
                window.time_until_pickup(pickup, now),
                window.remaining_time(pickup, now),
            ) {
                (countdown @ PickupCountdown::Upcoming { .. }, _) => format!("in {countdown}"),
                (PickupCountdown::Passed, Some(remaining)) => {
                    format!("{remaining} left to pick up")
                }
                (PickupCountdown::Passed, None) => "expired, awaiting sweep".to_owned(),
            },
            status => status.label().to_owned(),
        };
        println!(
            "{:<20} {} {} {:>8}  {detail}",
            pickup.id, pickup.order_number, pickup.scheduled_date, pickup.scheduled_time
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn sweep(ctx: &Context) -> Result<(), RepositoryError> {
    let outcome = ctx.monitor().sweep_once()?;
    println!("Cancelled {} expired pickup(s)", outcome.cancelled.len());
    Ok(())
}

/// Sweep on the configured interval until Ctrl+C.
pub async fn watch(ctx: &Context) {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };
    ctx.monitor().run(ctx.config.sweep_interval, shutdown).await;
}

#[allow(clippy::print_stdout)]
pub fn confirm(ctx: &Context, id: &str) -> Result<(), MonitorError> {
    let pickup = ctx.monitor().confirm(&RequestId::new(id))?;
    println!("{} {}", pickup.order_number, pickup.status.label());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn cancel(ctx: &Context, id: &str) -> Result<(), MonitorError> {
    let pickup = ctx.monitor().cancel(&RequestId::new(id))?;
    println!("{} {}", pickup.order_number, pickup.status.label());
    Ok(())
}

/// Print the slots still bookable on `date`.
#[allow(clippy::print_stdout)]
pub fn slots(ctx: &Context, date: Option<NaiveDate>) {
    let schedule = PickupSchedule::new(ctx.config.zone);
    let now = ctx.clock().now();
    let date = date.unwrap_or_else(|| schedule.default_pickup_date(now));

    let slots = schedule.available_slots_on(date, now);
    if slots.is_empty() {
        println!("No slots left on {date}");
        return;
    }
    println!("{}:", date.format("%A, %B %-d"));
    for slot in slots {
        println!("  {slot}");
    }
}
