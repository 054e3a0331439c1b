//! Eligibility, checkout and admin commands.

use chrono::NaiveDate;

use comet_cupboard_core::{PickupTime, UserId};
use comet_cupboard_pantry::clock::Clock;
use comet_cupboard_pantry::schedule::PickupSchedule;
use comet_cupboard_pantry::services::{CheckoutError, DirectoryError};

use super::Context;

/// Print each user's eligibility badge, or one user's in detail.
#[allow(clippy::print_stdout)]
pub fn eligibility(ctx: &Context, user: Option<&str>) -> Result<(), DirectoryError> {
    let directory = ctx.directory();

    if let Some(id) = user {
        let id = UserId::new(id);
        let result = directory.can_place_order(&id)?;
        println!("{id}: {}", result.badge());
        if let Some(date) = result.next_eligible_date {
            println!("Next order on {}", date.format("%A, %B %-d"));
        }
        return Ok(());
    }

    for user in directory.list()? {
        let result = directory.eligibility_of(&user);
        println!(
            "{:<14} {:<20} {:<8} {}",
            user.id,
            user.full_name(),
            user.user_type,
            result.badge()
        );
    }
    Ok(())
}

/// Place an order for the stored cart.
#[allow(clippy::print_stdout)]
pub fn checkout(
    ctx: &Context,
    user: &str,
    date: Option<NaiveDate>,
    time: PickupTime,
) -> Result<(), CheckoutError> {
    let date = date.unwrap_or_else(|| {
        PickupSchedule::new(ctx.config.zone).default_pickup_date(ctx.clock().now())
    });
    let mut cart = ctx.cart()?;

    let confirmation = ctx
        .checkout()
        .place_order(&mut cart, &UserId::new(user), date, time)?;

    println!("Order {} confirmed", confirmation.order_number);
    println!("Request: {}", confirmation.request_id);
    println!(
        "Pickup: {} at {}",
        confirmation.date.format("%A, %B %-d"),
        confirmation.time
    );
    for line in &confirmation.items {
        println!("  {} x{}", line.display_name(), line.quantity());
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn reset_limit(ctx: &Context, user_id: &str) -> Result<(), DirectoryError> {
    let user = ctx.directory().reset_weekly_limit(&UserId::new(user_id))?;
    println!("Weekly limit reset for {}", user.full_name());
    Ok(())
}
