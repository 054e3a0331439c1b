//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cc-cli cart add beans "Black Beans" "Canned Goods" 2
//! cc-cli cart set beans 2
//! cc-cli cart remove beans
//! cc-cli cart show
//! ```

use comet_cupboard_core::ItemId;
use comet_cupboard_pantry::cart::{AddOutcome, CartLine, GLOBAL_CART_LIMIT};
use comet_cupboard_pantry::db::RepositoryError;

use super::Context;

/// Print every line and the running total.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) -> Result<(), RepositoryError> {
    let service = ctx.cart()?;
    let cart = service.cart();
    if cart.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }

    for line in cart.lines() {
        println!(
            "{:<12} {:<24} {:<16} {}/{}",
            line.item_id(),
            line.display_name(),
            line.category(),
            line.quantity(),
            line.per_item_limit()
        );
    }
    println!("Total: {}/{GLOBAL_CART_LIMIT}", cart.total_count());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn add(
    ctx: &Context,
    id: &str,
    name: &str,
    category: &str,
    limit: u32,
) -> Result<(), RepositoryError> {
    let mut service = ctx.cart()?;
    let outcome = service.add_item(CartLine::new(id, name, category, limit))?;
    match outcome {
        AddOutcome::Added => println!("Added {name}"),
        AddOutcome::Incremented => println!("Added another {name}"),
        // The notifier already explained the rejection.
        AddOutcome::ItemLimitReached | AddOutcome::CartFull => {}
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn set(ctx: &Context, id: &str, quantity: u32) -> Result<(), RepositoryError> {
    let mut service = ctx.cart()?;
    match service.set_quantity(&ItemId::new(id), quantity)? {
        Some(stored) if stored == quantity => println!("{id}: {stored}"),
        Some(stored) => println!("{id}: {stored} (requested {quantity})"),
        None => println!("{id} is not in the cart"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn remove(ctx: &Context, id: &str) -> Result<(), RepositoryError> {
    let mut service = ctx.cart()?;
    if !service.remove_item(&ItemId::new(id))? {
        println!("{id} is not in the cart");
    }
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<(), RepositoryError> {
    ctx.cart()?.clear()
}
