//! Comet Cupboard CLI - drive the pantry engine from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Put two items in the cart and look at it
//! cc-cli cart add beans "Black Beans" "Canned Goods" 2
//! cc-cli cart add rice Rice Grains 1
//! cc-cli cart show
//!
//! # Check who may order this week
//! cc-cli eligibility
//!
//! # Place the order for a 3:00 PM pickup today
//! cc-cli checkout --user 4 --time "3:00 PM"
//!
//! # Run the pickup sweep every PANTRY_SWEEP_INTERVAL_SECS until Ctrl+C
//! cc-cli pickups watch
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart
//! - `eligibility` - Weekly order eligibility per user
//! - `checkout` - Place an order
//! - `admin reset-limit` - Allow a student one more order this week
//! - `pickups` - List, confirm, cancel and sweep pickups
//! - `slots` - Bookable pickup slots

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use comet_cupboard_core::PickupTime;
use comet_cupboard_pantry::config::PantryConfig;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(author, version, about = "Comet Cupboard pantry tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show whether users may place an order this week
    Eligibility {
        /// Only this user (default: every user)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Place an order for the current cart
    Checkout {
        /// Ordering user's id
        #[arg(short, long)]
        user: String,

        /// Pickup date, YYYY-MM-DD (default: today, or tomorrow after 4:30 PM)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Pickup slot, e.g. "3:00 PM"
        #[arg(short, long)]
        time: PickupTime,
    },
    /// Administrative actions
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage scheduled pickups
    Pickups {
        #[command(subcommand)]
        action: PickupAction,
    },
    /// List bookable pickup slots
    Slots {
        /// Pickup date, YYYY-MM-DD (default: today, or tomorrow after 4:30 PM)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of an item
    Add {
        /// Item id
        id: String,
        /// Display name
        name: String,
        /// Category
        category: String,
        /// Most units of this item per order
        limit: u32,
    },
    /// Set an item's quantity (clamped to the limits)
    Set {
        /// Item id
        id: String,
        /// Requested quantity
        quantity: u32,
    },
    /// Remove an item
    Remove {
        /// Item id
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Let a student place one more order this week
    ResetLimit {
        /// Student's user id
        user_id: String,
    },
}

#[derive(Subcommand)]
enum PickupAction {
    /// Print every pickup with its status
    List,
    /// Cancel expired pickups once
    Sweep,
    /// Sweep periodically until interrupted
    Watch,
    /// Mark a pickup as collected
    Confirm {
        /// Request id
        id: String,
    },
    /// Cancel a pickup
    Cancel {
        /// Request id
        id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comet_cupboard_pantry=info,cc_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = PantryConfig::from_env()?;
    let ctx = Context::open(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx)?,
            CartAction::Add {
                id,
                name,
                category,
                limit,
            } => commands::cart::add(&ctx, &id, &name, &category, limit)?,
            CartAction::Set { id, quantity } => commands::cart::set(&ctx, &id, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, &id)?,
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
        Commands::Eligibility { user } => commands::orders::eligibility(&ctx, user.as_deref())?,
        Commands::Checkout { user, date, time } => {
            commands::orders::checkout(&ctx, &user, date, time)?;
        }
        Commands::Admin { action } => match action {
            AdminAction::ResetLimit { user_id } => commands::orders::reset_limit(&ctx, &user_id)?,
        },
        Commands::Pickups { action } => match action {
            PickupAction::List => commands::pickups::list(&ctx)?,
            PickupAction::Sweep => commands::pickups::sweep(&ctx)?,
            PickupAction::Watch => commands::pickups::watch(&ctx).await,
            PickupAction::Confirm { id } => commands::pickups::confirm(&ctx, &id)?,
            PickupAction::Cancel { id } => commands::pickups::cancel(&ctx, &id)?,
        },
        Commands::Slots { date } => commands::pickups::slots(&ctx, date),
    }
    Ok(())
}
