//! Business logic services for the pantry.
//!
//! # Services
//!
//! - `cart` - Cart operations with write-through persistence
//! - `directory` - User lookups and weekly order eligibility
//! - `checkout` - Order placement
//! - `monitor` - Pickup transitions and the periodic expiry sweep

pub mod cart;
pub mod checkout;
pub mod directory;
pub mod monitor;

pub use cart::CartService;
pub use checkout::{CheckoutError, CheckoutService, Confirmation};
pub use directory::{DirectoryError, UserDirectory};
pub use monitor::{MonitorError, PickupMonitor};
