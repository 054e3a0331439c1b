//! Core types for Comet Cupboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod pickup_time;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use pickup_time::{PickupTime, PickupTimeError};
pub use status::*;
