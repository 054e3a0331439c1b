//! Comet Cupboard Core - Shared types library.
//!
//! This crate provides common types used across all Comet Cupboard components:
//! - `pantry` - Order policy engine (cart, eligibility, pickups)
//! - `cli` - Command-line driver over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, statuses, and pickup times

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
