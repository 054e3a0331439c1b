//! Integration tests for Comet Cupboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p comet-cupboard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_capacity` - Global and per-item limits through the cart service
//! - `weekly_eligibility` - ISO week boundaries and the admin override
//! - `checkout_flow` - Orders end to end, from cart to stored pickup
//! - `pickup_expiry` - Grace period, sweeps and staff transitions
//! - `file_store` - State surviving a reopen of the JSON store file
//!
//! Shared fixtures live in `tests/common`.

#![cfg_attr(not(test), forbid(unsafe_code))]
