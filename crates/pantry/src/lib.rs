//! Comet Cupboard pantry engine.
//!
//! Implements the ordering rules of the Comet Cupboard food pantry:
//!
//! - [`cart`] - cart capacity (5 items per order, per-item limits)
//! - [`eligibility`] - one order per ISO week, with an admin override
//! - [`pickup`] - pickup expiry after a 30 minute grace period
//! - [`schedule`] - pickup slots and the daily cutoff
//!
//! The rules themselves are pure functions over values. The [`services`]
//! layer wires them to the collaborators a caller supplies: a key-value
//! [`store`], a [`clock`] and a [`notify`] sink. Repositories in [`db`]
//! map the stored JSON documents to [`models`], and [`config`] reads the
//! environment.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod clock;
pub mod config;
pub mod db;
pub mod eligibility;
pub mod models;
pub mod notify;
pub mod pickup;
pub mod schedule;
pub mod services;
pub mod store;
