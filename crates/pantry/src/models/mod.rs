//! Domain models for the pantry.

pub mod user;

pub use user::{NewUser, User};
