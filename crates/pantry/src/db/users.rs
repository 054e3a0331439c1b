//! User directory repository.
//!
//! The whole directory lives under [`keys::USERS`] as a JSON array. On
//! first access it is seeded with the demo accounts.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use comet_cupboard_core::{Email, UserId, UserType};

use super::{RepositoryError, keys, load_json, save_json};
use crate::clock::Clock;
use crate::eligibility::OrderEligibilityRecord;
use crate::models::user::{NewUser, User};
use crate::store::KeyValueStore;

/// Repository for the user directory.
pub struct UserRepository<'a> {
    store: &'a dyn KeyValueStore,
    clock: &'a dyn Clock,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Every user, seeding the demo accounts if the directory is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the directory is corrupt.
    pub fn all(&self) -> Result<Vec<User>, RepositoryError> {
        if let Some(users) = load_json(self.store, keys::USERS)? {
            return Ok(users);
        }

        let users = demo_users(self.clock.now());
        save_json(self.store, keys::USERS, &users)?;
        info!(count = users.len(), "Seeded user directory");
        Ok(users)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the directory is corrupt.
    pub fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|user| &user.id == id))
    }

    /// Get a user by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the directory is corrupt.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|user| user.email.matches(email)))
    }

    /// Register a user. The id is the current time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.all()?;
        if users
            .iter()
            .any(|user| user.email.matches(new_user.email.as_str()))
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let mut id = self.clock.now().timestamp_millis();
        while users.iter().any(|user| user.id.as_str() == id.to_string()) {
            id += 1;
        }

        let user = User {
            id: UserId::new(id.to_string()),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            user_type: new_user.user_type,
            student_id: new_user.student_id,
            eligibility: OrderEligibilityRecord::default(),
        };
        users.push(user.clone());
        save_json(self.store, keys::USERS, &users)?;
        debug!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Replace the stored user with the same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has that id.
    pub fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.all()?;
        let slot = users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", user.id)))?;
        *slot = user.clone();
        save_json(self.store, keys::USERS, &users)
    }
}

/// The demo directory: one admin and three students in different states.
fn demo_users(now: DateTime<Utc>) -> Vec<User> {
    let user = |id: &str, first: &str, last: &str, email: &str, user_type, student_id: Option<&str>| {
        Email::parse(email).ok().map(|email| User {
            id: UserId::new(id),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email,
            user_type,
            student_id: student_id.map(str::to_owned),
            eligibility: OrderEligibilityRecord::default(),
        })
    };

    let mut users: Vec<User> = [
        user("1", "Admin", "User", "admin@utdallas.edu", UserType::Admin, None),
        user("2", "Student", "User", "student@utdallas.edu", UserType::Student, Some("2023001")),
        user("3", "John", "Smith", "john.smith@utdallas.edu", UserType::Student, Some("2023002")),
        user("4", "Emily", "Johnson", "emily.johnson@utdallas.edu", UserType::Student, Some("2023003")),
    ]
    .into_iter()
    .flatten()
    .collect();

    for user in &mut users {
        user.eligibility.last_order_timestamp = match user.id.as_str() {
            "2" => Some(now - TimeDelta::days(2)),
            "3" => Some(now),
            _ => None,
        };
    }
    users
}
