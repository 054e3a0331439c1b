//! User directory service.
//!
//! Answers "may this user order now?" for the checkout flow and the admin
//! user list, and applies the two eligibility transitions to stored users.

use thiserror::Error;
use tracing::{info, instrument};

use comet_cupboard_core::UserId;

use crate::clock::{Clock, LocalZone};
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::eligibility::{Eligibility, EligibilityEvaluator};
use crate::models::user::{NewUser, User};
use crate::store::KeyValueStore;

/// Errors that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No user has this id.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Only students have a weekly limit to reset.
    #[error("user {0} is not a student")]
    NotAStudent(UserId),

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// User lookups and eligibility over the stored directory.
pub struct UserDirectory<'a> {
    users: UserRepository<'a>,
    clock: &'a dyn Clock,
    evaluator: EligibilityEvaluator,
}

impl<'a> UserDirectory<'a> {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, clock: &'a dyn Clock, zone: LocalZone) -> Self {
        Self {
            users: UserRepository::new(store, clock),
            clock,
            evaluator: EligibilityEvaluator::new(zone),
        }
    }

    /// Every user in the directory.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Repository` if the directory cannot be read.
    pub fn list(&self) -> Result<Vec<User>, DirectoryError> {
        Ok(self.users.all()?)
    }

    /// # Errors
    ///
    /// Returns `DirectoryError::Repository` if the directory cannot be read.
    pub fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.get_by_id(id)?)
    }

    /// Case-insensitive email lookup.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Repository` if the directory cannot be read.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.get_by_email(email)?)
    }

    /// Store changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::UserNotFound` if the user is not stored.
    pub fn update(&self, user: &User) -> Result<(), DirectoryError> {
        self.users.update(user).map_err(|e| match e {
            RepositoryError::NotFound(_) => DirectoryError::UserNotFound(user.id.clone()),
            other => DirectoryError::Repository(other),
        })
    }

    /// Add a user to the directory.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::EmailTaken` if the email is already registered.
    pub fn register(&self, new_user: NewUser) -> Result<User, DirectoryError> {
        self.users.create(new_user).map_err(|e| match e {
            RepositoryError::Conflict(_) => DirectoryError::EmailTaken,
            other => DirectoryError::Repository(other),
        })
    }

    /// Whether `id` may place an order now. Unknown users may not.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Repository` if the directory cannot be read.
    pub fn can_place_order(&self, id: &UserId) -> Result<Eligibility, DirectoryError> {
        Ok(self
            .users
            .get_by_id(id)?
            .map_or_else(Eligibility::unknown_user, |user| self.eligibility_of(&user)))
    }

    /// Eligibility of an already loaded user.
    #[must_use]
    pub fn eligibility_of(&self, user: &User) -> Eligibility {
        self.evaluator.can_place_order(&user.eligibility, self.clock.now())
    }

    /// Record a placed order for `id` at the current time.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::UserNotFound` if the user does not exist.
    #[instrument(skip_all, fields(user_id = %id))]
    pub fn record_order_placed(&self, id: &UserId) -> Result<User, DirectoryError> {
        let mut user = self.require(id)?;
        user.eligibility.record_order_placed(self.clock.now());
        self.update(&user)?;
        info!("Recorded order");
        Ok(user)
    }

    /// Let a student place one more order this week.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::UserNotFound` if the user does not exist, or
    /// `DirectoryError::NotAStudent` if the user is not a student.
    #[instrument(skip_all, fields(user_id = %id))]
    pub fn reset_weekly_limit(&self, id: &UserId) -> Result<User, DirectoryError> {
        let mut user = self.require(id)?;
        if !user.is_student() {
            return Err(DirectoryError::NotAStudent(id.clone()));
        }
        user.eligibility.reset_weekly_limit();
        self.update(&user)?;
        info!(user = %user.full_name(), "Weekly limit reset");
        Ok(user)
    }

    fn require(&self, id: &UserId) -> Result<User, DirectoryError> {
        self.users
            .get_by_id(id)?
            .ok_or_else(|| DirectoryError::UserNotFound(id.clone()))
    }
}
