//! User domain types.

use serde::{Deserialize, Serialize};

use comet_cupboard_core::{Email, UserId, UserType};

use crate::eligibility::OrderEligibilityRecord;

/// A directory entry.
///
/// Stored as camelCase JSON; the eligibility fields sit at the top level as
/// `lastOrderDate` and `orderLimitReset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(flatten)]
    pub eligibility: OrderEligibilityRecord,
}

impl User {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn is_student(&self) -> bool {
        self.user_type == UserType::Student
    }
}

/// Fields for registering a user; the directory assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub user_type: UserType,
    pub student_id: Option<String>,
}
