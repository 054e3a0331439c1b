//! Status enums for pickups and users.

use serde::{Deserialize, Serialize};

/// Lifecycle of a scheduled pickup.
///
/// `InProgress` is the only non-terminal state; it moves to `Successful`
/// when staff confirm the pickup, or to `Cancelled` manually or when the
/// grace period lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PickupStatus {
    #[default]
    InProgress,
    Successful,
    Cancelled,
}

impl PickupStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Label shown on request listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Successful => "Pickup Successful",
            Self::Cancelled => "Pickup Cancelled",
        }
    }
}

impl std::fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in-progress"),
            Self::Successful => write!(f, "successful"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Kind of account in the user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Places orders; subject to the weekly limit.
    Student,
    /// Manages users and may reset a student's weekly limit.
    Admin,
    /// Sees impact statistics only.
    Donor,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Admin => write!(f, "admin"),
            Self::Donor => write!(f, "donor"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            "donor" => Ok(Self::Donor),
            _ => Err(format!("invalid user type: {s}")),
        }
    }
}
