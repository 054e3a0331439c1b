//! Wall-clock pickup time.
//!
//! Pickup times are entered and displayed in 12-hour form (`"3:00 PM"`).
//! The 24-hour form (`"15:00"`) is also accepted on input.

use core::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PickupTime`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PickupTimeError {
    /// Input is not `H:MM`, `H:MM AM|PM`, or `HH:MM`.
    #[error("unrecognized time format: {0:?}")]
    Format(String),
    /// Hour or minute is outside its range.
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PickupTime(NaiveTime);

impl PickupTime {
    /// Build from 24-hour components.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse `"3:00 PM"`, `"3:00pm"`, `"12:30 AM"` or `"15:00"`.
    ///
    /// # Errors
    ///
    /// Returns [`PickupTimeError`] if the input is malformed or out of range.
    pub fn parse(s: &str) -> Result<Self, PickupTimeError> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else {
            (upper.as_str(), None)
        };

        let (hour, minute) = clock
            .split_once(':')
            .ok_or_else(|| PickupTimeError::Format(trimmed.to_owned()))?;
        let hour: u32 = hour
            .parse()
            .map_err(|_| PickupTimeError::Format(trimmed.to_owned()))?;
        if minute.len() != 2 {
            return Err(PickupTimeError::Format(trimmed.to_owned()));
        }
        let minute: u32 = minute
            .parse()
            .map_err(|_| PickupTimeError::Format(trimmed.to_owned()))?;

        let hour = match meridiem {
            Some(_) if !(1..=12).contains(&hour) => {
                return Err(PickupTimeError::OutOfRange(trimmed.to_owned()));
            }
            Some(true) if hour == 12 => 12,
            Some(true) => hour + 12,
            Some(false) if hour == 12 => 0,
            Some(false) | None => hour,
        };

        Self::from_hm(hour, minute).ok_or_else(|| PickupTimeError::OutOfRange(trimmed.to_owned()))
    }

    /// Underlying `chrono` time.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Hour in 24-hour form.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute of the hour.
    #[must_use]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl fmt::Display for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (pm, hour) = self.0.hour12();
        let period = if pm { "PM" } else { "AM" };
        write!(f, "{hour}:{:02} {period}", self.minute())
    }
}

impl std::str::FromStr for PickupTime {
    type Err = PickupTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PickupTime {
    type Error = PickupTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PickupTime> for String {
    fn from(time: PickupTime) -> Self {
        time.to_string()
    }
}

impl From<NaiveTime> for PickupTime {
    fn from(time: NaiveTime) -> Self {
        Self(time.with_second(0).unwrap_or(time).with_nanosecond(0).unwrap_or(time))
    }
}
