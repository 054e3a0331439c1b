//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use comet_cupboard_core::define_id;
/// define_id!(ShelfId);
/// define_id!(BinId);
///
/// let shelf = ShelfId::new("a-1");
/// let bin = BinId::new("a-1");
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = bin;
/// assert_eq!(shelf.as_str(), bin.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ItemId);
define_id!(RequestId);

/// Customer-facing order number, rendered as `CC-` followed by six digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(u32);

impl OrderNumber {
    /// Prefix shared by every order number.
    pub const PREFIX: &'static str = "CC-";
    /// Smallest six-digit value.
    pub const MIN: u32 = 100_000;
    /// Largest six-digit value.
    pub const MAX: u32 = 999_999;

    /// Create an order number from its numeric part.
    ///
    /// Returns `None` unless the value has exactly six digits.
    #[must_use]
    pub const fn new(digits: u32) -> Option<Self> {
        if digits >= Self::MIN && digits <= Self::MAX {
            Some(Self(digits))
        } else {
            None
        }
    }

    /// Map any `u32` onto the six-digit range.
    #[must_use]
    pub const fn from_seed(seed: u32) -> Self {
        Self(Self::MIN + seed % (Self::MAX - Self::MIN + 1))
    }

    /// Numeric part of the order number.
    #[must_use]
    pub const fn digits(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|digits| digits.parse::<u32>().ok())
            .and_then(Self::new)
            .ok_or_else(|| format!("invalid order number: {s}"))
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_their_value() {
        let id = ItemId::new("rice-2lb");
        assert_eq!(id.to_string(), "rice-2lb");
        assert_eq!(UserId::from("2").as_str(), "2");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&RequestId::new("REQ-7")).unwrap();
        assert_eq!(json, "\"REQ-7\"");
    }

    #[test]
    fn test_order_number_bounds() {
        assert!(OrderNumber::new(99_999).is_none());
        assert!(OrderNumber::new(1_000_000).is_none());
        assert_eq!(OrderNumber::new(123_456).unwrap().to_string(), "CC-123456");
    }

    #[test]
    fn test_order_number_from_seed_stays_in_range() {
        assert_eq!(OrderNumber::from_seed(0).digits(), 100_000);
        assert_eq!(OrderNumber::from_seed(899_999).digits(), 999_999);
        assert_eq!(OrderNumber::from_seed(900_000).digits(), 100_000);
        assert!(OrderNumber::from_seed(u32::MAX).digits() <= OrderNumber::MAX);
    }

    #[test]
    fn test_order_number_parse() {
        let number: OrderNumber = "CC-654321".parse().unwrap();
        assert_eq!(number.digits(), 654_321);
        assert!("654321".parse::<OrderNumber>().is_err());
        assert!("CC-12".parse::<OrderNumber>().is_err());
    }

    #[test]
    fn test_order_number_serde_uses_display_form() {
        let number = OrderNumber::new(500_000).unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"CC-500000\"");
        let back: OrderNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
    }
}
