//! Strongly-typed identifiers for domain entities
//!
//! Insured persons and vehicles are keyed by store-generated integers, while
//! policies are keyed by the caller-supplied policy code. Newtype wrappers keep
//! the three from being mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_serial_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw store key
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw store key
            pub fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix used in log output
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_serial_id!(InsuredId, "INS");
define_serial_id!(VehicleId, "VEH");

/// Maximum length of a policy code
pub const POLICY_CODE_MAX_LEN: usize = 25;

/// The caller-supplied key of a policy
///
/// Unlike the serial identifiers, a policy code is chosen at registration and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyCode(String);

impl PolicyCode {
    /// Creates a policy code from raw text
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code and returns the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PolicyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PolicyCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for PolicyCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for PolicyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insured_id_display() {
        let id = InsuredId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_parsing_accepts_prefix() {
        let parsed: InsuredId = "INS-7".parse().unwrap();
        assert_eq!(parsed, InsuredId::new(7));

        let plain: VehicleId = "12".parse().unwrap();
        assert_eq!(plain.value(), 12);
    }

    #[test]
    fn test_policy_code_display() {
        let code = PolicyCode::new("TesteCodigo");
        assert_eq!(code.to_string(), "TesteCodigo");
        assert_eq!(code.as_str(), "TesteCodigo");
    }
}
