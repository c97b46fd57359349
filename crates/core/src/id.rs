//! Identifiers used across the domain.
//!
//! Ids are opaque strings: documents written by older versions carry
//! millisecond-timestamp ids, newer ones carry UUIDv7 text. Both are accepted;
//! only freshly generated ids are guaranteed to be UUIDs.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

/// Identifier of a guest (or guest party).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered), which never collides with legacy numeric
            /// ids. Prefer `from_string` in tests.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_input(concat!($name, ": empty identifier")));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_string_id!(ExpenseId, "ExpenseId");
impl_string_id!(GuestId, "GuestId");
