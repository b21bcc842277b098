//! Identifier newtypes.
//!
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity token for one review row.
///
/// Assigned when a page is mapped into cell configurations and never reused,
/// so targeted updates can locate their row even after more pages arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generate a fresh random identity.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying uuid.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Star rating in the closed range 1..=5.
///
/// Deserializes from any integer by clamping (see [`Rating::saturating`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Smart constructor: rejects values outside 1..=5.
    pub fn new(value: i64) -> Result<Self, InvalidRating> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidRating::OutOfRange(value))
        }
    }

    /// Clamp any integer into the accepted range.
    ///
    /// Used at the wire boundary so a single bad record cannot fail a page.
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Raw star count.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Self::saturating(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.0 as i64
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== Error Types =====

/// Rejected rating value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRating {
    /// Value outside 1..=5.
    #[error("Rating must be between 1 and 5 (got {0})")]
    OutOfRange(i64),
}

// ===== Tests =====
