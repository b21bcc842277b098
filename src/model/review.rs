//! Wire-format review records.
//!
//! These are the parsed shapes of a provider page. They are immutable once
//! decoded; the display projection lives in
//! [`crate::view_state::cell_config::ReviewCellConfig`].

use super::identifiers::Rating;
use serde::{Deserialize, Serialize};

/// One review as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Avatar image URL, when the author has one.
    #[serde(default, alias = "avatarUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Attached photo URLs, in display order.
    #[serde(default)]
    pub photos_urls: Vec<String>,
    /// Author first name.
    pub first_name: String,
    /// Author last name.
    pub last_name: String,
    /// Review body.
    pub text: String,
    /// Star rating.
    pub rating: Rating,
    /// Creation timestamp. Opaque to this crate; displayed verbatim.
    pub created: String,
}

impl ReviewRecord {
    /// Display name: first and last name joined by a space.
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, _) => self.last_name.clone(),
        }
    }
}

/// One page of reviews plus the server-wide total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewsPage {
    /// Reviews in server order.
    pub items: Vec<ReviewRecord>,
    /// Total number of reviews across all pages.
    pub count: usize,
}

impl ReviewsPage {
    /// Decode a page from raw provider bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode back to JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
