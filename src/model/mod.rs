//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod review;

// Re-export for convenience
pub use error::{AppError, ImageError, PageError, ProviderError};
pub use identifiers::{InvalidRating, Rating, ReviewId};
pub use review::{ReviewRecord, ReviewsPage};
