//! Review list state and the store that drives it.
//!
//! `list_state` is pure bookkeeping; `store` adds the provider, the mapping
//! to cell configurations and event broadcasting.

pub mod events;
pub mod list_state;
pub mod store;

// Re-export for convenience
pub use events::{ListSnapshot, StoreEvent};
pub use list_state::{ListState, PageRequest};
pub use store::ReviewListStore;
