//! Notifications broadcast by the review list store.

use crate::model::ReviewId;

/// Point-in-time summary of the list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSnapshot {
    /// Items loaded so far.
    pub item_count: usize,
    /// Offset of the next page to request.
    pub offset: usize,
    /// Server-reported total, once any page has arrived.
    pub total_count: Option<usize>,
    /// A page fetch is in flight.
    pub is_loading: bool,
    /// More pages can be requested.
    pub has_more: bool,
}

/// Change notification for presentation observers.
///
/// Events are sent after the state lock is released, so an observer reading
/// the store in response always sees the merged state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The list as a whole changed (a page was appended).
    StateChanged(ListSnapshot),
    /// One row changed in place (expanded, or its photos loaded).
    ItemChanged {
        /// Identity of the changed row.
        id: ReviewId,
        /// Position of the row at the time of the change.
        index: usize,
    },
    /// A page fetch failed; the same offset will be retried next time.
    LoadFailed {
        /// Offset that was requested.
        offset: usize,
        /// Human-readable failure.
        reason: String,
    },
}
