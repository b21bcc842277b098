//! Paged list state.
//!
//! Pure bookkeeping: no I/O, no locking. The store wraps one `ListState` in a
//! mutex and drives it through `begin_load` and one of `apply_page` or
//! `apply_failure`.
//!
//! Invariants:
//! - at most one page is in flight;
//! - `offset` never decreases;
//! - items are only ever appended.

use super::events::ListSnapshot;
use crate::model::ReviewId;
use crate::view_state::cell_config::ReviewCellConfig;

/// Parameters of one page fetch, captured when the load begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Index of the first requested item.
    pub offset: usize,
    /// Page size.
    pub limit: usize,
}

/// Items loaded so far plus the pagination cursor.
#[derive(Debug, Clone)]
pub struct ListState {
    items: Vec<ReviewCellConfig>,
    limit: usize,
    offset: usize,
    total_count: Option<usize>,
    in_flight: bool,
}

impl ListState {
    /// Empty list fetching `limit` items per page. A zero limit is raised to 1.
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit: limit.max(1),
            offset: 0,
            total_count: None,
            in_flight: false,
        }
    }

    /// More pages can be requested. Unknown until the first page arrives.
    pub fn has_more(&self) -> bool {
        self.total_count.map_or(true, |total| self.offset < total)
    }

    /// A page fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Claim the single in-flight slot.
    ///
    /// Returns `None` when a load is already running or every page has been
    /// loaded; otherwise marks the list as loading.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.in_flight || !self.has_more() {
            return None;
        }
        self.in_flight = true;
        Some(PageRequest {
            offset: self.offset,
            limit: self.limit,
        })
    }

    /// Merge a successfully decoded page.
    pub fn apply_page(
        &mut self,
        request: PageRequest,
        items: Vec<ReviewCellConfig>,
        total_count: usize,
    ) {
        self.items.extend(items);
        self.offset = self.offset.max(request.offset + request.limit);
        self.total_count = Some(total_count);
        self.in_flight = false;
    }

    /// Release the in-flight slot without touching items or offset.
    pub fn apply_failure(&mut self) {
        self.in_flight = false;
    }

    /// Flip the line limit of the item with `id`; returns its position.
    pub fn toggle_expansion(&mut self, id: ReviewId) -> Option<usize> {
        let index = self.position(id)?;
        self.items[index].layout.toggle_expansion();
        Some(index)
    }

    /// Position of the item with `id`.
    pub fn position(&self, id: ReviewId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Loaded items in server order.
    pub fn items(&self) -> &[ReviewCellConfig] {
        &self.items
    }

    /// Item at `index`.
    pub fn item(&self, index: usize) -> Option<&ReviewCellConfig> {
        self.items.get(index)
    }

    /// Number of loaded items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True before any item has been loaded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset of the next page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Page size.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Server-reported total.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Summary for observers.
    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            item_count: self.items.len(),
            offset: self.offset,
            total_count: self.total_count,
            is_loading: self.in_flight,
            has_more: self.has_more(),
        }
    }
}
