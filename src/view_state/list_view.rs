//! Presentation-side row heights for the review list.
//!
//! Consumes [`StoreEvent`]s: a state change appends rows for the new items,
//! an item change relayouts exactly one row. Heights are rounded up to whole
//! points and kept in a [`HeightIndex`] so scroll lookups stay logarithmic.

use super::cell_config::ReviewCellConfig;
use super::height_index::HeightIndex;
use super::layout_params::LayoutParams;
use super::pagination::PaginationTrigger;
use super::text::{GlyphMeasurer, TextMeasurer};
use crate::state::{ReviewListStore, StoreEvent};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Footer text for a known total.
///
/// ```
/// # use reviews_feed::view_state::list_view::count_label;
/// assert_eq!(count_label(1), "1 review");
/// assert_eq!(count_label(45), "45 reviews");
/// ```
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 review".to_string()
    } else {
        format!("{count} reviews")
    }
}

/// Row geometry of the list at one width.
pub struct ReviewListView {
    width: f64,
    params: LayoutParams,
    measurer: Arc<dyn TextMeasurer>,
    trigger: PaginationTrigger,
    heights: HeightIndex,
    total_count: Option<usize>,
    has_more: bool,
}

impl fmt::Debug for ReviewListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewListView")
            .field("width", &self.width)
            .field("rows", &self.heights.len())
            .field("content_height", &self.heights.total())
            .field("total_count", &self.total_count)
            .finish_non_exhaustive()
    }
}

impl ReviewListView {
    /// Empty view `width` points wide using the built-in measurer.
    pub fn new(width: f64, trigger: PaginationTrigger) -> Self {
        Self::with_measurer(width, trigger, LayoutParams::default(), Arc::new(GlyphMeasurer))
    }

    /// Empty view with explicit geometry and measurement.
    pub fn with_measurer(
        width: f64,
        trigger: PaginationTrigger,
        params: LayoutParams,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        Self {
            width,
            params,
            measurer,
            trigger,
            heights: HeightIndex::default(),
            total_count: None,
            has_more: true,
        }
    }

    fn row_height_of(&self, config: &ReviewCellConfig) -> usize {
        config
            .height(self.width, &self.params, self.measurer.as_ref())
            .ceil()
            .max(0.0) as usize
    }

    /// Apply one store event; returns whether any row geometry changed.
    pub fn apply(&mut self, event: &StoreEvent, store: &ReviewListStore) -> bool {
        match event {
            StoreEvent::StateChanged(snapshot) => {
                self.total_count = snapshot.total_count;
                self.has_more = snapshot.has_more;
                let rows = self.heights.len();
                if snapshot.item_count < rows {
                    self.rebuild(&store.items());
                    return true;
                }
                let added = store.items_from(rows);
                self.append_rows(&added);
                !added.is_empty()
            }
            StoreEvent::ItemChanged { id, index } => {
                // Rows are append-only, so the index stays valid.
                match store.item(*index).filter(|config| config.id == *id) {
                    Some(config) => self.update_row(*index, &config),
                    None => false,
                }
            }
            StoreEvent::LoadFailed { .. } => false,
        }
    }

    /// Apply every queued event; returns the events applied.
    ///
    /// A receiver that fell behind has lost events, so the rows are rebuilt
    /// from the store before draining continues.
    pub fn drain(
        &mut self,
        events: &mut broadcast::Receiver<StoreEvent>,
        store: &ReviewListStore,
    ) -> Vec<StoreEvent> {
        let mut applied = Vec::new();
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.apply(&event, store);
                    applied.push(event);
                }
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "store events lagged, rebuilding rows");
                    self.resync(store);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return applied,
            }
        }
    }

    /// Rebuild every row and the footer state from the store.
    pub fn resync(&mut self, store: &ReviewListStore) {
        let snapshot = store.snapshot();
        self.total_count = snapshot.total_count;
        self.has_more = snapshot.has_more;
        self.rebuild(&store.items());
    }

    /// Append rows for `items`.
    pub fn append_rows(&mut self, items: &[ReviewCellConfig]) {
        for config in items {
            let height = self.row_height_of(config);
            self.heights.push(height);
        }
    }

    /// Relayout the row at `index`; returns whether its height changed.
    pub fn update_row(&mut self, index: usize, config: &ReviewCellConfig) -> bool {
        let Some(previous) = self.heights.height(index) else {
            return false;
        };
        let height = self.row_height_of(config);
        self.heights.set(index, height);
        previous != height
    }

    /// Change the width and relayout every row.
    pub fn set_width(&mut self, width: f64, items: &[ReviewCellConfig]) {
        if width == self.width {
            return;
        }
        self.width = width;
        self.rebuild(items);
    }

    fn rebuild(&mut self, items: &[ReviewCellConfig]) {
        let heights: Vec<usize> = items.iter().map(|c| self.row_height_of(c)).collect();
        self.heights = HeightIndex::from_heights(heights);
    }

    /// Current width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.heights.len()
    }

    /// Height of the row at `index`.
    pub fn row_height(&self, index: usize) -> Option<usize> {
        self.heights.height(index)
    }

    /// Top edge of the row at `index`.
    pub fn row_offset(&self, index: usize) -> usize {
        self.heights.offset_of(index)
    }

    /// Row under the vertical offset `y`.
    pub fn row_at(&self, y: usize) -> Option<usize> {
        self.heights.row_at(y)
    }

    /// Sum of all row heights.
    pub fn content_height(&self) -> usize {
        self.heights.total()
    }

    /// True when scrolling to `target_offset_y` should load another page.
    ///
    /// Always false once the store reported that every page is loaded.
    pub fn should_request_next_page(&self, viewport_height: f64, target_offset_y: f64) -> bool {
        self.has_more
            && self.trigger.should_load_next_page(
                viewport_height,
                self.content_height() as f64,
                target_offset_y,
            )
    }

    /// Footer text, once the total is known.
    pub fn count_label(&self) -> Option<String> {
        self.total_count.map(count_label)
    }
}
