//! Review list store.
//!
//! Owns the [`ListState`], talks to the provider, maps records to cell
//! configurations and broadcasts [`StoreEvent`]s. The state lock is never
//! held across an await, and events are sent only after it is released.

use super::events::{ListSnapshot, StoreEvent};
use super::list_state::{ListState, PageRequest};
use crate::model::{PageError, ReviewId, ReviewsPage};
use crate::provider::ReviewsProvider;
use crate::view_state::cell_config::{make_cell_config, CellHooks, ReviewCellConfig};
use crate::view_state::rating::RatingRenderer;
use crate::view_state::text::Typography;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

struct StoreInner {
    state: Mutex<ListState>,
    provider: Arc<dyn ReviewsProvider>,
    ratings: RatingRenderer,
    typography: Typography,
    events: broadcast::Sender<StoreEvent>,
}

/// Clonable handle to a paged review list.
#[derive(Clone)]
pub struct ReviewListStore {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for ReviewListStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewListStore")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl ReviewListStore {
    /// Store paging through `provider` with `page_size` items per request.
    pub fn new(provider: Arc<dyn ReviewsProvider>, page_size: usize) -> Self {
        Self::with_styles(
            provider,
            page_size,
            RatingRenderer::default(),
            Typography::default(),
        )
    }

    /// Store with explicit rating visuals and typography.
    pub fn with_styles(
        provider: Arc<dyn ReviewsProvider>,
        page_size: usize,
        ratings: RatingRenderer,
        typography: Typography,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(ListState::new(page_size)),
                provider,
                ratings,
                typography,
                events,
            }),
        }
    }

    /// Receive future events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    /// Start loading the next page in the background.
    ///
    /// Returns `None` without contacting the provider when a page is already
    /// in flight or every page has been loaded.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn request_next_page(&self) -> Option<JoinHandle<()>> {
        let request = self.inner.state.lock().begin_load()?;
        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            inner.load(request).await;
        }))
    }

    /// Load the next page inline.
    ///
    /// Returns `true` when a page was merged; `false` when nothing was
    /// requested or the request failed.
    pub async fn load_next_page(&self) -> bool {
        let Some(request) = self.inner.state.lock().begin_load() else {
            return false;
        };
        self.inner.load(request).await
    }

    /// Toggle truncation of the item with `id` and announce the change.
    ///
    /// Unknown ids are ignored. Returns whether an item changed.
    pub fn request_expand(&self, id: ReviewId) -> bool {
        self.inner.expand(id)
    }

    /// Announce that the photos of the item with `id` finished loading.
    pub fn photos_loaded(&self, id: ReviewId) -> bool {
        self.inner.photos_loaded(id)
    }

    /// Number of loaded items.
    pub fn item_count(&self) -> usize {
        self.inner.state.lock().len()
    }

    /// Copy of the item at `index`.
    pub fn item(&self, index: usize) -> Option<ReviewCellConfig> {
        self.inner.state.lock().item(index).cloned()
    }

    /// Copy of every loaded item.
    pub fn items(&self) -> Vec<ReviewCellConfig> {
        self.inner.state.lock().items().to_vec()
    }

    /// Copy of the items from `start` on.
    pub fn items_from(&self, start: usize) -> Vec<ReviewCellConfig> {
        let state = self.inner.state.lock();
        state.items().get(start..).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Position of the item with `id`.
    pub fn position(&self, id: ReviewId) -> Option<usize> {
        self.inner.state.lock().position(id)
    }

    /// Current state summary.
    pub fn snapshot(&self) -> ListSnapshot {
        self.inner.state.lock().snapshot()
    }
}

impl StoreInner {
    async fn load(self: &Arc<Self>, request: PageRequest) -> bool {
        tracing::debug!(
            offset = request.offset,
            limit = request.limit,
            "requesting reviews page"
        );

        match self.fetch_page(request).await {
            Ok(page) => {
                let hooks = self.hooks();
                let items: Vec<ReviewCellConfig> = page
                    .items
                    .iter()
                    .map(|record| {
                        make_cell_config(record, &self.ratings, &self.typography, hooks.clone())
                    })
                    .collect();
                let received = items.len();

                let snapshot = {
                    let mut state = self.state.lock();
                    state.apply_page(request, items, page.count);
                    state.snapshot()
                };

                tracing::info!(
                    offset = request.offset,
                    received,
                    total = page.count,
                    loaded = snapshot.item_count,
                    "reviews page merged"
                );
                self.send(StoreEvent::StateChanged(snapshot));
                true
            }
            Err(err) => {
                self.state.lock().apply_failure();
                tracing::warn!(offset = request.offset, error = %err, "reviews page failed");
                self.send(StoreEvent::LoadFailed {
                    offset: request.offset,
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<ReviewsPage, PageError> {
        let bytes = self
            .provider
            .get_page(request.offset, request.limit)
            .await?;
        Ok(ReviewsPage::from_slice(&bytes)?)
    }

    /// Callbacks routing cell actions back here without keeping the store alive.
    fn hooks(self: &Arc<Self>) -> CellHooks {
        let expand: Weak<Self> = Arc::downgrade(self);
        let photos: Weak<Self> = Arc::downgrade(self);
        CellHooks {
            on_tap_show_more: Arc::new(move |id| {
                if let Some(inner) = expand.upgrade() {
                    inner.expand(id);
                }
            }),
            on_did_load_photos: Arc::new(move |id| {
                if let Some(inner) = photos.upgrade() {
                    inner.photos_loaded(id);
                }
            }),
        }
    }

    fn expand(&self, id: ReviewId) -> bool {
        let toggled = self.state.lock().toggle_expansion(id);
        match toggled {
            Some(index) => {
                tracing::debug!(%id, index, "toggled review expansion");
                self.send(StoreEvent::ItemChanged { id, index });
                true
            }
            None => {
                tracing::debug!(%id, "expand requested for unknown review");
                false
            }
        }
    }

    fn photos_loaded(&self, id: ReviewId) -> bool {
        let position = self.state.lock().position(id);
        match position {
            Some(index) => {
                self.send(StoreEvent::ItemChanged { id, index });
                true
            }
            None => false,
        }
    }

    fn send(&self, event: StoreEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
