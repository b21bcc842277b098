//! Display-ready projection of a review.
//!
//! [`make_cell_config`] is the single mapping from wire records to cell
//! configurations. A config is created when its page arrives and afterwards
//! only its [`ReviewCellLayout`] changes, through the expand command.

use super::layout::{CellFrames, ReviewCellLayout};
use super::layout_params::{LayoutParams, SHOW_MORE_TEXT};
use super::rating::{RatingImage, RatingRenderer};
use super::text::{StyledText, TextMeasurer, Typography};
use crate::image_cache::{Image, ImageCache};
use crate::model::{ReviewId, ReviewRecord};
use std::fmt;
use std::sync::Arc;

/// Hook invoked with the id of the cell that fired it.
pub type ReviewCallback = Arc<dyn Fn(ReviewId) + Send + Sync>;

/// Callbacks wired into every cell configuration.
#[derive(Clone)]
pub struct CellHooks {
    /// User tapped "Show more...".
    pub on_tap_show_more: ReviewCallback,
    /// The cell's photos finished loading.
    pub on_did_load_photos: ReviewCallback,
}

impl CellHooks {
    /// Hooks that do nothing.
    pub fn noop() -> Self {
        Self {
            on_tap_show_more: Arc::new(|_| {}),
            on_did_load_photos: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for CellHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellHooks").finish_non_exhaustive()
    }
}

/// Avatar to draw for a cell.
#[derive(Debug, Clone)]
pub enum Avatar {
    /// Image resolved through the cache.
    Loaded(Image),
    /// No URL, or the image could not be resolved.
    Placeholder,
}

/// Everything a cell needs to render one review.
#[derive(Debug, Clone)]
pub struct ReviewCellConfig {
    /// Stable identity used for targeted updates.
    pub id: ReviewId,
    /// Avatar URL, if the author has one.
    pub avatar_url: Option<String>,
    /// Author full name.
    pub username: StyledText,
    /// Rating token.
    pub rating: RatingImage,
    /// Photo URLs in display order.
    pub photo_urls: Vec<String>,
    /// Review body.
    pub text: StyledText,
    /// Expand control label.
    pub show_more: StyledText,
    /// Creation timestamp as received.
    pub created: StyledText,
    /// Truncation state.
    pub layout: ReviewCellLayout,
    /// Callbacks back into the owner of the list.
    pub hooks: CellHooks,
}

/// Map a wire record to a cell configuration with a fresh id.
pub fn make_cell_config(
    record: &ReviewRecord,
    ratings: &RatingRenderer,
    typography: &Typography,
    hooks: CellHooks,
) -> ReviewCellConfig {
    ReviewCellConfig {
        id: ReviewId::new(),
        avatar_url: record.avatar_url.clone(),
        username: StyledText::new(record.full_name(), typography.username),
        rating: ratings.image(record.rating),
        photo_urls: record.photos_urls.clone(),
        text: StyledText::new(record.text.clone(), typography.body),
        show_more: StyledText::new(SHOW_MORE_TEXT, typography.show_more),
        created: StyledText::new(record.created.clone(), typography.created),
        layout: ReviewCellLayout::default(),
        hooks,
    }
}

impl ReviewCellConfig {
    /// Frames at `max_width` with the current truncation state.
    pub fn frames(
        &self,
        max_width: f64,
        params: &LayoutParams,
        measurer: &dyn TextMeasurer,
    ) -> CellFrames {
        self.layout.frames(self, max_width, params, measurer)
    }

    /// Cell height at `max_width` with the current truncation state.
    pub fn height(&self, max_width: f64, params: &LayoutParams, measurer: &dyn TextMeasurer) -> f64 {
        self.layout.height(self, max_width, params, measurer)
    }

    /// Fire the show-more hook.
    pub fn tap_show_more(&self) {
        (self.hooks.on_tap_show_more)(self.id);
    }

    /// Resolve every photo through `cache`, then fire the photos-loaded hook.
    ///
    /// Photos that fail to resolve are skipped. The hook does not fire for a
    /// cell without photos.
    pub async fn load_photos(&self, cache: &ImageCache) -> Vec<Image> {
        if self.photo_urls.is_empty() {
            return Vec::new();
        }

        let images = cache.fetch_many(&self.photo_urls).await;
        tracing::debug!(
            id = %self.id,
            requested = self.photo_urls.len(),
            loaded = images.len(),
            "photos loaded"
        );
        (self.hooks.on_did_load_photos)(self.id);
        images
    }

    /// Resolve the avatar, falling back to the placeholder.
    pub async fn load_avatar(&self, cache: &ImageCache) -> Avatar {
        let Some(url) = self.avatar_url.as_deref() else {
            return Avatar::Placeholder;
        };

        match cache.fetch(url).await {
            Some(image) => Avatar::Loaded(image),
            None => Avatar::Placeholder,
        }
    }
}
