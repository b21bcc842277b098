//! Scroll-distance trigger for loading the next page.

use crate::config::loader::DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE;

/// Decides when a scroll position is close enough to the end of the content
/// to request another page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationTrigger {
    /// Remaining distance, in viewport heights, at which loading starts.
    pub screens_to_load_next_page: f64,
}

impl Default for PaginationTrigger {
    fn default() -> Self {
        Self {
            screens_to_load_next_page: DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE,
        }
    }
}

impl PaginationTrigger {
    /// Trigger firing `screens` viewport heights before the end.
    pub fn new(screens: f64) -> Self {
        Self {
            screens_to_load_next_page: screens,
        }
    }

    /// True when scrolling to `target_offset_y` leaves at most
    /// `screens_to_load_next_page` viewports of content below the viewport.
    pub fn should_load_next_page(
        &self,
        viewport_height: f64,
        content_height: f64,
        target_offset_y: f64,
    ) -> bool {
        let remaining = content_height - viewport_height - target_offset_y;
        remaining <= viewport_height * self.screens_to_load_next_page
    }
}
