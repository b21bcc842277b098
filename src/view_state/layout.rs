//! Review cell layout.
//!
//! Frames are a pure function of (config, max width, line limit, params):
//! nothing here touches the store, the image cache or the clock, so heights
//! can be computed off the presentation thread and cached by row.

use super::cell_config::ReviewCellConfig;
use super::layout_params::LayoutParams;
use super::text::TextMeasurer;
use super::types::{Point, Rect, Size};

/// Lines shown before the review text is truncated.
pub const DEFAULT_LINE_LIMIT: usize = 3;

/// Mutable truncation state of one cell.
///
/// A `line_limit` of 0 means the text is shown in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewCellLayout {
    /// Visible text lines; 0 is unlimited.
    pub line_limit: usize,
}

impl Default for ReviewCellLayout {
    fn default() -> Self {
        Self {
            line_limit: DEFAULT_LINE_LIMIT,
        }
    }
}

impl ReviewCellLayout {
    /// Flip between truncated and full text.
    pub fn toggle_expansion(&mut self) {
        self.line_limit = if self.line_limit == 0 {
            DEFAULT_LINE_LIMIT
        } else {
            0
        };
    }

    /// True when the text is shown in full.
    pub fn is_expanded(&self) -> bool {
        self.line_limit == 0
    }

    /// `max_lines` argument for the text measurer.
    fn max_lines(&self) -> Option<usize> {
        (self.line_limit > 0).then_some(self.line_limit)
    }

    /// Compute every frame of `config` laid out in a cell `max_width` wide.
    ///
    /// Regions stack top to bottom in the content column right of the
    /// avatar. Photos never wrap: a strip wider than the column overflows.
    pub fn frames(
        &self,
        config: &ReviewCellConfig,
        max_width: f64,
        params: &LayoutParams,
        measurer: &dyn TextMeasurer,
    ) -> CellFrames {
        let content_width = params.content_width(max_width);

        let avatar = Rect::new(
            Point::new(params.insets.left, params.insets.top),
            params.avatar_size,
        );
        let content_x = avatar.max_x() + params.avatar_to_username_spacing;
        let mut y = params.insets.top;

        // Always one line tall, even for an empty name.
        let username_size = config.username.measure(measurer, content_width, Some(1));
        let username = Rect::new(
            Point::new(content_x, y),
            Size::new(
                username_size.width,
                measurer.line_height(config.username.font()),
            ),
        );
        y = username.max_y() + params.username_to_rating_spacing;

        let rating = Rect::new(Point::new(content_x, y), config.rating.size);
        y = rating.max_y()
            + if config.photo_urls.is_empty() {
                params.rating_to_text_spacing
            } else {
                params.rating_to_photos_spacing
            };

        let photo_step = params.photo_size.width + params.photos_spacing;
        let photos: Vec<Rect> = (0..config.photo_urls.len())
            .map(|i| {
                Rect::new(
                    Point::new(content_x + i as f64 * photo_step, y),
                    params.photo_size,
                )
            })
            .collect();
        if let Some(last) = photos.last() {
            y = last.max_y() + params.photos_to_text_spacing;
        }

        let mut text = None;
        let mut show_more = None;
        if !config.text.is_empty() {
            let line_height = measurer.line_height(config.text.font());
            let constrained_height = line_height * self.line_limit as f64;
            let unconstrained_height = config.text.measure(measurer, content_width, None).height;
            let needs_expand = self.line_limit != 0 && unconstrained_height > constrained_height;

            let frame = Rect::new(
                Point::new(content_x, y),
                config
                    .text
                    .measure(measurer, content_width, self.max_lines()),
            );
            y = frame.max_y() + params.review_text_to_created_spacing;
            text = Some(frame);

            if needs_expand {
                let frame = Rect::new(
                    Point::new(content_x, y),
                    config.show_more.measure(measurer, content_width, Some(1)),
                );
                y = frame.max_y() + params.show_more_to_created_spacing;
                show_more = Some(frame);
            }
        }

        let created = Rect::new(
            Point::new(content_x, y),
            config.created.measure(measurer, content_width, None),
        );
        let height = created.max_y() + params.insets.bottom;

        CellFrames {
            avatar,
            username,
            rating,
            photos,
            text,
            show_more,
            created,
            height,
        }
    }

    /// Total cell height; shorthand for `frames(..).height`.
    pub fn height(
        &self,
        config: &ReviewCellConfig,
        max_width: f64,
        params: &LayoutParams,
        measurer: &dyn TextMeasurer,
    ) -> f64 {
        self.frames(config, max_width, params, measurer).height
    }
}

/// Frames of every region of a laid-out cell, in cell coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFrames {
    /// Avatar image.
    pub avatar: Rect,
    /// Author name.
    pub username: Rect,
    /// Rating strip.
    pub rating: Rect,
    /// One frame per photo URL, left to right.
    pub photos: Vec<Rect>,
    /// Review text; `None` when the text is empty.
    pub text: Option<Rect>,
    /// Expand control; present only when the text is truncated.
    pub show_more: Option<Rect>,
    /// Creation timestamp.
    pub created: Rect,
    /// Total cell height including the bottom inset.
    pub height: f64,
}

impl CellFrames {
    /// True when the text overflows its line limit.
    pub fn needs_expand(&self) -> bool {
        self.show_more.is_some()
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
