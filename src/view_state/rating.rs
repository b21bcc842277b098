//! Star rating visuals.
//!
//! Ratings are rendered once per value and shared by every cell; the layout
//! engine only needs the size, the host draws the glyphs.

use super::types::Size;
use crate::model::Rating;
use std::sync::Arc;

/// Number of stars in a rating strip.
pub const STAR_COUNT: usize = 5;

/// Star geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingParams {
    /// Edge length of one star.
    pub star_size: f64,
    /// Gap between adjacent stars.
    pub spacing: f64,
    /// Glyph for a filled star.
    pub filled: char,
    /// Glyph for an empty star.
    pub empty: char,
}

impl Default for RatingParams {
    fn default() -> Self {
        Self {
            star_size: 16.0,
            spacing: 2.0,
            filled: '★',
            empty: '☆',
        }
    }
}

impl RatingParams {
    /// Size of the full strip.
    pub fn strip_size(&self) -> Size {
        let count = STAR_COUNT as f64;
        Size::new(
            count * self.star_size + (count - 1.0) * self.spacing,
            self.star_size,
        )
    }
}

/// Pre-rendered rating token carried by a cell configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingImage {
    /// Number of filled stars (0..=5).
    pub rating: u8,
    /// Strip extent.
    pub size: Size,
    /// Text rendering, e.g. `★★★☆☆`.
    pub glyphs: String,
}

/// Renders and memoizes one [`RatingImage`] per rating value.
#[derive(Debug, Clone)]
pub struct RatingRenderer {
    params: RatingParams,
    images: Arc<[RatingImage]>,
}

impl Default for RatingRenderer {
    fn default() -> Self {
        Self::new(RatingParams::default())
    }
}

impl RatingRenderer {
    /// Pre-render images for every value from 0 to [`STAR_COUNT`].
    pub fn new(params: RatingParams) -> Self {
        let size = params.strip_size();
        let images = (0..=STAR_COUNT)
            .map(|filled| RatingImage {
                rating: filled as u8,
                size,
                glyphs: std::iter::repeat(params.filled)
                    .take(filled)
                    .chain(std::iter::repeat(params.empty).take(STAR_COUNT - filled))
                    .collect(),
            })
            .collect();

        Self { params, images }
    }

    /// Geometry used for rendering.
    pub fn params(&self) -> &RatingParams {
        &self.params
    }

    /// Image for `rating`.
    pub fn image(&self, rating: Rating) -> RatingImage {
        let index = usize::from(rating.get()).min(STAR_COUNT);
        self.images[index].clone()
    }
}
