//! Fixed geometry of a review cell.

use super::types::{EdgeInsets, Size};

/// Label of the expand control.
pub const SHOW_MORE_TEXT: &str = "Show more...";

/// Geometry constants shared by every review cell.
///
/// Two cells with equal params, width, config and line limit always produce
/// identical frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Insets from the cell edges to its content.
    pub insets: EdgeInsets,
    /// Avatar extent.
    pub avatar_size: Size,
    /// Avatar corner radius.
    pub avatar_corner_radius: f64,
    /// Horizontal gap between avatar and content column.
    pub avatar_to_username_spacing: f64,
    /// Gap below the username.
    pub username_to_rating_spacing: f64,
    /// Gap below the rating when photos follow.
    pub rating_to_photos_spacing: f64,
    /// Gap below the rating when text follows directly.
    pub rating_to_text_spacing: f64,
    /// Photo extent.
    pub photo_size: Size,
    /// Photo corner radius.
    pub photo_corner_radius: f64,
    /// Horizontal gap between photos.
    pub photos_spacing: f64,
    /// Gap below the photo strip.
    pub photos_to_text_spacing: f64,
    /// Gap below the review text.
    pub review_text_to_created_spacing: f64,
    /// Gap below the show-more control.
    pub show_more_to_created_spacing: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            insets: EdgeInsets::new(9.0, 12.0, 9.0, 12.0),
            avatar_size: Size::new(36.0, 36.0),
            avatar_corner_radius: 18.0,
            avatar_to_username_spacing: 10.0,
            username_to_rating_spacing: 6.0,
            rating_to_photos_spacing: 6.0,
            rating_to_text_spacing: 10.0,
            photo_size: Size::new(55.0, 66.0),
            photo_corner_radius: 8.0,
            photos_spacing: 8.0,
            photos_to_text_spacing: 10.0,
            review_text_to_created_spacing: 6.0,
            show_more_to_created_spacing: 6.0,
        }
    }
}

impl LayoutParams {
    /// Width of the text column for a cell `max_width` wide, never negative.
    pub fn content_width(&self, max_width: f64) -> f64 {
        (max_width
            - self.insets.horizontal()
            - self.avatar_size.width
            - self.avatar_to_username_spacing)
            .max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_width_subtracts_insets_and_avatar_column() {
        let params = LayoutParams::default();
        // 375 - 24 - 36 - 10
        assert_eq!(params.content_width(375.0), 305.0);
    }

    #[test]
    fn content_width_clamps_at_zero() {
        let params = LayoutParams::default();
        assert_eq!(params.content_width(40.0), 0.0);
    }

    #[test]
    fn photos_sit_tighter_under_rating_than_text() {
        let params = LayoutParams::default();
        assert!(params.rating_to_photos_spacing < params.rating_to_text_spacing);
    }
}
