//! Tests for review cell layout.

use super::*;
use crate::model::{Rating, ReviewRecord};
use crate::view_state::cell_config::{make_cell_config, CellHooks, ReviewCellConfig};
use crate::view_state::rating::RatingRenderer;
use crate::view_state::text::{GlyphMeasurer, Typography};
use crate::view_state::types::Size;

// Default typography: body text advances 8pt per column, 20pt lines.
// At 375pt the content column is 305pt wide, i.e. 38 body columns, which
// fits 7 four-letter words per line.
const WIDTH: f64 = 375.0;

fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

fn photos(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://img.example.com/{i}.jpg"))
        .collect()
}

fn config(text: &str, photo_urls: Vec<String>) -> ReviewCellConfig {
    let record = ReviewRecord {
        avatar_url: Some("https://img.example.com/avatar.jpg".to_string()),
        photos_urls: photo_urls,
        first_name: "Ivan".to_string(),
        last_name: "Ivanov".to_string(),
        text: text.to_string(),
        rating: Rating::saturating(5),
        created: "2 days ago".to_string(),
    };
    make_cell_config(
        &record,
        &RatingRenderer::default(),
        &Typography::default(),
        CellHooks::noop(),
    )
}

fn frames(config: &ReviewCellConfig) -> CellFrames {
    config.frames(WIDTH, &LayoutParams::default(), &GlyphMeasurer)
}

#[test]
fn short_text_without_photos() {
    let frames = frames(&config("Short", Vec::new()));

    assert_eq!(frames.avatar, Rect::new(Point::new(12.0, 9.0), Size::new(36.0, 36.0)));
    assert_eq!(frames.username.origin, Point::new(58.0, 9.0));
    assert_eq!(frames.rating.origin.y, 35.0);
    assert!(frames.photos.is_empty());
    assert_eq!(
        frames.text,
        Some(Rect::new(Point::new(58.0, 61.0), Size::new(40.0, 20.0)))
    );
    assert_eq!(frames.show_more, None);
    assert_eq!(frames.created.origin.y, 87.0);
    assert_eq!(frames.height, 112.0);
}

#[test]
fn five_photos_and_long_text_show_expand_control() {
    let config = config(&words(100), photos(5));
    let frames = frames(&config);

    assert_eq!(frames.photos.len(), 5);
    assert_eq!(frames.photos[0].origin, Point::new(58.0, 57.0));
    assert_eq!(frames.photos[4].origin.x, 58.0 + 4.0 * 63.0);
    // The strip is wider than the column and is allowed to overflow.
    assert!(frames.photos[4].max_x() > WIDTH - 12.0);

    let text = frames.text.expect("text frame");
    assert_eq!(text.origin.y, 133.0);
    assert_eq!(text.size.height, 60.0, "capped at three lines");

    let show_more = frames.show_more.expect("expand control");
    assert_eq!(show_more.origin.y, 199.0);
    assert!(frames.needs_expand());
    assert_eq!(frames.created.origin.y, 225.0);
    assert_eq!(frames.height, 250.0);
}

#[test]
fn two_line_text_omits_expand_control() {
    let frames = frames(&config(&words(10), Vec::new()));

    assert_eq!(frames.text.map(|t| t.size.height), Some(40.0));
    assert_eq!(frames.show_more, None);
    assert_eq!(frames.height, 132.0);
}

#[test]
fn text_exactly_at_limit_is_not_truncated() {
    let frames = frames(&config(&words(21), Vec::new()));

    assert_eq!(frames.text.map(|t| t.size.height), Some(60.0));
    assert!(!frames.needs_expand());
}

#[test]
fn expanded_text_shows_every_line() {
    let mut config = config(&words(100), photos(5));
    config.layout.toggle_expansion();
    let frames = frames(&config);

    assert_eq!(frames.text.map(|t| t.size.height), Some(300.0));
    assert_eq!(frames.show_more, None);
    assert_eq!(frames.height, 464.0);
}

#[test]
fn toggling_twice_restores_layout() {
    let mut config = config(&words(100), Vec::new());
    let collapsed = frames(&config);

    config.layout.toggle_expansion();
    assert!(config.layout.is_expanded());
    let expanded = frames(&config);
    assert!(expanded.height > collapsed.height);

    config.layout.toggle_expansion();
    assert_eq!(config.layout.line_limit, DEFAULT_LINE_LIMIT);
    assert_eq!(frames(&config), collapsed);
}

#[test]
fn layout_is_deterministic() {
    let config = config(&words(40), photos(2));
    assert_eq!(frames(&config), frames(&config));
}

#[test]
fn empty_text_goes_straight_to_created() {
    let frames = frames(&config("", Vec::new()));

    assert_eq!(frames.text, None);
    assert_eq!(frames.show_more, None);
    // rating ends at 51, then rating-to-text spacing
    assert_eq!(frames.created.origin.y, 61.0);
}

#[test]
fn photos_use_tighter_rating_spacing() {
    let with_photos = frames(&config("Short", photos(1)));
    let without = frames(&config("Short", Vec::new()));

    let gap_photos = with_photos.photos[0].min_y() - with_photos.rating.max_y();
    let gap_text = without.text.map(|t| t.min_y()).unwrap_or_default() - without.rating.max_y();
    assert!(gap_photos < gap_text);
}

#[test]
fn custom_line_limit_caps_text() {
    let mut config = config(&words(100), Vec::new());
    config.layout.line_limit = 5;
    let frames = frames(&config);

    assert_eq!(frames.text.map(|t| t.size.height), Some(100.0));
    assert!(frames.needs_expand());
}

#[test]
fn degenerate_width_does_not_panic() {
    let config = config(&words(5), photos(2));
    let frames = config.frames(10.0, &LayoutParams::default(), &GlyphMeasurer);

    assert!(frames.height > 0.0);
    assert!(frames.username.size.width <= 0.0);
}

#[test]
fn regions_stack_top_to_bottom() {
    let frames = frames(&config(&words(100), photos(3)));

    let text = frames.text.expect("text");
    let show_more = frames.show_more.expect("show more");
    assert!(frames.username.max_y() <= frames.rating.min_y());
    assert!(frames.rating.max_y() <= frames.photos[0].min_y());
    assert!(frames.photos[0].max_y() <= text.min_y());
    assert!(text.max_y() <= show_more.min_y());
    assert!(show_more.max_y() <= frames.created.min_y());
    assert!(frames.created.max_y() < frames.height);
}

#[test]
fn empty_name_keeps_one_username_line() {
    let mut config = config("Short", Vec::new());
    config.username.text.clear();
    let frames = frames(&config);

    assert_eq!(frames.username.size, Size::new(0.0, 20.0));
    assert_eq!(frames.rating.origin.y, 35.0);
    assert_eq!(frames.height, 112.0);
}
