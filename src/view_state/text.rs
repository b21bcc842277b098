//! Styled text fragments and text measurement.
//!
//! Cell configurations carry pre-styled fragments so layout never needs to
//! know which font a region uses. Measurement sits behind [`TextMeasurer`]
//! so a host with a real text engine can plug in; [`GlyphMeasurer`] is the
//! built-in fixed-advance implementation used by the CLI and tests.

use super::types::Size;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Font metrics needed for layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Nominal point size.
    pub size: f64,
    /// Height of one line box.
    pub line_height: f64,
    /// Horizontal advance of one display column.
    pub glyph_advance: f64,
}

impl Font {
    /// Create font metrics.
    pub const fn new(size: f64, line_height: f64, glyph_advance: f64) -> Self {
        Self {
            size,
            line_height,
            glyph_advance,
        }
    }
}

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Secondary label gray.
    pub const SECONDARY: Self = Self(142, 142, 147);
    /// Link/action blue.
    pub const ACTION: Self = Self(0, 122, 255);
}

/// Font plus optional foreground color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font metrics.
    pub font: Font,
    /// Foreground color; `None` uses the host default.
    pub color: Option<Color>,
}

impl TextStyle {
    /// Style with the default color.
    pub const fn new(font: Font) -> Self {
        Self { font, color: None }
    }

    /// Same style with an explicit color.
    pub const fn with_color(self, color: Color) -> Self {
        Self {
            font: self.font,
            color: Some(color),
        }
    }
}

/// A string with the style it is rendered in.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    /// Raw text.
    pub text: String,
    /// Rendering style.
    pub style: TextStyle,
}

impl StyledText {
    /// Style `text`.
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Font metrics shortcut.
    pub fn font(&self) -> &Font {
        &self.style.font
    }

    /// Measure with `measurer` at `max_width`, optionally capped at `max_lines`.
    pub fn measure(
        &self,
        measurer: &dyn TextMeasurer,
        max_width: f64,
        max_lines: Option<usize>,
    ) -> Size {
        measurer.bounding_size(&self.text, self.font(), max_width, max_lines)
    }
}

/// Styles used for the regions of a review cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    /// Author name.
    pub username: TextStyle,
    /// Review body.
    pub body: TextStyle,
    /// Creation timestamp.
    pub created: TextStyle,
    /// "Show more" control label.
    pub show_more: TextStyle,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            username: TextStyle::new(Font::new(17.0, 20.0, 9.0)),
            body: TextStyle::new(Font::new(16.0, 20.0, 8.0)),
            created: TextStyle::new(Font::new(13.0, 16.0, 7.0)).with_color(Color::SECONDARY),
            show_more: TextStyle::new(Font::new(16.0, 20.0, 8.0)).with_color(Color::ACTION),
        }
    }
}

/// Text measurement seam.
///
/// Implementations MUST be deterministic: the same inputs always yield the
/// same size. Layout relies on this for frame stability.
pub trait TextMeasurer: Send + Sync {
    /// Height of one line box for `font`.
    fn line_height(&self, font: &Font) -> f64 {
        font.line_height
    }

    /// Bounding box of `text` wrapped at `max_width`.
    ///
    /// `max_lines` of `None` or `Some(0)` means unlimited. Empty text is
    /// zero-sized. The returned width never exceeds `max_width`.
    fn bounding_size(&self, text: &str, font: &Font, max_width: f64, max_lines: Option<usize>)
        -> Size;
}

/// Fixed-advance measurer: every display column is `glyph_advance` wide.
///
/// Wraps greedily at word boundaries; words longer than a line are broken
/// per glyph. Explicit newlines always start a new line. Display columns are
/// counted with `unicode-width`, so wide CJK glyphs take two columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphMeasurer;

impl GlyphMeasurer {
    /// Column width of every wrapped line of `text` at `max_columns`.
    pub fn wrap_columns(text: &str, max_columns: usize) -> Vec<usize> {
        let max_columns = max_columns.max(1);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
            let mut current = 0usize;
            let mut has_content = false;

            for word in paragraph.split(' ') {
                let word_width = word.width();
                let needed = if has_content {
                    current + 1 + word_width
                } else {
                    word_width
                };

                if needed <= max_columns {
                    current = needed;
                    has_content = true;
                    continue;
                }

                if has_content {
                    lines.push(current);
                    current = 0;
                }

                if word_width <= max_columns {
                    current = word_width;
                } else {
                    for ch in word.chars() {
                        let ch_width = ch.width().unwrap_or(0);
                        if current > 0 && current + ch_width > max_columns {
                            lines.push(current);
                            current = 0;
                        }
                        current += ch_width;
                    }
                }
                has_content = true;
            }

            lines.push(current);
        }

        lines
    }
}

impl TextMeasurer for GlyphMeasurer {
    fn bounding_size(
        &self,
        text: &str,
        font: &Font,
        max_width: f64,
        max_lines: Option<usize>,
    ) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }

        let max_width = max_width.max(0.0);
        let advance = font.glyph_advance.max(f64::EPSILON);
        let max_columns = (max_width / advance).floor() as usize;
        let lines = Self::wrap_columns(text, max_columns);

        let shown = match max_lines {
            Some(limit) if limit > 0 => limit.min(lines.len()),
            _ => lines.len(),
        };
        let widest = lines[..shown].iter().copied().max().unwrap_or(0);

        Size::new(
            (widest as f64 * advance).min(max_width),
            shown as f64 * self.line_height(font),
        )
    }
}
