//! Cached image value.

use crate::model::ImageError;
use image::{DynamicImage, GenericImageView};
use std::fmt;
use std::sync::Arc;

/// Encoded bytes plus their decoded pixels.
///
/// Cheap to clone: both halves are shared. The encoded bytes are what the
/// disk tier stores; the decoded pixels are what a host draws.
#[derive(Clone)]
pub struct Image {
    encoded: Arc<[u8]>,
    decoded: Arc<DynamicImage>,
}

impl Image {
    /// Decode `bytes` (PNG or JPEG).
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Decode` when the bytes are not a supported image.
    pub fn decode(bytes: impl Into<Arc<[u8]>>) -> Result<Self, ImageError> {
        let encoded = bytes.into();
        let decoded =
            image::load_from_memory(&encoded).map_err(|err| ImageError::Decode(err.to_string()))?;
        Ok(Self {
            encoded,
            decoded: Arc::new(decoded),
        })
    }

    /// Original encoded bytes.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Shared handle to the encoded bytes.
    pub(crate) fn encoded_shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.encoded)
    }

    /// Decoded pixels.
    pub fn decoded(&self) -> &DynamicImage {
        &self.decoded
    }

    /// Pixel dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.decoded.dimensions()
    }

    /// Memory-tier cost: decoded pixel bytes plus encoded length.
    pub fn cost(&self) -> usize {
        self.decoded.as_bytes().len() + self.encoded.len()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("Image")
            .field("width", &width)
            .field("height", &height)
            .field("encoded_len", &self.encoded.len())
            .finish()
    }
}

/// PNG bytes of a solid `width`×`height` RGBA image, for tests.
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 80, 40, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
