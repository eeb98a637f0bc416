use image::{GrayImage, ImageBuffer, ImageFormat, Rgb, RgbImage};

use crate::error::{ImageError, Result};

/// Decoded, in-memory raster
///
/// Always 8-bit RGB. Single-channel intermediates are `GrayImage`s and only
/// enter or leave a grid through [`PixelGrid::to_gray`] and
/// [`PixelGrid::from_gray`].
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    buffer: RgbImage,
}

impl PixelGrid {
    /// Number of channels held by every grid
    pub const CHANNELS: usize = 3;

    /// Wrap an RGB buffer, rejecting zero-sized rasters
    pub fn new(buffer: RgbImage) -> Result<Self> {
        if buffer.width() == 0 || buffer.height() == 0 {
            return Err(ImageError::DecodeFailed {
                reason: format!("empty raster ({}x{})", buffer.width(), buffer.height()),
            }
            .into());
        }
        Ok(Self { buffer })
    }

    /// Create a grid filled with a single color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Result<Self> {
        Self::new(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    /// Create a grid from raw interleaved RGB bytes
    pub fn from_rgb_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let buffer = ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
            ImageError::DecodeFailed {
                reason: format!("buffer does not hold {}x{} RGB pixels", width, height),
            }
        })?;
        Self::new(buffer)
    }

    /// Replicate a single-channel image into all three channels
    pub fn from_gray(gray: &GrayImage) -> Result<Self> {
        Self::new(crate::filters::color::gray_to_rgb(gray))
    }

    /// Convert to grayscale using ITU-R BT.601 luma weights
    pub fn to_gray(&self) -> GrayImage {
        crate::filters::color::rgb_to_gray(&self.buffer)
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn channels(&self) -> usize {
        Self::CHANNELS
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Consume the grid, returning the underlying buffer
    pub fn into_image(self) -> RgbImage {
        self.buffer
    }
}

/// Encoded image bytes as received from, or returned to, a caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Format inferred from the leading magic bytes, if recognizable
    pub fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for EncodedImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for EncodedImage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
