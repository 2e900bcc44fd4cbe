use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::FilterError;

/// Number of color channels in every raster this crate handles
pub const CHANNELS: usize = 3;

/// A decoded still image: 8-bit RGB, row-major, no alpha
///
/// This is a thin wrapper around an `image::RgbImage`. The wrapper may hold a
/// zero-sized buffer; the filter rejects such images before touching them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    buffer: RgbImage,
}

impl RasterImage {
    /// Wrap an existing RGB buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create an image with every pixel set to `color`
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Build an image from interleaved raw bytes
    ///
    /// `channels` describes the layout of `data`; anything other than three
    /// interleaved channels is rejected, as is a buffer whose length does not
    /// match `width * height * channels`.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, FilterError> {
        if channels != CHANNELS {
            return Err(FilterError::InvalidInput {
                reason: format!("expected {} color channels, got {}", CHANNELS, channels),
            });
        }

        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(FilterError::InvalidInput {
                reason: format!(
                    "{}x{} image needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    data.len()
                ),
            });
        }

        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
            .ok_or_else(|| FilterError::InvalidInput {
                reason: "raw buffer does not match image dimensions".to_string(),
            })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Interleaved RGB bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    pub fn into_image(self) -> RgbImage {
        self.buffer
    }

    /// Reject images the filter cannot process
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(FilterError::InvalidInput {
                reason: format!(
                    "image must be at least 1x1, got {}x{}",
                    self.width(),
                    self.height()
                ),
            });
        }
        Ok(())
    }
}

impl From<RgbImage> for RasterImage {
    fn from(buffer: RgbImage) -> Self {
        Self::new(buffer)
    }
}

/// The same pixel grid expressed as (lightness, chroma a, chroma b)
///
/// Channels use the 8-bit Lab convention: lightness spans 0..=255 and both
/// chroma channels are offset by 128. Values stay in `f32` so that a
/// conversion round trip only rounds once.
#[derive(Clone, Debug)]
pub(crate) struct LabImage {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl LabImage {
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn pixels(&self) -> &[[f32; 3]] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.pixels
    }
}

/// Allocate a buffer of `len` copies of `fill`, reporting failure instead of aborting
pub(crate) fn try_filled<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, FilterError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| FilterError::AllocationFailure {
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    buffer.resize(len, fill);
    Ok(buffer)
}
