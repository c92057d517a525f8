//! The canonical pixel buffer all transforms operate on.
//!
//! Pixels are stored as 8-bit non-premultiplied RGBA in row-major order with
//! an explicit row stride. Every transform in this crate reads one
//! [`PixelBuffer`] and allocates a fresh output buffer; nothing is modified
//! in place, so a source buffer can be shared across concurrent callers.

use crate::error::TransformError;

/// Number of bytes per pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// A single RGBA color with non-premultiplied alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque black, the conventional rotation background.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The color as the byte layout used inside a [`PixelBuffer`].
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Rgba::new(c[0], c[1], c[2], c[3])
    }
}

/// An 8-bit-per-channel RGBA raster with explicit width, height and stride.
///
/// Invariants:
/// - `stride >= width * 4`
/// - `pixels.len() == stride * height`
/// - a zero-area buffer (width or height 0) is valid; transforms map it to
///   another zero-area buffer without sampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Distance in bytes between the starts of consecutive rows.
    pub stride: usize,
    /// Raw RGBA bytes, `stride * height` long.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer with a tight stride (`width * 4`).
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            stride,
            pixels: vec![0; stride * height as usize],
        }
    }

    /// A zero-area buffer. All transforms return this for zero-area input.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Wrap existing bytes, validating the stride/length invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidDimension`] if the stride is smaller
    /// than a row or the byte length does not match `stride * height`.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, TransformError> {
        if stride < width as usize * BYTES_PER_PIXEL {
            return Err(TransformError::InvalidDimension(format!(
                "stride {} is smaller than row length {}",
                stride,
                width as usize * BYTES_PER_PIXEL
            )));
        }
        if pixels.len() != stride * height as usize {
            return Err(TransformError::InvalidDimension(format!(
                "expected {} bytes (stride * height), got {}",
                stride * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    /// Wrap tightly packed RGBA bytes (`width * height * 4` long).
    pub fn from_vec(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TransformError> {
        Self::from_raw(width, height, width as usize * BYTES_PER_PIXEL, pixels)
    }

    /// True if the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte offset of pixel (x, y).
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        y as usize * self.stride + x as usize * BYTES_PER_PIXEL
    }

    /// The four channel bytes of pixel (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite pixel (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&value);
    }

    /// The visible bytes of row y (`width * 4` long, stride padding excluded).
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Mutable visible bytes of row y.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * BYTES_PER_PIXEL;
        &mut self.pixels[start..end]
    }

    /// Copy into a tightly packed byte vector, dropping stride padding.
    pub fn to_packed(&self) -> Vec<u8> {
        if self.stride == self.width as usize * BYTES_PER_PIXEL {
            return self.pixels.clone();
        }
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * BYTES_PER_PIXEL);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

/// Convert an accumulated channel value to a byte: clamp to [0, 255], then
/// round half up. Golden test bytes depend on this exact rule.
#[inline]
pub(crate) fn clamp_channel(v: f64) -> u8 {
    (v.clamp(0.0, 255.0) + 0.5) as u8
}
