//! Image encoding from a [`PixelBuffer`] into container bytes.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::{map_image_error, CodecError, Format};
use crate::buffer::{PixelBuffer, BYTES_PER_PIXEL};

/// PNG compression level selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
}

impl PngCompression {
    fn to_image(self) -> png::CompressionType {
        match self {
            PngCompression::Default => png::CompressionType::Default,
            PngCompression::Fast => png::CompressionType::Fast,
            PngCompression::Best => png::CompressionType::Best,
        }
    }
}

/// Format-specific encoding knobs.
///
/// Formats ignore options that do not apply to them.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct EncodeOptions {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// PNG compression level.
    pub png_compression: PngCompression,
    /// GIF palette size, 2-256.
    pub gif_palette_size: u16,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            png_compression: PngCompression::Default,
            gif_palette_size: 256,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn png_compression(mut self, compression: PngCompression) -> Self {
        self.png_compression = compression;
        self
    }

    pub fn gif_palette_size(mut self, colors: u16) -> Self {
        self.gif_palette_size = colors;
        self
    }
}

/// Encode a pixel buffer into the given container format.
///
/// JPEG has no alpha channel; the alpha plane is dropped for it. All other
/// formats receive the RGBA bytes as-is.
///
/// # Errors
///
/// Returns [`CodecError::InvalidDimensions`] for a zero-area image and
/// [`CodecError::CorruptData`] / [`CodecError::UnsupportedFormat`] for
/// encoder failures.
pub fn encode(
    img: &PixelBuffer,
    format: Format,
    opts: &EncodeOptions,
) -> Result<Vec<u8>, CodecError> {
    if img.is_empty() {
        return Err(CodecError::InvalidDimensions {
            width: img.width,
            height: img.height,
        });
    }

    let packed = img.to_packed();
    let mut out = Cursor::new(Vec::new());

    match format {
        Format::Jpeg => {
            let rgb = drop_alpha(&packed);
            let quality = opts.jpeg_quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut out, quality)
                .write_image(&rgb, img.width, img.height, ExtendedColorType::Rgb8)
                .map_err(map_image_error)?;
        }
        Format::Png => {
            PngEncoder::new_with_quality(
                &mut out,
                opts.png_compression.to_image(),
                png::FilterType::Adaptive,
            )
            .write_image(&packed, img.width, img.height, ExtendedColorType::Rgba8)
            .map_err(map_image_error)?;
        }
        Format::Gif => {
            let colors = opts.gif_palette_size.clamp(2, 256);
            let data = if colors < 256 {
                quantize_palette(&packed, colors as usize)
            } else {
                packed
            };
            image::write_buffer_with_format(
                &mut out,
                &data,
                img.width,
                img.height,
                ExtendedColorType::Rgba8,
                image::ImageFormat::Gif,
            )
            .map_err(map_image_error)?;
        }
        Format::Bmp | Format::Tiff => {
            image::write_buffer_with_format(
                &mut out,
                &packed,
                img.width,
                img.height,
                ExtendedColorType::Rgba8,
                format.image_format(),
            )
            .map_err(map_image_error)?;
        }
    }

    Ok(out.into_inner())
}

/// Remap tightly packed RGBA bytes onto a NeuQuant palette of at most
/// `colors` entries, so the GIF encoder sees pre-reduced color data.
fn quantize_palette(rgba: &[u8], colors: usize) -> Vec<u8> {
    let quantizer = color_quant::NeuQuant::new(10, colors, rgba);
    let palette = quantizer.color_map_rgba();
    let mut out = Vec::with_capacity(rgba.len());
    for pixel in rgba.chunks_exact(BYTES_PER_PIXEL) {
        let i = quantizer.index_of(pixel) * BYTES_PER_PIXEL;
        out.extend_from_slice(&palette[i..i + BYTES_PER_PIXEL]);
    }
    out
}

/// Strip the alpha plane from tightly packed RGBA bytes.
fn drop_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / BYTES_PER_PIXEL * 3);
    for pixel in rgba.chunks_exact(BYTES_PER_PIXEL) {
        rgb.extend_from_slice(&pixel[..3]);
    }
    rgb
}
