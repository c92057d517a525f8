//! Separable convolution for blur, plus fixed 3x3 sharpen/edge kernels.
//!
//! Blur applies a 1-D kernel horizontally then vertically. Out-of-range taps
//! replicate the nearest edge pixel (clamp-to-edge) instead of zero-padding,
//! which avoids dark fringes at the borders. Alpha is convolved exactly like
//! the color channels; the buffer model is non-premultiplied and that
//! behavior is kept as-is.

use rayon::prelude::*;

use crate::buffer::{clamp_channel, PixelBuffer, BYTES_PER_PIXEL};
use crate::error::TransformError;

/// A 1-D convolution kernel of odd length `2 * radius + 1`.
///
/// Blur kernels sum to 1 (brightness preserving); hand-built kernels may
/// sum to anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1d {
    weights: Vec<f64>,
}

impl Kernel1d {
    /// Wrap explicit weights.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedKernel`] unless the length is
    /// odd.
    pub fn new(weights: Vec<f64>) -> Result<Self, TransformError> {
        if weights.is_empty() || weights.len() % 2 == 0 {
            return Err(TransformError::UnsupportedKernel(format!(
                "1-D kernel length must be odd, got {}",
                weights.len()
            )));
        }
        Ok(Self { weights })
    }

    /// The single-tap identity kernel.
    pub fn identity() -> Self {
        Self { weights: vec![1.0] }
    }

    /// Gaussian kernel for the given sigma.
    ///
    /// Radius is `ceil(sigma * 3)`; the density is sampled at integer
    /// offsets and renormalized to sum 1. Non-positive sigma yields the
    /// identity kernel.
    pub fn gaussian(sigma: f64) -> Self {
        if sigma <= 0.0 {
            return Self::identity();
        }
        let radius = (sigma * 3.0).ceil() as i64;
        let mut weights = Vec::with_capacity((2 * radius + 1) as usize);
        let mut sum = 0.0;
        for i in -radius..=radius {
            let x = i as f64;
            let w = (-x * x / (2.0 * sigma * sigma)).exp();
            weights.push(w);
            sum += w;
        }
        for w in &mut weights {
            *w /= sum;
        }
        Self { weights }
    }

    /// Taps on each side of the center.
    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    /// The raw weights, center at index `radius()`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Apply a 1-D kernel separably on both axes.
///
/// A radius-0 kernel with weight 1 is the identity.
pub fn convolve_separable(src: &PixelBuffer, kernel: &Kernel1d) -> PixelBuffer {
    if src.is_empty() {
        return PixelBuffer::empty();
    }
    if kernel.radius() == 0 && kernel.weights[0] == 1.0 {
        return src.clone();
    }
    let horizontal = convolve_axis(src, kernel, Axis::X);
    convolve_axis(&horizontal, kernel, Axis::Y)
}

/// Gaussian blur with the radius derived from sigma.
///
/// Non-positive sigma returns an unchanged copy.
pub fn blur(src: &PixelBuffer, sigma: f64) -> PixelBuffer {
    if sigma <= 0.0 {
        return src.clone();
    }
    convolve_separable(src, &Kernel1d::gaussian(sigma))
}

/// Sharpen with a fixed 3x3 kernel in a single pass.
///
/// The kernel sums to 1, so flat regions pass through unchanged.
pub fn sharpen(src: &PixelBuffer) -> PixelBuffer {
    const KERNEL: [[f64; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];
    convolve_3x3(src, &KERNEL)
}

/// Laplacian edge detection with a fixed 3x3 kernel in a single pass.
///
/// The kernel sums to 0 by design: flat regions go black.
pub fn edge_detect(src: &PixelBuffer) -> PixelBuffer {
    const KERNEL: [[f64; 3]; 3] = [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]];
    convolve_3x3(src, &KERNEL)
}

enum Axis {
    X,
    Y,
}

fn convolve_axis(src: &PixelBuffer, kernel: &Kernel1d, axis: Axis) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, src.height);
    let radius = kernel.radius() as i64;
    let weights = kernel.weights();
    let width = src.width as i64;
    let height = src.height as i64;

    let stride = dst.stride;
    dst.pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let y = y as i64;
            for x in 0..width {
                let mut acc = [0.0f64; BYTES_PER_PIXEL];
                for (k, &weight) in weights.iter().enumerate() {
                    let offset = k as i64 - radius;
                    // Clamp-to-edge boundary policy.
                    let (sx, sy) = match axis {
                        Axis::X => ((x + offset).clamp(0, width - 1), y),
                        Axis::Y => (x, (y + offset).clamp(0, height - 1)),
                    };
                    let s = src.offset(sx as u32, sy as u32);
                    for (c, accum) in acc.iter_mut().enumerate() {
                        *accum += src.pixels[s + c] as f64 * weight;
                    }
                }
                let d = x as usize * BYTES_PER_PIXEL;
                for (c, &value) in acc.iter().enumerate() {
                    dst_row[d + c] = clamp_channel(value);
                }
            }
        });
    dst
}

fn convolve_3x3(src: &PixelBuffer, kernel: &[[f64; 3]; 3]) -> PixelBuffer {
    if src.is_empty() {
        return PixelBuffer::empty();
    }
    let mut dst = PixelBuffer::new(src.width, src.height);
    let width = src.width as i64;
    let height = src.height as i64;

    let stride = dst.stride;
    dst.pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let y = y as i64;
            for x in 0..width {
                let mut acc = [0.0f64; BYTES_PER_PIXEL];
                for (ky, row) in kernel.iter().enumerate() {
                    let sy = (y + ky as i64 - 1).clamp(0, height - 1);
                    for (kx, &weight) in row.iter().enumerate() {
                        let sx = (x + kx as i64 - 1).clamp(0, width - 1);
                        let s = src.offset(sx as u32, sy as u32);
                        for (c, accum) in acc.iter_mut().enumerate() {
                            *accum += src.pixels[s + c] as f64 * weight;
                        }
                    }
                }
                let d = x as usize * BYTES_PER_PIXEL;
                for (c, &value) in acc.iter().enumerate() {
                    dst_row[d + c] = clamp_channel(value);
                }
            }
        });
    dst
}
