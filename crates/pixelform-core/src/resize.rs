//! Separable two-pass resize engine.
//!
//! Scaling runs as two independent 1-D passes, horizontal then vertical (the
//! order is fixed so results are deterministic). For every output index the
//! engine precomputes the contributing source taps and their renormalized
//! kernel weights once per axis, then applies them to each row or column.
//! When minifying, the tap radius grows by the downscale factor so the
//! kernel acts as an anti-aliasing filter.

use rayon::prelude::*;

use crate::buffer::{clamp_channel, PixelBuffer, BYTES_PER_PIXEL};
use crate::error::TransformError;
use crate::resample::ResampleKernel;

/// One source tap contributing to an output pixel.
#[derive(Debug, Clone, Copy)]
struct Tap {
    index: usize,
    weight: f64,
}

/// Resize to the target dimensions with the given kernel.
///
/// Exactly one of `target_w` / `target_h` may be 0, meaning "derive from the
/// other, preserving aspect ratio". A target equal to the source size on an
/// axis copies that axis through unchanged. Alpha is resampled exactly like
/// the color channels (non-premultiplied).
///
/// # Errors
///
/// Returns [`TransformError::InvalidDimension`] if both targets are 0.
pub fn resize(
    src: &PixelBuffer,
    target_w: u32,
    target_h: u32,
    kernel: ResampleKernel,
) -> Result<PixelBuffer, TransformError> {
    if target_w == 0 && target_h == 0 {
        return Err(TransformError::InvalidDimension(
            "both target dimensions are zero".to_string(),
        ));
    }
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }

    let (dst_w, dst_h) = derive_targets(src.width, src.height, target_w, target_h);

    if dst_w == src.width && dst_h == src.height {
        return Ok(src.clone());
    }

    let mut out = if dst_w == src.width {
        src.clone()
    } else {
        resize_horizontal(src, dst_w, &kernel)
    };
    if dst_h != src.height {
        out = resize_vertical(&out, dst_h, &kernel);
    }
    Ok(out)
}

/// Fill in a zero target from the other axis, preserving aspect ratio.
fn derive_targets(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    if target_w == 0 {
        let w = (target_h as f64 * src_w as f64 / src_h as f64).round() as u32;
        (w.max(1), target_h)
    } else if target_h == 0 {
        let h = (target_w as f64 * src_h as f64 / src_w as f64).round() as u32;
        (target_w, h.max(1))
    } else {
        (target_w, target_h)
    }
}

/// Precompute the tap list for every output index along one axis.
///
/// Tap indexes falling outside the source are clamped to the nearest edge
/// pixel (never wrapped), and each tap set is renormalized to sum 1 so
/// boundary pixels neither gain nor lose energy.
fn precompute_taps(dst_size: u32, src_size: u32, kernel: &ResampleKernel) -> Vec<Vec<Tap>> {
    let ratio = src_size as f64 / dst_size as f64;
    let scale = ratio.max(1.0);
    let radius = (scale * kernel.support()).ceil();

    let mut all = Vec::with_capacity(dst_size as usize);
    for u in 0..dst_size {
        let center = (u as f64 + 0.5) * ratio - 0.5;
        let begin = (center - radius).ceil() as i64;
        let end = (center + radius).floor() as i64;

        let mut taps = Vec::with_capacity((end - begin + 1).max(0) as usize);
        let mut sum = 0.0;
        for i in begin..=end {
            let weight = kernel.weight((i as f64 - center) / scale);
            if weight != 0.0 {
                sum += weight;
                let index = i.clamp(0, src_size as i64 - 1) as usize;
                taps.push(Tap { index, weight });
            }
        }
        if sum != 0.0 {
            for tap in &mut taps {
                tap.weight /= sum;
            }
        }
        all.push(taps);
    }
    all
}

/// Nearest source index for each output index (support-0 fast path).
fn nearest_indexes(dst_size: u32, src_size: u32) -> Vec<usize> {
    let ratio = src_size as f64 / dst_size as f64;
    (0..dst_size)
        .map(|u| {
            let i = ((u as f64 + 0.5) * ratio).floor() as i64;
            i.clamp(0, src_size as i64 - 1) as usize
        })
        .collect()
}

fn resize_horizontal(src: &PixelBuffer, dst_w: u32, kernel: &ResampleKernel) -> PixelBuffer {
    let mut dst = PixelBuffer::new(dst_w, src.height);

    if kernel.support() <= 0.0 {
        let indexes = nearest_indexes(dst_w, src.width);
        let stride = dst.stride;
        dst.pixels
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, dst_row)| {
                let src_row = src.row(y as u32);
                for (x, &si) in indexes.iter().enumerate() {
                    let d = x * BYTES_PER_PIXEL;
                    let s = si * BYTES_PER_PIXEL;
                    dst_row[d..d + BYTES_PER_PIXEL]
                        .copy_from_slice(&src_row[s..s + BYTES_PER_PIXEL]);
                }
            });
        return dst;
    }

    let taps = precompute_taps(dst_w, src.width, kernel);
    let stride = dst.stride;
    dst.pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_row = src.row(y as u32);
            for (x, taps) in taps.iter().enumerate() {
                let mut acc = [0.0f64; BYTES_PER_PIXEL];
                for tap in taps {
                    let s = tap.index * BYTES_PER_PIXEL;
                    for (c, accum) in acc.iter_mut().enumerate() {
                        *accum += src_row[s + c] as f64 * tap.weight;
                    }
                }
                let d = x * BYTES_PER_PIXEL;
                for (c, &value) in acc.iter().enumerate() {
                    dst_row[d + c] = clamp_channel(value);
                }
            }
        });
    dst
}

fn resize_vertical(src: &PixelBuffer, dst_h: u32, kernel: &ResampleKernel) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, dst_h);

    if kernel.support() <= 0.0 {
        let indexes = nearest_indexes(dst_h, src.height);
        let stride = dst.stride;
        dst.pixels
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, dst_row)| {
                dst_row.copy_from_slice(src.row(indexes[y] as u32));
            });
        return dst;
    }

    let taps = precompute_taps(dst_h, src.height, kernel);
    let stride = dst.stride;
    let width = src.width as usize;
    dst.pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let taps = &taps[y];
            for x in 0..width {
                let mut acc = [0.0f64; BYTES_PER_PIXEL];
                for tap in taps {
                    let s = tap.index * src.stride + x * BYTES_PER_PIXEL;
                    for (c, accum) in acc.iter_mut().enumerate() {
                        *accum += src.pixels[s + c] as f64 * tap.weight;
                    }
                }
                let d = x * BYTES_PER_PIXEL;
                for (c, &value) in acc.iter().enumerate() {
                    dst_row[d + c] = clamp_channel(value);
                }
            }
        });
    dst
}


// ============================================================================
// Property-Based Tests
// ============================================================================
