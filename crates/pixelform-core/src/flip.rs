//! Exact pixel-permutation transforms: flips, transposes and quarter-turn
//! rotations.
//!
//! These operations remap pixel coordinates without any interpolation, so
//! channel values survive bit-identically; only the output dimensions and
//! stride change. `rotate90` is a counter-clockwise quarter turn (matching
//! the angle convention of [`crate::rotate`]); `rotate270` is clockwise.

use crate::buffer::{PixelBuffer, BYTES_PER_PIXEL};

/// Mirror horizontally: `out(w-1-x, y) = in(x, y)`.
pub fn flip_h(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, src.height);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);
        for x in 0..src.width as usize {
            let i = x * BYTES_PER_PIXEL;
            let j = (src.width as usize - 1 - x) * BYTES_PER_PIXEL;
            dst_row[j..j + BYTES_PER_PIXEL].copy_from_slice(&src_row[i..i + BYTES_PER_PIXEL]);
        }
    }
    dst
}

/// Mirror vertically: `out(x, h-1-y) = in(x, y)`.
pub fn flip_v(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, src.height);
    for y in 0..src.height {
        let flipped = src.height - 1 - y;
        dst.row_mut(flipped).copy_from_slice(src.row(y));
    }
    dst
}

/// Reflect across the main diagonal; output dims swap: `out(y, x) = in(x, y)`.
pub fn transpose(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.height, src.width);
    for y in 0..src.height {
        for x in 0..src.width {
            dst.set_pixel(y, x, src.pixel(x, y));
        }
    }
    dst
}

/// Reflect across the anti-diagonal; output dims swap:
/// `out(h-1-y, w-1-x) = in(x, y)`.
pub fn transverse(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.height, src.width);
    for y in 0..src.height {
        for x in 0..src.width {
            dst.set_pixel(src.height - 1 - y, src.width - 1 - x, src.pixel(x, y));
        }
    }
    dst
}

/// Quarter turn counter-clockwise; output dims swap:
/// `out(y, w-1-x) = in(x, y)`.
pub fn rotate90(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.height, src.width);
    for y in 0..src.height {
        for x in 0..src.width {
            dst.set_pixel(y, src.width - 1 - x, src.pixel(x, y));
        }
    }
    dst
}

/// Half turn: `out(w-1-x, h-1-y) = in(x, y)`.
pub fn rotate180(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            dst.set_pixel(src.width - 1 - x, src.height - 1 - y, src.pixel(x, y));
        }
    }
    dst
}

/// Quarter turn clockwise; output dims swap: `out(h-1-y, x) = in(x, y)`.
pub fn rotate270(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.height, src.width);
    for y in 0..src.height {
        for x in 0..src.width {
            dst.set_pixel(src.height - 1 - y, x, src.pixel(x, y));
        }
    }
    dst
}


// ============================================================================
// Property-Based Tests
// ============================================================================
