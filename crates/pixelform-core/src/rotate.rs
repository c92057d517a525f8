//! Arbitrary-angle rotation by inverse mapping.
//!
//! The output canvas is the minimal integer rectangle containing the rotated
//! source corners. Every output pixel is mapped back into source space by
//! the inverse rotation about the source center and bilinearly interpolated
//! from its four nearest source pixels; points outside the source get the
//! background color. Exact multiples of 90 degrees dispatch to the
//! permutation transforms in [`crate::flip`], so they stay interpolation
//! free.

use rayon::prelude::*;

use crate::buffer::{clamp_channel, PixelBuffer, Rgba, BYTES_PER_PIXEL};
use crate::flip;

/// Rotate counter-clockwise by `angle_degrees`, filling uncovered output
/// pixels with `background`.
///
/// The angle is normalized modulo 360 into `[0, 360)`, so any multiple of
/// 360 is the identity. A zero-area source produces a zero-area result for
/// any angle.
pub fn rotate(src: &PixelBuffer, angle_degrees: f64, background: Rgba) -> PixelBuffer {
    let angle = angle_degrees - (angle_degrees / 360.0).floor() * 360.0;

    if angle == 0.0 {
        return src.clone();
    } else if angle == 90.0 {
        return flip::rotate90(src);
    } else if angle == 180.0 {
        return flip::rotate180(src);
    } else if angle == 270.0 {
        return flip::rotate270(src);
    }

    if src.is_empty() {
        return PixelBuffer::empty();
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let (dst_w, dst_h) = rotated_size(src.width, src.height, sin, cos);
    let mut dst = PixelBuffer::new(dst_w, dst_h);

    let src_cx = src.width as f64 / 2.0 - 0.5;
    let src_cy = src.height as f64 / 2.0 - 0.5;
    let dst_cx = dst_w as f64 / 2.0 - 0.5;
    let dst_cy = dst_h as f64 / 2.0 - 0.5;
    let bg = background.to_bytes();

    let stride = dst.stride;
    dst.pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(dst_y, dst_row)| {
            let dy = dst_y as f64 - dst_cy;
            for dst_x in 0..dst_w as usize {
                let dx = dst_x as f64 - dst_cx;
                let (xr, yr) = rotate_point(dx, dy, sin, cos);
                let pixel = interpolate_point(src, xr + src_cx, yr + src_cy, bg);
                let d = dst_x * BYTES_PER_PIXEL;
                dst_row[d..d + BYTES_PER_PIXEL].copy_from_slice(&pixel);
            }
        });
    dst
}

/// Bounding box of the rotated source rectangle, in pixels.
///
/// Corners are rotated about the origin and the extent padded by one pixel;
/// a sub-pixel overhang above 0.1 claims one more pixel.
pub fn rotated_size(width: u32, height: u32, sin: f64, cos: f64) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let w = (width - 1) as f64;
    let h = (height - 1) as f64;
    let (x1, y1) = rotate_point(w, 0.0, sin, cos);
    let (x2, y2) = rotate_point(w, h, sin, cos);
    let (x3, y3) = rotate_point(0.0, h, sin, cos);

    let min_x = x1.min(x2).min(x3).min(0.0);
    let max_x = x1.max(x2).max(x3).max(0.0);
    let min_y = y1.min(y2).min(y3).min(0.0);
    let max_y = y1.max(y2).max(y3).max(0.0);

    let mut new_w = max_x - min_x + 1.0;
    if new_w - new_w.floor() > 0.1 {
        new_w += 1.0;
    }
    let mut new_h = max_y - min_y + 1.0;
    if new_h - new_h.floor() > 0.1 {
        new_h += 1.0;
    }
    (new_w as u32, new_h as u32)
}

#[inline]
fn rotate_point(x: f64, y: f64, sin: f64, cos: f64) -> (f64, f64) {
    (x * cos - y * sin, x * sin + y * cos)
}

/// Bilinear sample at a fractional source coordinate.
///
/// The 2x2 neighborhood starts at the floor point; a floor point outside the
/// source rectangle extended one pixel on the low sides cannot touch any
/// source pixel, so it is pure background. Neighbors that fall outside
/// contribute the background color with their bilinear weight.
fn interpolate_point(src: &PixelBuffer, xf: f64, yf: f64, bg: [u8; 4]) -> [u8; 4] {
    let w = src.width as i64;
    let h = src.height as i64;
    let x0 = xf.floor() as i64;
    let y0 = yf.floor() as i64;
    if x0 < -1 || x0 >= w || y0 < -1 || y0 >= h {
        return bg;
    }

    let fx = xf - x0 as f64;
    let fy = yf - y0 as f64;
    let points = [(x0, y0), (x0 + 1, y0), (x0, y0 + 1), (x0 + 1, y0 + 1)];
    let weights = [
        (1.0 - fx) * (1.0 - fy),
        fx * (1.0 - fy),
        (1.0 - fx) * fy,
        fx * fy,
    ];

    let mut acc = [0.0f64; 4];
    for ((px, py), weight) in points.into_iter().zip(weights) {
        let sample = if px >= 0 && px < w && py >= 0 && py < h {
            src.pixel(px as u32, py as u32)
        } else {
            bg
        };
        for (accum, &value) in acc.iter_mut().zip(sample.iter()) {
            *accum += value as f64 * weight;
        }
    }

    let mut out = [0u8; 4];
    for (o, &value) in out.iter_mut().zip(acc.iter()) {
        *o = clamp_channel(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 fixture: one row each of red, green, blue, white; fully opaque.
    fn fixture_4x4() -> PixelBuffer {
        let mut buf = PixelBuffer::new(4, 4);
        let rows = [
            [0xff, 0x00, 0x00, 0xff],
            [0x00, 0xff, 0x00, 0xff],
            [0x00, 0x00, 0xff, 0xff],
            [0xff, 0xff, 0xff, 0xff],
        ];
        for (y, color) in rows.iter().enumerate() {
            for x in 0..4 {
                buf.set_pixel(x, y as u32, *color);
            }
        }
        buf
    }

    fn max_channel_delta(a: &PixelBuffer, b: &PixelBuffer) -> u8 {
        assert_eq!((a.width, a.height), (b.width, b.height));
        let mut max = 0u8;
        for y in 0..a.height {
            for x in 0..a.width {
                for (ca, cb) in a.pixel(x, y).into_iter().zip(b.pixel(x, y)) {
                    max = max.max(ca.abs_diff(cb));
                }
            }
        }
        max
    }

    #[test]
    fn test_rotate_0_is_identity() {
        let img = fixture_4x4();
        assert_eq!(rotate(&img, 0.0, Rgba::BLACK), img);
    }

    #[test]
    fn test_rotate_full_turns_are_identity() {
        let img = fixture_4x4();
        for angle in [360.0, -3600.0, 3600.0, 720.0] {
            assert_eq!(rotate(&img, angle, Rgba::BLACK), img, "angle {angle}");
        }
    }

    #[test]
    fn test_rotate_90_is_exact_permutation() {
        let img = fixture_4x4();
        assert_eq!(rotate(&img, 90.0, Rgba::BLACK), flip::rotate90(&img));
        assert_eq!(rotate(&img, -270.0, Rgba::BLACK), flip::rotate90(&img));
        assert_eq!(rotate(&img, 180.0, Rgba::BLACK), flip::rotate180(&img));
        assert_eq!(rotate(&img, 270.0, Rgba::BLACK), flip::rotate270(&img));
        assert_eq!(rotate(&img, -90.0, Rgba::BLACK), flip::rotate270(&img));
    }

    #[test]
    fn test_rotate_90_literal() {
        // Rows become columns: leftmost output column is the bottom row.
        let img = fixture_4x4();
        let got = rotate(&img, 90.0, Rgba::BLACK);
        assert_eq!((got.width, got.height), (4, 4));
        for y in 0..4 {
            assert_eq!(got.pixel(0, y), [0xff, 0x00, 0x00, 0xff]);
            assert_eq!(got.pixel(1, y), [0x00, 0xff, 0x00, 0xff]);
            assert_eq!(got.pixel(2, y), [0x00, 0x00, 0xff, 0xff]);
            assert_eq!(got.pixel(3, y), [0xff, 0xff, 0xff, 0xff]);
        }
    }

    #[test]
    fn test_rotate_45_matches_golden_within_one() {
        // Golden bytes for the 4x4 fixture rotated 45 degrees over black.
        let want = PixelBuffer::from_vec(
            6,
            6,
            vec![
                0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff, 0x61, 0x00, 0x00, 0xff, 0x58,
                0x08, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff, //
                0x00, 0x00, 0x00, 0xff, 0x61, 0x00, 0x00, 0xff, 0xe9, 0x16, 0x00, 0xff, 0x35,
                0xca, 0x00, 0xff, 0x00, 0x30, 0x30, 0xff, 0x00, 0x00, 0x00, 0xff, //
                0x61, 0x00, 0x00, 0xff, 0xe9, 0x16, 0x00, 0xff, 0x35, 0xca, 0x00, 0xff, 0x00,
                0x80, 0x80, 0xff, 0x35, 0x35, 0xff, 0xff, 0x58, 0x58, 0x61, 0xff, //
                0x58, 0x08, 0x00, 0xff, 0x35, 0xca, 0x00, 0xff, 0x00, 0x80, 0x80, 0xff, 0x35,
                0x35, 0xff, 0xff, 0xe9, 0xe9, 0xff, 0xff, 0x61, 0x61, 0x61, 0xff, //
                0x00, 0x00, 0x00, 0xff, 0x00, 0x30, 0x30, 0xff, 0x35, 0x35, 0xff, 0xff, 0xe9,
                0xe9, 0xff, 0xff, 0x61, 0x61, 0x61, 0xff, 0x00, 0x00, 0x00, 0xff, //
                0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff, 0x58, 0x58, 0x61, 0xff, 0x61,
                0x61, 0x61, 0xff, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff,
            ],
        )
        .unwrap();
        let got = rotate(&fixture_4x4(), 45.0, Rgba::BLACK);
        assert_eq!((got.width, got.height), (6, 6));
        assert!(
            max_channel_delta(&got, &want) <= 1,
            "max delta {} > 1",
            max_channel_delta(&got, &want)
        );
    }

    #[test]
    fn test_rotate_zero_area() {
        let empty = PixelBuffer::empty();
        let got = rotate(&empty, 123.0, Rgba::BLACK);
        assert!(got.is_empty());
        assert_eq!((got.width, got.height), (0, 0));
    }

    #[test]
    fn test_rotated_bounds_contain_corners() {
        // For non-axis angles the canvas must cover the rotated corner span.
        for angle in [15.0f64, 45.0, 100.0, 211.0, 340.0] {
            let (sin, cos) = angle.to_radians().sin_cos();
            let (w, h) = rotated_size(10, 4, sin, cos);
            let span_x = 9.0 * cos.abs() + 3.0 * sin.abs();
            let span_y = 9.0 * sin.abs() + 3.0 * cos.abs();
            assert!(w as f64 >= span_x, "angle {angle}: {w} < {span_x}");
            assert!(h as f64 >= span_y, "angle {angle}: {h} < {span_y}");
        }
    }

    #[test]
    fn test_rotate_1x2_quarter_turns() {
        let img = PixelBuffer::from_vec(
            1,
            2,
            vec![0xff, 0x00, 0x00, 0xff, 0x00, 0xff, 0x00, 0xff],
        )
        .unwrap();
        // -90 normalizes to 270: clockwise quarter turn.
        let got = rotate(&img, -90.0, Rgba::BLACK);
        assert_eq!((got.width, got.height), (2, 1));
        assert_eq!(got.pixel(0, 0), [0x00, 0xff, 0x00, 0xff]);
        assert_eq!(got.pixel(1, 0), [0xff, 0x00, 0x00, 0xff]);

        // -3600 + 90 normalizes to 90: counter-clockwise quarter turn.
        let got = rotate(&img, -3600.0 + 90.0, Rgba::BLACK);
        assert_eq!((got.width, got.height), (2, 1));
        assert_eq!(got.pixel(0, 0), [0xff, 0x00, 0x00, 0xff]);
        assert_eq!(got.pixel(1, 0), [0x00, 0xff, 0x00, 0xff]);
    }

    #[test]
    fn test_background_fills_uncovered_corners() {
        let img = fixture_4x4();
        let bg = Rgba::new(1, 2, 3, 4);
        let got = rotate(&img, 45.0, bg);
        assert_eq!(got.pixel(0, 0), bg.to_bytes());
        assert_eq!(got.pixel(got.width - 1, got.height - 1), bg.to_bytes());
    }
}
