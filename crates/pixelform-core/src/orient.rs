//! EXIF orientation correction.
//!
//! An orientation tag (1-8) names the transform a decoder must undo to show
//! the image upright. Each tag maps to a fixed composition of the exact
//! permutation transforms in [`crate::flip`], applied once at decode time.
//! See: <https://exiftool.org/TagNames/EXIF.html>

use crate::buffer::PixelBuffer;
use crate::flip;

/// EXIF orientation values (1-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Mirrored horizontally.
    FlipHorizontal = 2,
    /// Rotated 180 degrees.
    Rotate180 = 3,
    /// Mirrored vertically.
    FlipVertical = 4,
    /// Mirrored along the main diagonal.
    Transpose = 5,
    /// Needs a 90 degree clockwise turn.
    Rotate90Cw = 6,
    /// Mirrored along the anti-diagonal.
    Transverse = 7,
    /// Needs a 90 degree counter-clockwise turn.
    Rotate270Cw = 8,
}

impl Orientation {
    /// Parse a tag value strictly; out-of-range values are `None`.
    ///
    /// Decode paths that opted into auto-orientation treat `None` as
    /// malformed metadata instead of silently falling back to `Normal`.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Orientation::Normal),
            2 => Some(Orientation::FlipHorizontal),
            3 => Some(Orientation::Rotate180),
            4 => Some(Orientation::FlipVertical),
            5 => Some(Orientation::Transpose),
            6 => Some(Orientation::Rotate90Cw),
            7 => Some(Orientation::Transverse),
            8 => Some(Orientation::Rotate270Cw),
            _ => None,
        }
    }

    /// The raw EXIF tag value.
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// True if undoing this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90Cw
                | Orientation::Transverse
                | Orientation::Rotate270Cw
        )
    }

    /// Undo this orientation, producing an upright (tag 1) image.
    ///
    /// `Normal` still allocates a copy so every path returns an
    /// independently owned buffer.
    pub fn apply(self, src: &PixelBuffer) -> PixelBuffer {
        match self {
            Orientation::Normal => src.clone(),
            Orientation::FlipHorizontal => flip::flip_h(src),
            Orientation::Rotate180 => flip::rotate180(src),
            Orientation::FlipVertical => flip::flip_v(src),
            Orientation::Transpose => flip::transpose(src),
            // Tag names give the clockwise correction; flip::rotate90 is
            // counter-clockwise, so CW maps to rotate270 and vice versa.
            Orientation::Rotate90Cw => flip::rotate270(src),
            Orientation::Transverse => flip::transverse(src),
            Orientation::Rotate270Cw => flip::rotate90(src),
        }
    }

    /// Produce the stored (mis-oriented) variant of an upright image.
    ///
    /// Inverse of [`Orientation::apply`]; used by tests to build fixtures
    /// for every tag from one upright reference.
    pub fn encode(self, upright: &PixelBuffer) -> PixelBuffer {
        match self {
            Orientation::Normal => upright.clone(),
            Orientation::FlipHorizontal => flip::flip_h(upright),
            Orientation::Rotate180 => flip::rotate180(upright),
            Orientation::FlipVertical => flip::flip_v(upright),
            Orientation::Transpose => flip::transpose(upright),
            Orientation::Rotate90Cw => flip::rotate90(upright),
            Orientation::Transverse => flip::transverse(upright),
            Orientation::Rotate270Cw => flip::rotate270(upright),
        }
    }

    /// All eight tags in EXIF order.
    pub const ALL: [Orientation; 8] = [
        Orientation::Normal,
        Orientation::FlipHorizontal,
        Orientation::Rotate180,
        Orientation::FlipVertical,
        Orientation::Transpose,
        Orientation::Rotate90Cw,
        Orientation::Transverse,
        Orientation::Rotate270Cw,
    ];
}
