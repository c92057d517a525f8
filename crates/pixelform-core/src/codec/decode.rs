//! Image decoding into a [`PixelBuffer`], with optional EXIF
//! orientation correction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{map_image_error, CodecError};
use crate::buffer::PixelBuffer;
use crate::orient::Orientation;

/// Options controlling decode behavior.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct DecodeOptions {
    /// Read the EXIF orientation tag and normalize the image to tag 1.
    ///
    /// When set, an orientation field that is present but unreadable fails
    /// the decode with [`CodecError::MalformedMetadata`]; an absent field
    /// means "already upright".
    pub auto_orientation: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_orientation(mut self, value: bool) -> Self {
        self.auto_orientation = value;
        self
    }
}

/// Decode encoded image bytes into an RGBA pixel buffer.
///
/// The container format is sniffed from the bytes. With
/// `auto_orientation`, the EXIF orientation is applied so the result is
/// always upright.
///
/// # Errors
///
/// [`CodecError::UnsupportedFormat`] if the stream is not a recognized
/// format, [`CodecError::CorruptData`] if it is recognized but damaged, and
/// [`CodecError::MalformedMetadata`] for unreadable orientation metadata
/// under `auto_orientation`.
pub fn decode(bytes: &[u8], opts: &DecodeOptions) -> Result<PixelBuffer, CodecError> {
    let orientation = if opts.auto_orientation {
        read_orientation(bytes)?
    } else {
        Orientation::Normal
    };

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(CodecError::Io)?;
    if reader.format().is_none() {
        return Err(CodecError::UnsupportedFormat);
    }
    let img = reader.decode().map_err(map_image_error)?;

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let buffer = PixelBuffer::from_vec(width, height, rgba.into_raw())
        .map_err(|e| CodecError::CorruptData(e.to_string()))?;

    Ok(orientation.apply(&buffer))
}

/// Read the EXIF orientation from encoded image bytes.
///
/// Containers that cannot carry EXIF, an absent EXIF segment and an absent
/// orientation field are all `Normal`. EXIF data that is present but cannot
/// be parsed, or a field whose value is outside 1-8, is an error.
pub fn read_orientation(bytes: &[u8]) -> Result<Orientation, CodecError> {
    if !may_carry_exif(bytes) {
        return Ok(Orientation::Normal);
    }

    let mut cursor = Cursor::new(bytes);
    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        // A recognized container without an EXIF segment: nothing to correct.
        Err(exif::Error::NotFound(_)) => return Ok(Orientation::Normal),
        // The container claims EXIF data but it cannot be parsed.
        Err(e) => return Err(CodecError::MalformedMetadata(e.to_string())),
    };

    match exif.get_field(Tag::Orientation, In::PRIMARY) {
        Some(field) => match field.value.get_uint(0).and_then(Orientation::from_tag) {
            Some(orientation) => Ok(orientation),
            None => Err(CodecError::MalformedMetadata(format!(
                "orientation field holds no valid tag: {}",
                field.display_value()
            ))),
        },
        None => Ok(Orientation::Normal),
    }
}

/// Container signatures the EXIF reader understands. Anything else (GIF,
/// BMP, plain garbage) has no EXIF to read.
fn may_carry_exif(bytes: &[u8]) -> bool {
    bytes.starts_with(b"\xff\xd8") // JPEG
        || bytes.starts_with(b"II*\0") // TIFF, little endian
        || bytes.starts_with(b"MM\0*") // TIFF, big endian
        || bytes.starts_with(b"\x89PNG\r\n\x1a\n")
        || (bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
}
