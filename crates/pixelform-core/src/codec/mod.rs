//! Container-format glue around the core transforms.
//!
//! The core itself never touches I/O; this module adapts external codecs
//! (the `image` crate) and metadata (`kamadak-exif`) to [`PixelBuffer`],
//! and provides dependency-injected file access so tests can substitute a
//! fake filesystem per call instead of mutating process-wide state.

mod decode;
mod encode;
mod fs;

pub use decode::{decode, read_orientation, DecodeOptions};
pub use encode::{encode, EncodeOptions, PngCompression};
pub use fs::{FileSystem, ReadHandle, StdFs, WriteHandle};

use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::buffer::PixelBuffer;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Format {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
}

impl Format {
    /// Map a file extension (with or without the leading dot, any case)
    /// to a format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] for unknown extensions.
    pub fn from_extension(ext: &str) -> Result<Self, CodecError> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Format::Jpeg),
            "png" => Ok(Format::Png),
            "gif" => Ok(Format::Gif),
            "bmp" => Ok(Format::Bmp),
            "tif" | "tiff" => Ok(Format::Tiff),
            _ => Err(CodecError::UnsupportedFormat),
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            Format::Jpeg => image::ImageFormat::Jpeg,
            Format::Png => image::ImageFormat::Png,
            Format::Gif => image::ImageFormat::Gif,
            Format::Bmp => image::ImageFormat::Bmp,
            Format::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Jpeg => "JPEG",
            Format::Png => "PNG",
            Format::Gif => "GIF",
            Format::Bmp => "BMP",
            Format::Tiff => "TIFF",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the codec glue.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The format is not recognized or not supported.
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// The stream was recognized but its data is damaged or truncated.
    #[error("corrupt image data: {0}")]
    CorruptData(String),

    /// The image dimensions cannot be encoded.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Orientation metadata present but unreadable while auto-orientation
    /// was requested.
    #[error("malformed orientation metadata: {0}")]
    MalformedMetadata(String),

    /// I/O error from the injected filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A primary failure plus a deferred close failure, kept as separate
    /// fields so callers can inspect either.
    #[error("original error: {primary}, deferred close error: {cleanup}")]
    Composite {
        primary: Box<CodecError>,
        cleanup: Box<CodecError>,
    },
}

/// Combine an operation result with a deferred close result.
fn with_close_result<T>(
    primary: Result<T, CodecError>,
    close: std::io::Result<()>,
) -> Result<T, CodecError> {
    match (primary, close) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(CodecError::Io(e)),
        (Err(e), Ok(())) => Err(e),
        (Err(primary), Err(close)) => Err(CodecError::Composite {
            primary: Box::new(primary),
            cleanup: Box::new(CodecError::Io(close)),
        }),
    }
}

/// Open and decode an image through the injected filesystem.
pub fn open_image(
    fs: &dyn FileSystem,
    path: &Path,
    opts: &DecodeOptions,
) -> Result<PixelBuffer, CodecError> {
    let mut file = fs.open(path)?;
    let mut bytes = Vec::new();
    let read_result = file.read_to_end(&mut bytes);
    let close_result = file.close();

    let decoded = read_result
        .map_err(CodecError::from)
        .and_then(|_| decode(&bytes, opts));
    with_close_result(decoded, close_result)
}

/// Encode an image and write it through the injected filesystem.
///
/// The format is taken from the path extension. The image is encoded before
/// the file is created, so encode failures never leave a file behind.
pub fn save_image(
    fs: &dyn FileSystem,
    path: &Path,
    img: &PixelBuffer,
    opts: &EncodeOptions,
) -> Result<(), CodecError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let format = Format::from_extension(ext)?;
    let bytes = encode(img, format, opts)?;

    let mut file = fs.create(path)?;
    let write_result = file
        .write_all(&bytes)
        .and_then(|()| file.flush())
        .map_err(CodecError::from);
    let close_result = file.close();
    with_close_result(write_result, close_result)
}

/// Map an `image` crate error onto the codec taxonomy, keeping
/// "unsupported format" distinguishable from "corrupt data".
pub(crate) fn map_image_error(err: image::ImageError) -> CodecError {
    match err {
        image::ImageError::Unsupported(_) => CodecError::UnsupportedFormat,
        image::ImageError::IoError(e) => CodecError::Io(e),
        other => CodecError::CorruptData(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read, Write};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("jpg").unwrap(), Format::Jpeg);
        assert_eq!(Format::from_extension(".jpg").unwrap(), Format::Jpeg);
        assert_eq!(Format::from_extension(".JPG").unwrap(), Format::Jpeg);
        assert_eq!(Format::from_extension("jpeg").unwrap(), Format::Jpeg);
        assert_eq!(Format::from_extension("tif").unwrap(), Format::Tiff);
        assert_eq!(Format::from_extension("tiff").unwrap(), Format::Tiff);
        assert!(matches!(
            Format::from_extension(".unsupportedextension"),
            Err(CodecError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(Format::Jpeg.to_string(), "JPEG");
        assert_eq!(Format::Tiff.to_string(), "TIFF");
    }

    /// Filesystem whose reads and closes both fail, reproducing the
    /// deferred-close scenario.
    struct CloseErrorFs;

    struct CloseErrorFile;

    impl Read for CloseErrorFile {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("read error"))
        }
    }

    impl ReadHandle for CloseErrorFile {
        fn close(&mut self) -> io::Result<()> {
            Err(io::Error::other("failed to close file"))
        }
    }

    impl FileSystem for CloseErrorFs {
        fn open(&self, _: &Path) -> io::Result<Box<dyn ReadHandle>> {
            Ok(Box::new(CloseErrorFile))
        }

        fn create(&self, _: &Path) -> io::Result<Box<dyn WriteHandle>> {
            Err(io::Error::other("this method should not be called"))
        }
    }

    #[test]
    fn test_open_combines_primary_and_close_error() {
        let err = open_image(
            &CloseErrorFs,
            Path::new("dummy"),
            &DecodeOptions::default(),
        )
        .unwrap_err();
        match &err {
            CodecError::Composite { primary, cleanup } => {
                assert!(matches!(**primary, CodecError::Io(_)));
                assert!(matches!(**cleanup, CodecError::Io(_)));
            }
            other => panic!("expected Composite, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "original error: I/O error: read error, \
             deferred close error: I/O error: failed to close file"
        );
    }

    /// Filesystem that refuses creates, or hands out write handles that
    /// fail on close.
    struct BadFs;

    struct BadFile;

    impl Write for BadFile {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl WriteHandle for BadFile {
        fn close(&mut self) -> io::Result<()> {
            Err(io::Error::other("failed to close file"))
        }
    }

    impl FileSystem for BadFs {
        fn open(&self, _: &Path) -> io::Result<Box<dyn ReadHandle>> {
            Err(io::Error::other("failed to open file"))
        }

        fn create(&self, path: &Path) -> io::Result<Box<dyn WriteHandle>> {
            if path.to_str() == Some("badFile.png") {
                Ok(Box::new(BadFile))
            } else {
                Err(io::Error::other("failed to create file"))
            }
        }
    }

    #[test]
    fn test_save_surfaces_create_and_close_errors() {
        let img = PixelBuffer::from_vec(1, 1, vec![1, 2, 3, 255]).unwrap();
        let opts = EncodeOptions::default();

        let err = save_image(&BadFs, Path::new("test.png"), &img, &opts).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)), "got {err:?}");

        // Write succeeds but close fails: close error alone is the result.
        let err = save_image(&BadFs, Path::new("badFile.png"), &img, &opts).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)), "got {err:?}");
        assert_eq!(err.to_string(), "I/O error: failed to close file");
    }

    #[test]
    fn test_save_unknown_extension_fails_before_fs() {
        // BadFs would fail any create; the extension check runs first.
        let img = PixelBuffer::from_vec(1, 1, vec![1, 2, 3, 255]).unwrap();
        let err = save_image(
            &BadFs,
            Path::new("test.unknown"),
            &img,
            &EncodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat));
    }

    #[test]
    fn test_open_error_propagates() {
        let err = open_image(&BadFs, Path::new("test.png"), &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "I/O error: failed to open file");
    }
}
