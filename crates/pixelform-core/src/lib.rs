//! Pixelform Core - pixel-buffer transform engine
//!
//! This crate performs geometric and convolution operations on decoded
//! raster images: resizing with multiple resampling kernels, arbitrary-angle
//! rotation with background fill, exact flips/transposes/quarter turns,
//! Gaussian blur and sharpen/edge convolution, and EXIF-orientation
//! correction composed from the exact transforms.
//!
//! The core works purely in memory on [`PixelBuffer`] values; container
//! decoding and encoding live in the [`codec`] module as thin glue over
//! external codecs. Every transform takes its input by reference and
//! returns a freshly allocated buffer, so sources can be shared across
//! threads.

pub mod buffer;
pub mod codec;
pub mod convolve;
pub mod error;
pub mod flip;
pub mod orient;
pub mod resample;
pub mod resize;
pub mod rotate;

pub use buffer::{PixelBuffer, Rgba};
pub use codec::{
    decode, encode, open_image, save_image, CodecError, DecodeOptions, EncodeOptions, Format,
    StdFs,
};
pub use convolve::{blur, convolve_separable, edge_detect, sharpen, Kernel1d};
pub use error::TransformError;
pub use flip::{flip_h, flip_v, rotate180, rotate270, rotate90, transpose, transverse};
pub use orient::Orientation;
pub use resample::ResampleKernel;
pub use resize::resize;
pub use rotate::rotate;
