//! Format-polymorphic, owned 8-bit pixel buffers with whole-image transforms.
//!
//! The crate centers on [`PixelBuffer`], a width-by-height grid of pixels in
//! one of six interleaved 8-bit layouts. The surface in brief:
//!
//! - [`PixelBuffer`] / [`PixelData`] - dimensioned buffer and its tagged storage
//! - [`PixelFormat`] - the closed set of supported layouts
//! - [`Pixel`] - one pixel with saturating channel arithmetic
//! - [`CropRect`] / [`PadSpec`] - geometry arguments for crop and pad
//! - [`GaussianNoise`] / [`SaltAndPepper`] - validated noise parameters
//! - [`ContainerFormat`] - writable containers behind [`PixelBuffer::save`]
//! - [`RasterError`] - the taxonomy every fallible call returns
//!
//! Buffers exclusively own their storage. Geometric transforms (flip,
//! rotate, crop, pad) either rework storage in place or fully build the
//! replacement before swapping it in; pairwise arithmetic tiles a smaller
//! operand across a larger one; grayscale reduction and noise injection
//! produce or mutate whole buffers in single atomic steps. Container I/O
//! goes through the `image` crate, and noise sampling draws from a
//! caller-supplied `rand` generator.

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod format;
mod io;
mod noise;
mod pixel;
mod pointwise;
mod transform;

pub use buffer::{DEFAULT_PIXEL_LIMIT, PixelBuffer, PixelData};
pub use error::{Operand, RasterError};
pub use format::PixelFormat;
pub use io::ContainerFormat;
pub use noise::{GaussianNoise, SaltAndPepper};
pub use pixel::{Pixel, clamp_channel};
pub use transform::{CropRect, PadSpec};

// Re-exports for callers working with the typed pixel structs directly.
pub use rgb;
pub use rgb::alt::BGR as Bgr;
pub use rgb::alt::BGRA as Bgra;
pub use rgb::alt::{Gray, GrayAlpha};
pub use rgb::{Rgb, Rgba};
