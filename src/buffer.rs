//! Owned pixel storage tagged with a format.
//!
//! [`PixelBuffer`] pairs width and height with [`PixelData`], a typed store
//! holding one `Vec` of `rgb` pixels per supported layout. Storage is always
//! contiguous with `len == width * height`; a format change reallocates
//! rather than reinterpreting bytes.

use rgb::alt::{BGR, BGRA, Gray, GrayAlpha};
use rgb::{ComponentBytes, FromSlice, Rgb, Rgba};

use crate::error::{Operand, RasterError};
use crate::format::PixelFormat;
use crate::pixel::Pixel;

/// Default cap on total pixels per buffer.
///
/// The largest count a 32-bit pixel counter can hold. Constructors accept a
/// smaller cap through [`PixelBuffer::with_pixel_limit`].
pub const DEFAULT_PIXEL_LIMIT: u64 = u32::MAX as u64;

/// Typed pixel storage, one variant per supported format.
///
/// The set is closed: it mirrors [`PixelFormat`] exactly, so matching over
/// it stays exhaustive. Pixels are stored row-major, top row first.
#[derive(Clone, PartialEq, Eq)]
pub enum PixelData {
    Grey8(Vec<Gray<u8>>),
    GreyAlpha8(Vec<GrayAlpha<u8>>),
    Rgb8(Vec<Rgb<u8>>),
    Rgba8(Vec<Rgba<u8>>),
    Bgr8(Vec<BGR<u8>>),
    Bgra8(Vec<BGRA<u8>>),
}

impl PixelData {
    /// The format this storage holds.
    pub fn format(&self) -> PixelFormat {
        match self {
            PixelData::Grey8(_) => PixelFormat::Grey8,
            PixelData::GreyAlpha8(_) => PixelFormat::GreyAlpha8,
            PixelData::Rgb8(_) => PixelFormat::Rgb8,
            PixelData::Rgba8(_) => PixelFormat::Rgba8,
            PixelData::Bgr8(_) => PixelFormat::Bgr8,
            PixelData::Bgra8(_) => PixelFormat::Bgra8,
        }
    }

    /// Number of stored pixels.
    pub fn len(&self) -> usize {
        match self {
            PixelData::Grey8(v) => v.len(),
            PixelData::GreyAlpha8(v) => v.len(),
            PixelData::Rgb8(v) => v.len(),
            PixelData::Rgba8(v) => v.len(),
            PixelData::Bgr8(v) => v.len(),
            PixelData::Bgra8(v) => v.len(),
        }
    }

    /// Whether no pixels are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interleaved channel bytes in storage order, borrowed.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PixelData::Grey8(v) => v.as_bytes(),
            PixelData::GreyAlpha8(v) => v.as_bytes(),
            PixelData::Rgb8(v) => v.as_bytes(),
            PixelData::Rgba8(v) => v.as_bytes(),
            PixelData::Bgr8(v) => v.as_bytes(),
            PixelData::Bgra8(v) => v.as_bytes(),
        }
    }

    /// Pixel at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Pixel> {
        match self {
            PixelData::Grey8(v) => v.get(index).map(|p| Pixel::Grey8(*p)),
            PixelData::GreyAlpha8(v) => v.get(index).map(|p| Pixel::GreyAlpha8(*p)),
            PixelData::Rgb8(v) => v.get(index).map(|p| Pixel::Rgb8(*p)),
            PixelData::Rgba8(v) => v.get(index).map(|p| Pixel::Rgba8(*p)),
            PixelData::Bgr8(v) => v.get(index).map(|p| Pixel::Bgr8(*p)),
            PixelData::Bgra8(v) => v.get(index).map(|p| Pixel::Bgra8(*p)),
        }
    }

    /// Write `pixel` at `index`. The index must be in range.
    fn set(&mut self, index: usize, pixel: Pixel) -> Result<(), RasterError> {
        let format = self.format();
        match (self, pixel) {
            (PixelData::Grey8(v), Pixel::Grey8(p)) => v[index] = p,
            (PixelData::GreyAlpha8(v), Pixel::GreyAlpha8(p)) => v[index] = p,
            (PixelData::Rgb8(v), Pixel::Rgb8(p)) => v[index] = p,
            (PixelData::Rgba8(v), Pixel::Rgba8(p)) => v[index] = p,
            (PixelData::Bgr8(v), Pixel::Bgr8(p)) => v[index] = p,
            (PixelData::Bgra8(v), Pixel::Bgra8(p)) => v[index] = p,
            (_, pixel) => {
                return Err(RasterError::FormatMismatch {
                    format,
                    operand: Operand::Format(pixel.format()),
                });
            }
        }
        Ok(())
    }

    /// Overwrite every pixel with `pixel`.
    fn fill(&mut self, pixel: Pixel) -> Result<(), RasterError> {
        let format = self.format();
        match (self, pixel) {
            (PixelData::Grey8(v), Pixel::Grey8(p)) => v.fill(p),
            (PixelData::GreyAlpha8(v), Pixel::GreyAlpha8(p)) => v.fill(p),
            (PixelData::Rgb8(v), Pixel::Rgb8(p)) => v.fill(p),
            (PixelData::Rgba8(v), Pixel::Rgba8(p)) => v.fill(p),
            (PixelData::Bgr8(v), Pixel::Bgr8(p)) => v.fill(p),
            (PixelData::Bgra8(v), Pixel::Bgra8(p)) => v.fill(p),
            (_, pixel) => {
                return Err(RasterError::FormatMismatch {
                    format,
                    operand: Operand::Format(pixel.format()),
                });
            }
        }
        Ok(())
    }

    /// All-zero storage for `count` pixels of `format`.
    ///
    /// Every channel starts at 0, including alpha.
    fn zeroed(format: PixelFormat, count: usize) -> Self {
        match format {
            PixelFormat::Grey8 => PixelData::Grey8(vec![Gray(0); count]),
            PixelFormat::GreyAlpha8 => PixelData::GreyAlpha8(vec![GrayAlpha(0, 0); count]),
            PixelFormat::Rgb8 => PixelData::Rgb8(vec![Rgb { r: 0, g: 0, b: 0 }; count]),
            PixelFormat::Rgba8 => PixelData::Rgba8(vec![
                Rgba {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 0
                };
                count
            ]),
            PixelFormat::Bgr8 => PixelData::Bgr8(vec![BGR { b: 0, g: 0, r: 0 }; count]),
            PixelFormat::Bgra8 => PixelData::Bgra8(vec![
                BGRA {
                    b: 0,
                    g: 0,
                    r: 0,
                    a: 0
                };
                count
            ]),
        }
    }

    /// Storage of `count` copies of `pixel`.
    fn splat(pixel: Pixel, count: usize) -> Self {
        match pixel {
            Pixel::Grey8(p) => PixelData::Grey8(vec![p; count]),
            Pixel::GreyAlpha8(p) => PixelData::GreyAlpha8(vec![p; count]),
            Pixel::Rgb8(p) => PixelData::Rgb8(vec![p; count]),
            Pixel::Rgba8(p) => PixelData::Rgba8(vec![p; count]),
            Pixel::Bgr8(p) => PixelData::Bgr8(vec![p; count]),
            Pixel::Bgra8(p) => PixelData::Bgra8(vec![p; count]),
        }
    }
}

impl core::fmt::Debug for PixelData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PixelData::{}({} px)", self.format(), self.len())
    }
}

/// An owned, format-tagged image in memory.
///
/// The buffer is the unit every operation in this crate works on: it owns
/// its storage exclusively, keeps `pixel_count == width * height` as an
/// invariant, and replaces storage wholesale when a transform changes
/// geometry. Reallocating operations build the complete result before the
/// old storage is released, so a failed call leaves the buffer unchanged.
///
/// [`take`](Self::take) moves the contents out and leaves the empty buffer
/// behind (zero dimensions, no storage); `Default` is that same empty state.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: PixelData,
}

fn checked_pixel_count(width: u32, height: u32, max_pixels: u64) -> Result<usize, RasterError> {
    let count = u64::from(width) * u64::from(height);
    if count > max_pixels {
        return Err(RasterError::PixelCountExceeded {
            actual: count,
            max: max_pixels,
        });
    }
    Ok(count as usize)
}

impl PixelBuffer {
    /// Zero-filled buffer of the given geometry.
    ///
    /// # Errors
    ///
    /// [`RasterError::PixelCountExceeded`] if `width * height` exceeds
    /// [`DEFAULT_PIXEL_LIMIT`].
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, RasterError> {
        Self::with_pixel_limit(width, height, format, DEFAULT_PIXEL_LIMIT)
    }

    /// Zero-filled buffer checked against a caller-chosen pixel cap.
    pub fn with_pixel_limit(
        width: u32,
        height: u32,
        format: PixelFormat,
        max_pixels: u64,
    ) -> Result<Self, RasterError> {
        let count = checked_pixel_count(width, height, max_pixels)?;
        Ok(Self {
            width,
            height,
            data: PixelData::zeroed(format, count),
        })
    }

    /// Buffer of the given geometry with every pixel set to `fill`.
    ///
    /// The format is taken from the fill pixel.
    pub fn filled(width: u32, height: u32, fill: Pixel) -> Result<Self, RasterError> {
        let count = checked_pixel_count(width, height, DEFAULT_PIXEL_LIMIT)?;
        Ok(Self {
            width,
            height,
            data: PixelData::splat(fill, count),
        })
    }

    /// Typed storage from a decoder's interleaved bytes.
    ///
    /// The format is inferred from `channels` (1 to 4; decoders produce
    /// RGB-ordered data, so the BGR layouts are never inferred).
    ///
    /// # Errors
    ///
    /// [`RasterError::DecodeFailure`] if `channels` maps to no supported
    /// format or `bytes` does not hold exactly `width * height * channels`
    /// bytes; [`RasterError::PixelCountExceeded`] past
    /// [`DEFAULT_PIXEL_LIMIT`].
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u32,
        bytes: &[u8],
    ) -> Result<Self, RasterError> {
        let Some(format) = PixelFormat::from_channel_count(channels) else {
            return Err(RasterError::DecodeFailure {
                reason: format!("{channels} channels do not map to a supported format"),
            });
        };
        let count = checked_pixel_count(width, height, DEFAULT_PIXEL_LIMIT)?;
        let expected = count * format.bytes_per_pixel();
        if bytes.len() != expected {
            return Err(RasterError::DecodeFailure {
                reason: format!(
                    "{got} bytes do not match {width}x{height} with {channels} channels",
                    got = bytes.len()
                ),
            });
        }
        let data = match format {
            PixelFormat::Grey8 => PixelData::Grey8(bytes.as_gray().to_vec()),
            PixelFormat::GreyAlpha8 => PixelData::GreyAlpha8(bytes.as_gray_alpha().to_vec()),
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => PixelData::Rgb8(bytes.as_rgb().to_vec()),
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => {
                PixelData::Rgba8(bytes.as_rgba().to_vec())
            }
        };
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The buffer's pixel format.
    pub fn format(&self) -> PixelFormat {
        self.data.format()
    }

    /// Channels per pixel for the buffer's format.
    pub fn channel_count(&self) -> u32 {
        self.format().channel_count()
    }

    /// Total stored pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is the empty state (taken or defaulted).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interleaved channel bytes in storage order, borrowed.
    ///
    /// Row-major, no padding between rows.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Borrow the typed storage.
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Consume the buffer, returning the typed storage.
    pub fn into_data(self) -> PixelData {
        self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut PixelData {
        &mut self.data
    }

    /// Assemble a buffer from storage the caller sized correctly.
    pub(crate) fn from_parts(width: u32, height: u32, data: PixelData) -> Self {
        debug_assert_eq!(data.len() as u64, u64::from(width) * u64::from(height));
        Self {
            width,
            height,
            data,
        }
    }

    /// Move the contents out, leaving the empty buffer behind.
    pub fn take(&mut self) -> PixelBuffer {
        core::mem::take(self)
    }

    /// Pixel at column `x`, row `y` (zero-based).
    ///
    /// # Errors
    ///
    /// [`RasterError::OutOfBounds`] outside the grid. The empty buffer has
    /// no valid coordinates.
    pub fn pixel_at(&self, x: u32, y: u32) -> Result<Pixel, RasterError> {
        let index = self.index_of(x, y)?;
        self.data.get(index).ok_or(RasterError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Pixel at a row-major index.
    ///
    /// # Errors
    ///
    /// [`RasterError::OutOfBounds`] past the end, reporting the decomposed
    /// row and column.
    pub fn pixel_at_index(&self, index: usize) -> Result<Pixel, RasterError> {
        self.data
            .get(index)
            .ok_or_else(|| self.index_out_of_bounds(index))
    }

    /// Write `pixel` at column `x`, row `y`.
    ///
    /// # Errors
    ///
    /// [`RasterError::OutOfBounds`] outside the grid;
    /// [`RasterError::FormatMismatch`] if the pixel's format differs from
    /// the buffer's.
    pub fn set_pixel_at(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<(), RasterError> {
        let index = self.index_of(x, y)?;
        self.data.set(index, pixel)
    }

    /// Overwrite every pixel with `pixel`.
    ///
    /// # Errors
    ///
    /// [`RasterError::FormatMismatch`] if the pixel's format differs from
    /// the buffer's.
    pub fn fill(&mut self, pixel: Pixel) -> Result<(), RasterError> {
        self.data.fill(pixel)
    }

    fn index_of(&self, x: u32, y: u32) -> Result<usize, RasterError> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    fn index_out_of_bounds(&self, index: usize) -> RasterError {
        let (x, y) = if self.width == 0 {
            (0, 0)
        } else {
            let x = (index as u64 % u64::from(self.width)) as u32;
            let y = u32::try_from(index as u64 / u64::from(self.width)).unwrap_or(u32::MAX);
            (x, y)
        };
        RasterError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for PixelBuffer {
    /// The empty buffer: zero dimensions, no storage, Grey8.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            data: PixelData::Grey8(Vec::new()),
        }
    }
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "PixelBuffer::{}({}x{})",
            self.format(),
            self.width,
            self.height
        )
    }
}
