//! Geometric transforms: flips, rotations, crop, and pad.
//!
//! Flips rework storage in place; everything else builds the complete
//! replacement storage first and swaps it in, so a failed call leaves the
//! buffer untouched.

use crate::buffer::{DEFAULT_PIXEL_LIMIT, PixelBuffer, PixelData};
use crate::error::{Operand, RasterError};
use crate::pixel::Pixel;

/// One-based crop bounds.
///
/// `x1`/`y1` name the first kept column and row; `x2`/`y2` name the first
/// excluded ones, so the kept region is `x2 - x1` wide and `y2 - y1` tall
/// and the full-image crop is `(1, 1, width + 1, height + 1)`. In
/// zero-based terms the kept columns are `x1-1..x2-1` and the kept rows
/// `y1-1..y2-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropRect {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn validate(self, width: u32, height: u32) -> Result<(), RasterError> {
        if self.x1 == 0 || self.y1 == 0 || self.x2 == 0 || self.y2 == 0 {
            return Err(RasterError::InvalidGeometry {
                reason: "crop bounds are one-based; zero is not a valid coordinate",
            });
        }
        if self.x1 >= self.x2 || self.y1 >= self.y2 {
            return Err(RasterError::InvalidGeometry {
                reason: "crop bounds must satisfy x1 < x2 and y1 < y2",
            });
        }
        // The zero check above keeps these subtractions from underflowing.
        if self.x2 - 1 > width || self.y2 - 1 > height {
            return Err(RasterError::InvalidGeometry {
                reason: "crop rectangle extends past the image",
            });
        }
        Ok(())
    }
}

/// Per-side padding amounts in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PadSpec {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl PadSpec {
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// The same amount on all four sides.
    pub fn uniform(amount: u32) -> Self {
        Self::new(amount, amount, amount, amount)
    }
}

fn flip_rows<T>(pixels: &mut [T], width: usize) {
    if width == 0 {
        return;
    }
    for row in pixels.chunks_exact_mut(width) {
        row.reverse();
    }
}

fn swap_row_pairs<T>(pixels: &mut [T], width: usize) {
    if width == 0 {
        return;
    }
    let height = pixels.len() / width;
    for y in 0..height / 2 {
        let (upper, lower) = pixels.split_at_mut((height - 1 - y) * width);
        upper[y * width..(y + 1) * width].swap_with_slice(&mut lower[..width]);
    }
}

fn rotate_right<T: Copy>(pixels: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(pixels.len());
    for y in 0..width {
        for x in 0..height {
            out.push(pixels[(height - 1 - x) * width + y]);
        }
    }
    out
}

fn rotate_left<T: Copy>(pixels: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(pixels.len());
    for y in 0..width {
        for x in 0..height {
            out.push(pixels[x * width + (width - 1 - y)]);
        }
    }
    out
}

fn crop_region<T: Copy>(pixels: &[T], width: usize, rect: CropRect) -> Vec<T> {
    let x0 = (rect.x1 - 1) as usize;
    let y0 = (rect.y1 - 1) as usize;
    let new_width = (rect.x2 - rect.x1) as usize;
    let new_height = (rect.y2 - rect.y1) as usize;
    let mut out = Vec::with_capacity(new_width * new_height);
    for y in 0..new_height {
        let start = (y0 + y) * width + x0;
        out.extend_from_slice(&pixels[start..start + new_width]);
    }
    out
}

fn pad_region<T: Copy>(
    pixels: &[T],
    width: usize,
    spec: PadSpec,
    fill: T,
    new_width: usize,
    new_height: usize,
) -> Vec<T> {
    let mut out = vec![fill; new_width * new_height];
    if width > 0 {
        let left = spec.left as usize;
        let top = spec.top as usize;
        for (y, row) in pixels.chunks_exact(width).enumerate() {
            let start = (top + y) * new_width + left;
            out[start..start + width].copy_from_slice(row);
        }
    }
    out
}

impl PixelBuffer {
    /// Mirror across the vertical midline, in place.
    ///
    /// Its own inverse: applying it twice restores the original.
    pub fn flip_horizontal(&mut self) {
        let width = self.width() as usize;
        match self.data_mut() {
            PixelData::Grey8(v) => flip_rows(v, width),
            PixelData::GreyAlpha8(v) => flip_rows(v, width),
            PixelData::Rgb8(v) => flip_rows(v, width),
            PixelData::Rgba8(v) => flip_rows(v, width),
            PixelData::Bgr8(v) => flip_rows(v, width),
            PixelData::Bgra8(v) => flip_rows(v, width),
        }
    }

    /// Mirror across the horizontal midline, in place.
    ///
    /// Its own inverse: applying it twice restores the original.
    pub fn flip_vertical(&mut self) {
        let width = self.width() as usize;
        match self.data_mut() {
            PixelData::Grey8(v) => swap_row_pairs(v, width),
            PixelData::GreyAlpha8(v) => swap_row_pairs(v, width),
            PixelData::Rgb8(v) => swap_row_pairs(v, width),
            PixelData::Rgba8(v) => swap_row_pairs(v, width),
            PixelData::Bgr8(v) => swap_row_pairs(v, width),
            PixelData::Bgra8(v) => swap_row_pairs(v, width),
        }
    }

    /// Rotate a quarter turn clockwise, swapping width and height.
    ///
    /// The output pixel at (x, y) comes from the input at
    /// (y, height − 1 − x). Four applications restore the original.
    pub fn rotate_right_90(&mut self) {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let rotated = match self.data() {
            PixelData::Grey8(v) => PixelData::Grey8(rotate_right(v, width, height)),
            PixelData::GreyAlpha8(v) => PixelData::GreyAlpha8(rotate_right(v, width, height)),
            PixelData::Rgb8(v) => PixelData::Rgb8(rotate_right(v, width, height)),
            PixelData::Rgba8(v) => PixelData::Rgba8(rotate_right(v, width, height)),
            PixelData::Bgr8(v) => PixelData::Bgr8(rotate_right(v, width, height)),
            PixelData::Bgra8(v) => PixelData::Bgra8(rotate_right(v, width, height)),
        };
        *self = PixelBuffer::from_parts(self.height(), self.width(), rotated);
    }

    /// Rotate a quarter turn counterclockwise, swapping width and height.
    ///
    /// The output pixel at (x, y) comes from the input at
    /// (width − 1 − y, x). Four applications restore the original.
    pub fn rotate_left_90(&mut self) {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let rotated = match self.data() {
            PixelData::Grey8(v) => PixelData::Grey8(rotate_left(v, width, height)),
            PixelData::GreyAlpha8(v) => PixelData::GreyAlpha8(rotate_left(v, width, height)),
            PixelData::Rgb8(v) => PixelData::Rgb8(rotate_left(v, width, height)),
            PixelData::Rgba8(v) => PixelData::Rgba8(rotate_left(v, width, height)),
            PixelData::Bgr8(v) => PixelData::Bgr8(rotate_left(v, width, height)),
            PixelData::Bgra8(v) => PixelData::Bgra8(rotate_left(v, width, height)),
        };
        *self = PixelBuffer::from_parts(self.height(), self.width(), rotated);
    }

    /// Keep the region described by `rect`, replacing the storage.
    ///
    /// Bounds follow the one-based convention documented on [`CropRect`].
    /// A rejected rectangle leaves the buffer unchanged.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidGeometry`] for zero coordinates, inverted
    /// bounds, or a rectangle past the image.
    pub fn crop(&mut self, rect: CropRect) -> Result<(), RasterError> {
        rect.validate(self.width(), self.height())?;
        let width = self.width() as usize;
        let cropped = match self.data() {
            PixelData::Grey8(v) => PixelData::Grey8(crop_region(v, width, rect)),
            PixelData::GreyAlpha8(v) => PixelData::GreyAlpha8(crop_region(v, width, rect)),
            PixelData::Rgb8(v) => PixelData::Rgb8(crop_region(v, width, rect)),
            PixelData::Rgba8(v) => PixelData::Rgba8(crop_region(v, width, rect)),
            PixelData::Bgr8(v) => PixelData::Bgr8(crop_region(v, width, rect)),
            PixelData::Bgra8(v) => PixelData::Bgra8(crop_region(v, width, rect)),
        };
        *self = PixelBuffer::from_parts(rect.x2 - rect.x1, rect.y2 - rect.y1, cropped);
        Ok(())
    }

    /// Grow the canvas by `spec`, placing the original at (left, top) and
    /// setting every new position to `fill`.
    ///
    /// # Errors
    ///
    /// [`RasterError::FormatMismatch`] if `fill` is not in the buffer's
    /// format; [`RasterError::PixelCountExceeded`] if the grown canvas
    /// passes the pixel cap. Either failure leaves the buffer unchanged.
    pub fn pad(&mut self, spec: PadSpec, fill: Pixel) -> Result<(), RasterError> {
        let new_width = u64::from(self.width()) + u64::from(spec.left) + u64::from(spec.right);
        let new_height = u64::from(self.height()) + u64::from(spec.top) + u64::from(spec.bottom);
        let count = new_width.saturating_mul(new_height);
        if count > DEFAULT_PIXEL_LIMIT
            || new_width > u64::from(u32::MAX)
            || new_height > u64::from(u32::MAX)
        {
            return Err(RasterError::PixelCountExceeded {
                actual: count,
                max: DEFAULT_PIXEL_LIMIT,
            });
        }
        let width = self.width() as usize;
        let (nw, nh) = (new_width as usize, new_height as usize);
        let padded = match (self.data(), fill) {
            (PixelData::Grey8(v), Pixel::Grey8(p)) => {
                PixelData::Grey8(pad_region(v, width, spec, p, nw, nh))
            }
            (PixelData::GreyAlpha8(v), Pixel::GreyAlpha8(p)) => {
                PixelData::GreyAlpha8(pad_region(v, width, spec, p, nw, nh))
            }
            (PixelData::Rgb8(v), Pixel::Rgb8(p)) => {
                PixelData::Rgb8(pad_region(v, width, spec, p, nw, nh))
            }
            (PixelData::Rgba8(v), Pixel::Rgba8(p)) => {
                PixelData::Rgba8(pad_region(v, width, spec, p, nw, nh))
            }
            (PixelData::Bgr8(v), Pixel::Bgr8(p)) => {
                PixelData::Bgr8(pad_region(v, width, spec, p, nw, nh))
            }
            (PixelData::Bgra8(v), Pixel::Bgra8(p)) => {
                PixelData::Bgra8(pad_region(v, width, spec, p, nw, nh))
            }
            _ => {
                return Err(RasterError::FormatMismatch {
                    format: self.format(),
                    operand: Operand::Format(fill.format()),
                });
            }
        };
        *self = PixelBuffer::from_parts(new_width as u32, new_height as u32, padded);
        Ok(())
    }

    /// [`pad`](Self::pad) with the same amount on all four sides.
    pub fn pad_border_equal(&mut self, amount: u32, fill: Pixel) -> Result<(), RasterError> {
        self.pad(PadSpec::uniform(amount), fill)
    }

    /// [`pad`](Self::pad) above the image only.
    pub fn pad_top(&mut self, amount: u32, fill: Pixel) -> Result<(), RasterError> {
        self.pad(
            PadSpec {
                top: amount,
                ..PadSpec::default()
            },
            fill,
        )
    }

    /// [`pad`](Self::pad) below the image only.
    pub fn pad_bottom(&mut self, amount: u32, fill: Pixel) -> Result<(), RasterError> {
        self.pad(
            PadSpec {
                bottom: amount,
                ..PadSpec::default()
            },
            fill,
        )
    }

    /// [`pad`](Self::pad) on the left side only.
    pub fn pad_left(&mut self, amount: u32, fill: Pixel) -> Result<(), RasterError> {
        self.pad(
            PadSpec {
                left: amount,
                ..PadSpec::default()
            },
            fill,
        )
    }

    /// [`pad`](Self::pad) on the right side only.
    pub fn pad_right(&mut self, amount: u32, fill: Pixel) -> Result<(), RasterError> {
        self.pad(
            PadSpec {
                right: amount,
                ..PadSpec::default()
            },
            fill,
        )
    }

    /// Declared but not implemented.
    ///
    /// # Errors
    ///
    /// Always [`RasterError::UnsupportedOperation`].
    pub fn resize(&mut self, _width: u32, _height: u32) -> Result<(), RasterError> {
        Err(RasterError::UnsupportedOperation {
            operation: "resize",
        })
    }

    /// Declared but not implemented.
    ///
    /// # Errors
    ///
    /// Always [`RasterError::UnsupportedOperation`].
    pub fn rescale(&mut self, _factor: f32) -> Result<(), RasterError> {
        Err(RasterError::UnsupportedOperation {
            operation: "rescale",
        })
    }

    /// Declared but not implemented.
    ///
    /// # Errors
    ///
    /// Always [`RasterError::UnsupportedOperation`].
    pub fn blur(&mut self, _sigma: f32) -> Result<(), RasterError> {
        Err(RasterError::UnsupportedOperation { operation: "blur" })
    }
}
