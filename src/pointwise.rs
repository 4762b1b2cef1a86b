//! Pointwise transforms: channel masks, grayscale reduction, negation, and
//! pairwise buffer arithmetic.

use rgb::alt::{Gray, GrayAlpha};

use crate::buffer::{PixelBuffer, PixelData};
use crate::error::{Operand, RasterError};
use crate::pixel::{Pixel, clamp_channel};

impl PixelBuffer {
    /// Multiply every pixel's color channels by the three factors, clamped.
    ///
    /// Factors address logical r, g, b regardless of storage order, so the
    /// same call means the same thing on `Rgb8` and `Bgr8` data. Alpha is
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`RasterError::FormatMismatch`] on grayscale data, which has no color
    /// channels.
    pub fn color_mask(&mut self, r: f32, g: f32, b: f32) -> Result<(), RasterError> {
        let format = self.format();
        match self.data_mut() {
            PixelData::Grey8(_) | PixelData::GreyAlpha8(_) => {
                return Err(RasterError::FormatMismatch {
                    format,
                    operand: Operand::Color,
                });
            }
            PixelData::Rgb8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 * r);
                    p.g = clamp_channel(p.g as f32 * g);
                    p.b = clamp_channel(p.b as f32 * b);
                }
            }
            PixelData::Rgba8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 * r);
                    p.g = clamp_channel(p.g as f32 * g);
                    p.b = clamp_channel(p.b as f32 * b);
                }
            }
            PixelData::Bgr8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 * r);
                    p.g = clamp_channel(p.g as f32 * g);
                    p.b = clamp_channel(p.b as f32 * b);
                }
            }
            PixelData::Bgra8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 * r);
                    p.g = clamp_channel(p.g as f32 * g);
                    p.b = clamp_channel(p.b as f32 * b);
                }
            }
        }
        Ok(())
    }

    /// Add `delta` to every pixel's alpha channel, clamped.
    ///
    /// # Errors
    ///
    /// [`RasterError::FormatMismatch`] if the format carries no alpha.
    pub fn alpha_mask(&mut self, delta: f32) -> Result<(), RasterError> {
        let format = self.format();
        match self.data_mut() {
            PixelData::GreyAlpha8(v) => {
                for p in v.iter_mut() {
                    p.1 = clamp_channel(p.1 as f32 + delta);
                }
            }
            PixelData::Rgba8(v) => {
                for p in v.iter_mut() {
                    p.a = clamp_channel(p.a as f32 + delta);
                }
            }
            PixelData::Bgra8(v) => {
                for p in v.iter_mut() {
                    p.a = clamp_channel(p.a as f32 + delta);
                }
            }
            PixelData::Grey8(_) | PixelData::Rgb8(_) | PixelData::Bgr8(_) => {
                return Err(RasterError::FormatMismatch {
                    format,
                    operand: Operand::Alpha,
                });
            }
        }
        Ok(())
    }

    /// Reduce to grayscale using the unweighted channel mean.
    ///
    /// Sources with alpha become `GreyAlpha8` with alpha copied through;
    /// sources without become `Grey8`. Already-grayscale data comes back as
    /// an unchanged copy, with a warning.
    pub fn grey_scale_avg(&self) -> PixelBuffer {
        self.reduce_grey(|r, g, b| (r + g + b) / 3.0)
    }

    /// Reduce to grayscale using Rec. 709 luminance weights
    /// (0.2126 r + 0.7152 g + 0.0722 b).
    ///
    /// Output formats follow the same rule as
    /// [`grey_scale_avg`](Self::grey_scale_avg).
    pub fn grey_scale_lum(&self) -> PixelBuffer {
        self.reduce_grey(|r, g, b| 0.2126 * r + 0.7152 * g + 0.0722 * b)
    }

    fn reduce_grey(&self, weight: impl Fn(f32, f32, f32) -> f32) -> PixelBuffer {
        let reduced = match self.data() {
            PixelData::Grey8(_) | PixelData::GreyAlpha8(_) => {
                log::warn!("{self:?} is already grayscale; returning an unchanged copy");
                return self.clone();
            }
            PixelData::Rgb8(v) => PixelData::Grey8(
                v.iter()
                    .map(|p| Gray(clamp_channel(weight(p.r as f32, p.g as f32, p.b as f32))))
                    .collect(),
            ),
            PixelData::Rgba8(v) => PixelData::GreyAlpha8(
                v.iter()
                    .map(|p| {
                        GrayAlpha(
                            clamp_channel(weight(p.r as f32, p.g as f32, p.b as f32)),
                            p.a,
                        )
                    })
                    .collect(),
            ),
            PixelData::Bgr8(v) => PixelData::Grey8(
                v.iter()
                    .map(|p| Gray(clamp_channel(weight(p.r as f32, p.g as f32, p.b as f32))))
                    .collect(),
            ),
            PixelData::Bgra8(v) => PixelData::GreyAlpha8(
                v.iter()
                    .map(|p| {
                        GrayAlpha(
                            clamp_channel(weight(p.r as f32, p.g as f32, p.b as f32)),
                            p.a,
                        )
                    })
                    .collect(),
            ),
        };
        PixelBuffer::from_parts(self.width(), self.height(), reduced)
    }

    /// Invert every grey and color channel (v becomes 255 − v), in place.
    /// Alpha is untouched.
    pub fn saturating_negate(&mut self) {
        match self.data_mut() {
            PixelData::Grey8(v) => {
                for p in v.iter_mut() {
                    p.0 = 255 - p.0;
                }
            }
            PixelData::GreyAlpha8(v) => {
                for p in v.iter_mut() {
                    p.0 = 255 - p.0;
                }
            }
            PixelData::Rgb8(v) => {
                for p in v.iter_mut() {
                    p.r = 255 - p.r;
                    p.g = 255 - p.g;
                    p.b = 255 - p.b;
                }
            }
            PixelData::Rgba8(v) => {
                for p in v.iter_mut() {
                    p.r = 255 - p.r;
                    p.g = 255 - p.g;
                    p.b = 255 - p.b;
                }
            }
            PixelData::Bgr8(v) => {
                for p in v.iter_mut() {
                    p.r = 255 - p.r;
                    p.g = 255 - p.g;
                    p.b = 255 - p.b;
                }
            }
            PixelData::Bgra8(v) => {
                for p in v.iter_mut() {
                    p.r = 255 - p.r;
                    p.g = 255 - p.g;
                    p.b = 255 - p.b;
                }
            }
        }
    }

    /// Add another buffer pixel by pixel, channels clamped independently.
    ///
    /// The result spans the larger of the two sizes on each axis, and each
    /// operand repeats modulo its own size: the pixel at (x, y) combines
    /// `self[x % self.width, y % self.height]` with the same indexing into
    /// `other`. Equal-size inputs therefore combine position by position,
    /// and a small buffer tiles across a large one.
    ///
    /// # Errors
    ///
    /// [`RasterError::FormatMismatch`] when the formats differ;
    /// [`RasterError::InvalidGeometry`] when either operand is empty;
    /// [`RasterError::PixelCountExceeded`] when the combined span passes
    /// the pixel cap.
    pub fn saturating_add(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.pairwise(other, Pixel::saturating_add)
    }

    /// Subtract another buffer pixel by pixel, channels clamped
    /// independently. Sizing and tiling follow
    /// [`saturating_add`](Self::saturating_add).
    ///
    /// # Errors
    ///
    /// [`RasterError::FormatMismatch`] when the formats differ;
    /// [`RasterError::InvalidGeometry`] when either operand is empty;
    /// [`RasterError::PixelCountExceeded`] when the combined span passes
    /// the pixel cap.
    pub fn saturating_sub(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.pairwise(other, Pixel::saturating_sub)
    }

    fn pairwise(
        &self,
        other: &PixelBuffer,
        op: fn(Pixel, Pixel) -> Result<Pixel, RasterError>,
    ) -> Result<PixelBuffer, RasterError> {
        if self.format() != other.format() {
            return Err(RasterError::FormatMismatch {
                format: self.format(),
                operand: Operand::Format(other.format()),
            });
        }
        if self.is_empty() || other.is_empty() {
            return Err(RasterError::InvalidGeometry {
                reason: "pairwise arithmetic needs two non-empty buffers",
            });
        }
        let width = self.width().max(other.width());
        let height = self.height().max(other.height());
        let mut out = PixelBuffer::new(width, height, self.format())?;
        for y in 0..height {
            for x in 0..width {
                let a = self.pixel_at(x % self.width(), y % self.height())?;
                let b = other.pixel_at(x % other.width(), y % other.height())?;
                out.set_pixel_at(x, y, op(a, b)?)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;

    // --- masks ---

    #[test]
    fn color_mask_scales_color_channels() {
        let mut buf = PixelBuffer::filled(2, 2, Pixel::rgb8(100, 100, 100)).unwrap();
        buf.color_mask(0.5, 1.0, 2.0).unwrap();
        assert_eq!(buf.pixel_at(1, 1).unwrap(), Pixel::rgb8(50, 100, 200));
    }

    #[test]
    fn color_mask_addresses_bgr_logically() {
        let mut buf = PixelBuffer::filled(1, 1, Pixel::bgra8(10, 20, 30, 40)).unwrap();
        buf.color_mask(2.0, 1.0, 0.5).unwrap();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::bgra8(20, 20, 15, 40));
    }

    #[test]
    fn color_mask_leaves_alpha() {
        let mut buf = PixelBuffer::filled(1, 1, Pixel::rgba8(10, 10, 10, 77)).unwrap();
        buf.color_mask(2.0, 2.0, 2.0).unwrap();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::rgba8(20, 20, 20, 77));
    }

    #[test]
    fn color_mask_clamps() {
        let mut buf = PixelBuffer::filled(1, 1, Pixel::rgb8(200, 100, 3)).unwrap();
        buf.color_mask(2.0, -1.0, 0.999).unwrap();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::rgb8(255, 0, 2));
    }

    #[test]
    fn color_mask_rejects_grayscale() {
        let mut grey = PixelBuffer::new(2, 2, PixelFormat::Grey8).unwrap();
        assert_eq!(
            grey.color_mask(1.0, 1.0, 1.0).unwrap_err(),
            RasterError::FormatMismatch {
                format: PixelFormat::Grey8,
                operand: Operand::Color,
            }
        );
        let mut grey_alpha = PixelBuffer::new(2, 2, PixelFormat::GreyAlpha8).unwrap();
        assert!(grey_alpha.color_mask(1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn alpha_mask_shifts_alpha() {
        let mut buf = PixelBuffer::filled(1, 1, Pixel::rgba8(5, 5, 5, 100)).unwrap();
        buf.alpha_mask(-30.5).unwrap();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::rgba8(5, 5, 5, 69));

        let mut buf = PixelBuffer::filled(1, 1, Pixel::grey_alpha8(9, 10)).unwrap();
        buf.alpha_mask(300.0).unwrap();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::grey_alpha8(9, 255));
    }

    #[test]
    fn alpha_mask_rejects_opaque_formats() {
        for format in [PixelFormat::Grey8, PixelFormat::Rgb8, PixelFormat::Bgr8] {
            let mut buf = PixelBuffer::new(1, 1, format).unwrap();
            assert_eq!(
                buf.alpha_mask(1.0).unwrap_err(),
                RasterError::FormatMismatch {
                    format,
                    operand: Operand::Alpha,
                }
            );
        }
    }

    // --- grayscale reduction ---

    #[test]
    fn average_reduction_uses_the_mean() {
        let buf = PixelBuffer::filled(2, 3, Pixel::rgb8(10, 20, 33)).unwrap();
        let grey = buf.grey_scale_avg();
        assert_eq!(grey.format(), PixelFormat::Grey8);
        assert_eq!((grey.width(), grey.height()), (2, 3));
        assert_eq!(grey.pixel_at(1, 2).unwrap(), Pixel::grey8(21));
    }

    #[test]
    fn luminance_reduction_weights_channels() {
        let buf = PixelBuffer::filled(1, 1, Pixel::rgb8(255, 0, 0)).unwrap();
        let grey = buf.grey_scale_lum();
        assert_eq!(grey.pixel_at(0, 0).unwrap(), Pixel::grey8(54));
    }

    #[test]
    fn luminance_of_neutral_input_is_stable() {
        for v in [0u8, 17, 100, 200, 255] {
            let buf = PixelBuffer::filled(1, 1, Pixel::rgb8(v, v, v)).unwrap();
            let grey = buf.grey_scale_lum();
            let Some(out) = grey.pixel_at(0, 0).unwrap().grey() else {
                panic!("expected grayscale output");
            };
            assert!(out.abs_diff(v) <= 1, "value {v} drifted to {out}");
        }
    }

    #[test]
    fn reduction_carries_alpha() {
        let buf = PixelBuffer::filled(2, 2, Pixel::rgba8(50, 100, 150, 200)).unwrap();
        let grey = buf.grey_scale_avg();
        assert_eq!(grey.format(), PixelFormat::GreyAlpha8);
        assert_eq!(grey.pixel_at(0, 0).unwrap(), Pixel::grey_alpha8(100, 200));
    }

    #[test]
    fn bgr_reduces_logically() {
        let rgb = PixelBuffer::filled(1, 1, Pixel::rgb8(10, 20, 30)).unwrap();
        let bgr = PixelBuffer::filled(1, 1, Pixel::bgr8(10, 20, 30)).unwrap();
        assert_eq!(
            rgb.grey_scale_lum().pixel_at(0, 0).unwrap(),
            bgr.grey_scale_lum().pixel_at(0, 0).unwrap(),
        );
    }

    #[test]
    fn grayscale_source_comes_back_unchanged() {
        let buf = PixelBuffer::filled(2, 2, Pixel::grey8(123)).unwrap();
        let out = buf.grey_scale_avg();
        assert_eq!(out, buf);
        let buf = PixelBuffer::filled(2, 2, Pixel::grey_alpha8(1, 2)).unwrap();
        let out = buf.grey_scale_lum();
        assert_eq!(out, buf);
    }

    // --- negation ---

    #[test]
    fn negate_inverts_color_channels() {
        let mut buf = PixelBuffer::filled(2, 1, Pixel::rgb8(1, 2, 3)).unwrap();
        buf.saturating_negate();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::rgb8(254, 253, 252));
    }

    #[test]
    fn negate_preserves_alpha() {
        let mut buf = PixelBuffer::filled(1, 1, Pixel::rgba8(0, 100, 255, 40)).unwrap();
        buf.saturating_negate();
        assert_eq!(buf.pixel_at(0, 0).unwrap(), Pixel::rgba8(255, 155, 0, 40));
    }

    #[test]
    fn negate_twice_restores() {
        let original = PixelBuffer::filled(3, 2, Pixel::grey_alpha8(77, 12)).unwrap();
        let mut buf = original.clone();
        buf.saturating_negate();
        assert_ne!(buf, original);
        buf.saturating_negate();
        assert_eq!(buf, original);
    }

    // --- pairwise arithmetic ---

    #[test]
    fn adding_constant_buffers_sums_channels() {
        let a = PixelBuffer::filled(2, 2, Pixel::rgb8(10, 20, 30)).unwrap();
        let b = PixelBuffer::filled(2, 2, Pixel::rgb8(5, 6, 7)).unwrap();
        let sum = a.saturating_add(&b).unwrap();
        assert_eq!((sum.width(), sum.height()), (2, 2));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(sum.pixel_at(x, y).unwrap(), Pixel::rgb8(15, 26, 37));
            }
        }
    }

    #[test]
    fn addition_clamps_per_channel() {
        let a = PixelBuffer::filled(1, 1, Pixel::rgba8(200, 1, 2, 250)).unwrap();
        let b = PixelBuffer::filled(1, 1, Pixel::rgba8(100, 1, 2, 10)).unwrap();
        let sum = a.saturating_add(&b).unwrap();
        assert_eq!(sum.pixel_at(0, 0).unwrap(), Pixel::rgba8(255, 2, 4, 255));
    }

    #[test]
    fn subtraction_clamps_at_zero() {
        let a = PixelBuffer::filled(1, 1, Pixel::grey8(10)).unwrap();
        let b = PixelBuffer::filled(1, 1, Pixel::grey8(25)).unwrap();
        let diff = a.saturating_sub(&b).unwrap();
        assert_eq!(diff.pixel_at(0, 0).unwrap(), Pixel::grey8(0));
    }

    #[test]
    fn smaller_operand_tiles_across_the_larger() {
        let mut small = PixelBuffer::new(2, 2, PixelFormat::Grey8).unwrap();
        for (index, value) in [0u8, 1, 2, 3].into_iter().enumerate() {
            let (x, y) = (index as u32 % 2, index as u32 / 2);
            small.set_pixel_at(x, y, Pixel::grey8(value)).unwrap();
        }
        let large = PixelBuffer::filled(4, 4, Pixel::grey8(10)).unwrap();
        let sum = large.saturating_add(&small).unwrap();
        assert_eq!((sum.width(), sum.height()), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let expected = 10 + (x % 2 + (y % 2) * 2) as u8;
                assert_eq!(sum.pixel_at(x, y).unwrap(), Pixel::grey8(expected));
            }
        }
    }

    #[test]
    fn result_spans_max_dimensions_per_axis() {
        let mut row = PixelBuffer::new(3, 1, PixelFormat::Grey8).unwrap();
        for x in 0..3 {
            row.set_pixel_at(x, 0, Pixel::grey8(1 + x as u8)).unwrap();
        }
        let mut column = PixelBuffer::new(1, 2, PixelFormat::Grey8).unwrap();
        column.set_pixel_at(0, 0, Pixel::grey8(10)).unwrap();
        column.set_pixel_at(0, 1, Pixel::grey8(20)).unwrap();

        let sum = row.saturating_add(&column).unwrap();
        assert_eq!((sum.width(), sum.height()), (3, 2));
        for x in 0..3 {
            assert_eq!(sum.pixel_at(x, 0).unwrap(), Pixel::grey8(11 + x as u8));
            assert_eq!(sum.pixel_at(x, 1).unwrap(), Pixel::grey8(21 + x as u8));
        }
    }

    #[test]
    fn mismatched_formats_rejected() {
        let a = PixelBuffer::new(2, 2, PixelFormat::Rgb8).unwrap();
        let b = PixelBuffer::new(2, 2, PixelFormat::Bgr8).unwrap();
        assert_eq!(
            a.saturating_add(&b).unwrap_err(),
            RasterError::FormatMismatch {
                format: PixelFormat::Rgb8,
                operand: Operand::Format(PixelFormat::Bgr8),
            }
        );
    }

    #[test]
    fn empty_operands_rejected() {
        let empty = PixelBuffer::default();
        let full = PixelBuffer::filled(2, 2, Pixel::grey8(1)).unwrap();
        assert!(matches!(
            full.saturating_add(&empty).unwrap_err(),
            RasterError::InvalidGeometry { .. }
        ));
        assert!(matches!(
            empty.saturating_sub(&full).unwrap_err(),
            RasterError::InvalidGeometry { .. }
        ));
    }
}
