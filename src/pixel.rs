//! Tagged pixel values and saturating channel arithmetic.
//!
//! [`Pixel`] pairs one pixel's channels with its [`PixelFormat`] so buffer
//! operations can hand out and accept scalars without losing the format tag.
//! All arithmetic runs through [`clamp_channel`], which saturates to the
//! byte range instead of wrapping.

use rgb::alt::{BGR, BGRA, Gray, GrayAlpha};
use rgb::{Rgb, Rgba};

use crate::error::{Operand, RasterError};
use crate::format::PixelFormat;

/// Saturate an arithmetic result to the byte range.
///
/// Values at or below 0.0 clamp to 0, values at or above 255.0 clamp to
/// 255, and anything in between truncates toward zero. NaN resolves to 0.
pub fn clamp_channel(value: f32) -> u8 {
    if value >= 255.0 {
        255
    } else if value <= 0.0 {
        0
    } else {
        value as u8
    }
}

/// A single pixel value tagged with its format.
///
/// The variant mirrors [`PixelFormat`], so a `Pixel` read out of a buffer
/// carries enough information to be written back, compared, or combined
/// without consulting the buffer again. Constructors take channels in
/// logical r, g, b order even for the BGR-stored layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pixel {
    Grey8(Gray<u8>),
    GreyAlpha8(GrayAlpha<u8>),
    Rgb8(Rgb<u8>),
    Rgba8(Rgba<u8>),
    Bgr8(BGR<u8>),
    Bgra8(BGRA<u8>),
}

impl Pixel {
    /// Single grey channel.
    pub fn grey8(value: u8) -> Self {
        Pixel::Grey8(Gray(value))
    }

    /// Grey plus alpha.
    pub fn grey_alpha8(value: u8, alpha: u8) -> Self {
        Pixel::GreyAlpha8(GrayAlpha(value, alpha))
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Pixel::Rgb8(Rgb { r, g, b })
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel::Rgba8(Rgba { r, g, b, a })
    }

    /// BGR-stored pixel; arguments stay in logical r, g, b order.
    pub fn bgr8(r: u8, g: u8, b: u8) -> Self {
        Pixel::Bgr8(BGR { b, g, r })
    }

    /// BGRA-stored pixel; arguments stay in logical r, g, b order.
    pub fn bgra8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel::Bgra8(BGRA { b, g, r, a })
    }

    /// The format this pixel belongs to.
    pub const fn format(self) -> PixelFormat {
        match self {
            Pixel::Grey8(_) => PixelFormat::Grey8,
            Pixel::GreyAlpha8(_) => PixelFormat::GreyAlpha8,
            Pixel::Rgb8(_) => PixelFormat::Rgb8,
            Pixel::Rgba8(_) => PixelFormat::Rgba8,
            Pixel::Bgr8(_) => PixelFormat::Bgr8,
            Pixel::Bgra8(_) => PixelFormat::Bgra8,
        }
    }

    /// Red channel, if the format has color channels.
    pub fn red(self) -> Option<u8> {
        match self {
            Pixel::Rgb8(p) => Some(p.r),
            Pixel::Rgba8(p) => Some(p.r),
            Pixel::Bgr8(p) => Some(p.r),
            Pixel::Bgra8(p) => Some(p.r),
            Pixel::Grey8(_) | Pixel::GreyAlpha8(_) => None,
        }
    }

    /// Green channel, if the format has color channels.
    pub fn green(self) -> Option<u8> {
        match self {
            Pixel::Rgb8(p) => Some(p.g),
            Pixel::Rgba8(p) => Some(p.g),
            Pixel::Bgr8(p) => Some(p.g),
            Pixel::Bgra8(p) => Some(p.g),
            Pixel::Grey8(_) | Pixel::GreyAlpha8(_) => None,
        }
    }

    /// Blue channel, if the format has color channels.
    pub fn blue(self) -> Option<u8> {
        match self {
            Pixel::Rgb8(p) => Some(p.b),
            Pixel::Rgba8(p) => Some(p.b),
            Pixel::Bgr8(p) => Some(p.b),
            Pixel::Bgra8(p) => Some(p.b),
            Pixel::Grey8(_) | Pixel::GreyAlpha8(_) => None,
        }
    }

    /// Grey channel, if the format is grayscale.
    pub fn grey(self) -> Option<u8> {
        match self {
            Pixel::Grey8(p) => Some(p.0),
            Pixel::GreyAlpha8(p) => Some(p.0),
            _ => None,
        }
    }

    /// Alpha channel, if the format has one.
    pub fn alpha(self) -> Option<u8> {
        match self {
            Pixel::GreyAlpha8(p) => Some(p.1),
            Pixel::Rgba8(p) => Some(p.a),
            Pixel::Bgra8(p) => Some(p.a),
            Pixel::Grey8(_) | Pixel::Rgb8(_) | Pixel::Bgr8(_) => None,
        }
    }

    /// Channel-wise saturating addition. Both pixels must share a format.
    pub fn saturating_add(self, rhs: Pixel) -> Result<Pixel, RasterError> {
        self.zip(rhs, |a, b| a + b)
    }

    /// Channel-wise saturating subtraction. Both pixels must share a format.
    pub fn saturating_sub(self, rhs: Pixel) -> Result<Pixel, RasterError> {
        self.zip(rhs, |a, b| a - b)
    }

    /// Channel-wise saturating multiplication. Both pixels must share a format.
    pub fn saturating_mul(self, rhs: Pixel) -> Result<Pixel, RasterError> {
        self.zip(rhs, |a, b| a * b)
    }

    /// Channel-wise saturating division. Both pixels must share a format.
    ///
    /// Division by a zero channel saturates: x/0 clamps to 255 for x > 0,
    /// and 0/0 resolves to 0.
    pub fn saturating_div(self, rhs: Pixel) -> Result<Pixel, RasterError> {
        self.zip(rhs, |a, b| a / b)
    }

    /// Add slice operands channel-wise, saturating.
    ///
    /// A slice of 1 or 2 elements fits the grayscale formats (element 1 is
    /// alpha, when the format has one); a slice of 3 or 4 fits the color
    /// formats, addressed in logical r, g, b order with element 3 as alpha.
    /// Channels without a slice element pass through unchanged; any other
    /// arity fails with [`RasterError::FormatMismatch`].
    pub fn saturating_add_slice(self, operands: &[f32]) -> Result<Pixel, RasterError> {
        self.combine_slice(operands, |c, v| c + v)
    }

    /// Subtract slice operands channel-wise, saturating.
    ///
    /// Arity rules match [`saturating_add_slice`](Self::saturating_add_slice).
    pub fn saturating_sub_slice(self, operands: &[f32]) -> Result<Pixel, RasterError> {
        self.combine_slice(operands, |c, v| c - v)
    }

    /// Multiply by slice operands channel-wise, saturating.
    ///
    /// Arity rules match [`saturating_add_slice`](Self::saturating_add_slice).
    pub fn saturating_mul_slice(self, operands: &[f32]) -> Result<Pixel, RasterError> {
        self.combine_slice(operands, |c, v| c * v)
    }

    /// Divide by slice operands channel-wise, saturating.
    ///
    /// Arity rules match [`saturating_add_slice`](Self::saturating_add_slice);
    /// zero divisors saturate as in [`saturating_div`](Self::saturating_div).
    pub fn saturating_div_slice(self, operands: &[f32]) -> Result<Pixel, RasterError> {
        self.combine_slice(operands, |c, v| c / v)
    }

    /// Invert every color or grey channel (255 − v). Alpha is untouched.
    pub fn saturating_negate(self) -> Pixel {
        match self {
            Pixel::Grey8(p) => Pixel::Grey8(Gray(255 - p.0)),
            Pixel::GreyAlpha8(p) => Pixel::GreyAlpha8(GrayAlpha(255 - p.0, p.1)),
            Pixel::Rgb8(p) => Pixel::Rgb8(Rgb {
                r: 255 - p.r,
                g: 255 - p.g,
                b: 255 - p.b,
            }),
            Pixel::Rgba8(p) => Pixel::Rgba8(Rgba {
                r: 255 - p.r,
                g: 255 - p.g,
                b: 255 - p.b,
                a: p.a,
            }),
            Pixel::Bgr8(p) => Pixel::Bgr8(BGR {
                b: 255 - p.b,
                g: 255 - p.g,
                r: 255 - p.r,
            }),
            Pixel::Bgra8(p) => Pixel::Bgra8(BGRA {
                b: 255 - p.b,
                g: 255 - p.g,
                r: 255 - p.r,
                a: p.a,
            }),
        }
    }

    fn zip(self, rhs: Pixel, op: impl Fn(f32, f32) -> f32) -> Result<Pixel, RasterError> {
        let combine = |a: u8, b: u8| clamp_channel(op(a as f32, b as f32));
        match (self, rhs) {
            (Pixel::Grey8(a), Pixel::Grey8(b)) => Ok(Pixel::Grey8(Gray(combine(a.0, b.0)))),
            (Pixel::GreyAlpha8(a), Pixel::GreyAlpha8(b)) => Ok(Pixel::GreyAlpha8(GrayAlpha(
                combine(a.0, b.0),
                combine(a.1, b.1),
            ))),
            (Pixel::Rgb8(a), Pixel::Rgb8(b)) => Ok(Pixel::Rgb8(Rgb {
                r: combine(a.r, b.r),
                g: combine(a.g, b.g),
                b: combine(a.b, b.b),
            })),
            (Pixel::Rgba8(a), Pixel::Rgba8(b)) => Ok(Pixel::Rgba8(Rgba {
                r: combine(a.r, b.r),
                g: combine(a.g, b.g),
                b: combine(a.b, b.b),
                a: combine(a.a, b.a),
            })),
            (Pixel::Bgr8(a), Pixel::Bgr8(b)) => Ok(Pixel::Bgr8(BGR {
                b: combine(a.b, b.b),
                g: combine(a.g, b.g),
                r: combine(a.r, b.r),
            })),
            (Pixel::Bgra8(a), Pixel::Bgra8(b)) => Ok(Pixel::Bgra8(BGRA {
                b: combine(a.b, b.b),
                g: combine(a.g, b.g),
                r: combine(a.r, b.r),
                a: combine(a.a, b.a),
            })),
            _ => Err(RasterError::FormatMismatch {
                format: self.format(),
                operand: Operand::Format(rhs.format()),
            }),
        }
    }

    fn combine_slice(
        self,
        operands: &[f32],
        op: impl Fn(f32, f32) -> f32,
    ) -> Result<Pixel, RasterError> {
        let combine = |channel: u8, operand: f32| clamp_channel(op(channel as f32, operand));
        match (self, operands) {
            (Pixel::Grey8(p), [v]) => Ok(Pixel::Grey8(Gray(combine(p.0, *v)))),
            (Pixel::GreyAlpha8(p), [v]) => {
                Ok(Pixel::GreyAlpha8(GrayAlpha(combine(p.0, *v), p.1)))
            }
            (Pixel::GreyAlpha8(p), [v, a]) => Ok(Pixel::GreyAlpha8(GrayAlpha(
                combine(p.0, *v),
                combine(p.1, *a),
            ))),
            (Pixel::Rgb8(p), [r, g, b]) => Ok(Pixel::Rgb8(Rgb {
                r: combine(p.r, *r),
                g: combine(p.g, *g),
                b: combine(p.b, *b),
            })),
            (Pixel::Rgba8(p), [r, g, b]) => Ok(Pixel::Rgba8(Rgba {
                r: combine(p.r, *r),
                g: combine(p.g, *g),
                b: combine(p.b, *b),
                a: p.a,
            })),
            (Pixel::Rgba8(p), [r, g, b, a]) => Ok(Pixel::Rgba8(Rgba {
                r: combine(p.r, *r),
                g: combine(p.g, *g),
                b: combine(p.b, *b),
                a: combine(p.a, *a),
            })),
            (Pixel::Bgr8(p), [r, g, b]) => Ok(Pixel::Bgr8(BGR {
                b: combine(p.b, *b),
                g: combine(p.g, *g),
                r: combine(p.r, *r),
            })),
            (Pixel::Bgra8(p), [r, g, b]) => Ok(Pixel::Bgra8(BGRA {
                b: combine(p.b, *b),
                g: combine(p.g, *g),
                r: combine(p.r, *r),
                a: p.a,
            })),
            (Pixel::Bgra8(p), [r, g, b, a]) => Ok(Pixel::Bgra8(BGRA {
                b: combine(p.b, *b),
                g: combine(p.g, *g),
                r: combine(p.r, *r),
                a: combine(p.a, *a),
            })),
            _ => Err(RasterError::FormatMismatch {
                format: self.format(),
                operand: Operand::Channels(operands.len()),
            }),
        }
    }
}
