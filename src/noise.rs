//! Noise injection: Gaussian channel noise and salt-and-pepper speckle.
//!
//! The random source is always a caller-supplied [`rand::Rng`], so seeding
//! and reproducibility stay in the caller's hands.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::buffer::{PixelBuffer, PixelData};
use crate::error::RasterError;
use crate::format::PixelFormat;
use crate::pixel::clamp_channel;

/// Validated parameters for Gaussian channel noise.
#[derive(Clone, Copy, Debug)]
pub struct GaussianNoise {
    mean: f32,
    std_dev: f32,
    normal: Normal<f32>,
}

impl GaussianNoise {
    /// # Errors
    ///
    /// [`RasterError::InvalidNoise`] unless `mean` is finite and `std_dev`
    /// is finite and non-negative. A zero `std_dev` is legal and yields a
    /// constant shift.
    pub fn new(mean: f32, std_dev: f32) -> Result<Self, RasterError> {
        if !mean.is_finite() {
            return Err(RasterError::InvalidNoise {
                reason: "mean must be finite",
            });
        }
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(RasterError::InvalidNoise {
                reason: "standard deviation must be finite and non-negative",
            });
        }
        let normal = Normal::new(mean, std_dev).map_err(|_| RasterError::InvalidNoise {
            reason: "standard deviation must be finite and non-negative",
        })?;
        Ok(Self {
            mean,
            std_dev,
            normal,
        })
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn std_dev(&self) -> f32 {
        self.std_dev
    }
}

/// Validated parameters for salt-and-pepper speckle.
///
/// `probability` is the total corruption rate, split evenly between pepper
/// (0) and salt (255). The limits bound the uniform draw compared against
/// the two thresholds; [`new`](Self::new) uses the standard [0, 1] band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaltAndPepper {
    probability: f32,
    low_limit: f32,
    high_limit: f32,
}

impl SaltAndPepper {
    /// # Errors
    ///
    /// [`RasterError::InvalidNoise`] if `probability` is not finite.
    pub fn new(probability: f32) -> Result<Self, RasterError> {
        Self::with_limits(probability, 0.0, 1.0)
    }

    /// # Errors
    ///
    /// [`RasterError::InvalidNoise`] unless `probability` is finite and the
    /// limits are finite with `low_limit <= high_limit`.
    pub fn with_limits(
        probability: f32,
        low_limit: f32,
        high_limit: f32,
    ) -> Result<Self, RasterError> {
        if !probability.is_finite() {
            return Err(RasterError::InvalidNoise {
                reason: "probability must be finite",
            });
        }
        if !low_limit.is_finite() || !high_limit.is_finite() || low_limit > high_limit {
            return Err(RasterError::InvalidNoise {
                reason: "limits must be finite with low <= high",
            });
        }
        Ok(Self {
            probability,
            low_limit,
            high_limit,
        })
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn low_limit(&self) -> f32 {
        self.low_limit
    }

    pub fn high_limit(&self) -> f32 {
        self.high_limit
    }
}

impl PixelBuffer {
    /// Add an independent Gaussian sample to every grey and color channel,
    /// clamped. Alpha is untouched.
    pub fn add_gaussian_noise(&mut self, noise: GaussianNoise, rng: &mut impl Rng) {
        match self.data_mut() {
            PixelData::Grey8(v) => {
                for p in v.iter_mut() {
                    p.0 = clamp_channel(p.0 as f32 + noise.normal.sample(rng));
                }
            }
            PixelData::GreyAlpha8(v) => {
                for p in v.iter_mut() {
                    p.0 = clamp_channel(p.0 as f32 + noise.normal.sample(rng));
                }
            }
            PixelData::Rgb8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 + noise.normal.sample(rng));
                    p.g = clamp_channel(p.g as f32 + noise.normal.sample(rng));
                    p.b = clamp_channel(p.b as f32 + noise.normal.sample(rng));
                }
            }
            PixelData::Rgba8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 + noise.normal.sample(rng));
                    p.g = clamp_channel(p.g as f32 + noise.normal.sample(rng));
                    p.b = clamp_channel(p.b as f32 + noise.normal.sample(rng));
                }
            }
            PixelData::Bgr8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 + noise.normal.sample(rng));
                    p.g = clamp_channel(p.g as f32 + noise.normal.sample(rng));
                    p.b = clamp_channel(p.b as f32 + noise.normal.sample(rng));
                }
            }
            PixelData::Bgra8(v) => {
                for p in v.iter_mut() {
                    p.r = clamp_channel(p.r as f32 + noise.normal.sample(rng));
                    p.g = clamp_channel(p.g as f32 + noise.normal.sample(rng));
                    p.b = clamp_channel(p.b as f32 + noise.normal.sample(rng));
                }
            }
        }
    }

    /// A zero-filled buffer with Gaussian noise applied.
    ///
    /// Color and grey channels carry clamped samples; alpha channels stay 0.
    ///
    /// # Errors
    ///
    /// [`RasterError::PixelCountExceeded`] if the dimensions pass the
    /// pixel cap.
    pub fn from_gaussian_noise(
        width: u32,
        height: u32,
        format: PixelFormat,
        noise: GaussianNoise,
        rng: &mut impl Rng,
    ) -> Result<PixelBuffer, RasterError> {
        let mut buffer = PixelBuffer::new(width, height, format)?;
        buffer.add_gaussian_noise(noise, rng);
        Ok(buffer)
    }

    /// Speckle a luminance-reduced copy of the buffer.
    ///
    /// The source is first reduced with
    /// [`grey_scale_lum`](Self::grey_scale_lum) (the source itself is
    /// untouched). Each resulting pixel then draws one uniform sample `u`
    /// from `[low_limit, high_limit]`: `u < probability/2` forces the grey
    /// channel to 0, `u > 1 - probability/2` forces it to 255, anything
    /// between leaves it alone. Alpha, when present, is carried through
    /// unmodified.
    pub fn add_salt_and_pepper_noise(
        &self,
        noise: SaltAndPepper,
        rng: &mut impl Rng,
    ) -> PixelBuffer {
        let mut out = self.grey_scale_lum();
        let pepper = noise.probability / 2.0;
        let salt = 1.0 - noise.probability / 2.0;
        let mut speckle = |value: &mut u8| {
            let u: f32 = rng.random_range(noise.low_limit..=noise.high_limit);
            if u < pepper {
                *value = 0;
            } else if u > salt {
                *value = 255;
            }
        };
        match out.data_mut() {
            PixelData::Grey8(v) => {
                for p in v.iter_mut() {
                    speckle(&mut p.0);
                }
            }
            PixelData::GreyAlpha8(v) => {
                for p in v.iter_mut() {
                    speckle(&mut p.0);
                }
            }
            // grey_scale_lum only produces the two arms above.
            _ => {}
        }
        out
    }
}
