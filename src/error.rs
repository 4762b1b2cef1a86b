//! Error types for buffer and transform operations.
//!
//! [`RasterError`] is the crate-wide error enum. Every fallible operation
//! returns it directly; variants carry the values that made the operation
//! fail so callers can report or recover without re-deriving state.

use std::path::PathBuf;

use crate::format::PixelFormat;

/// The operand that failed a format compatibility check.
///
/// Carried by [`RasterError::FormatMismatch`] to say what was incompatible
/// with the subject's [`PixelFormat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operand {
    /// The other operand's pixel format.
    Format(PixelFormat),
    /// A slice operand with this many elements.
    Channels(usize),
    /// The operation requires an alpha channel.
    Alpha,
    /// The operation requires color channels.
    Color,
}

/// Errors from buffer construction, access, transforms, and file I/O.
///
/// Implements [`core::error::Error`] so callers can wrap it in their own
/// error types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RasterError {
    /// Save path has no file name or no extension.
    InvalidPath {
        /// The rejected path.
        path: PathBuf,
    },
    /// Strict save with an extension outside the writable set.
    UnsupportedContainerFormat {
        /// The unrecognized extension, lowercased.
        extension: String,
    },
    /// The source could not be read or decoded into a supported layout.
    DecodeFailure {
        /// What the decoder or inbound validation reported.
        reason: String,
    },
    /// A construction or transform would exceed the pixel cap.
    PixelCountExceeded {
        /// Requested pixel count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// An operand is incompatible with the subject's pixel format.
    FormatMismatch {
        /// The subject's format.
        format: PixelFormat,
        /// What failed to match it.
        operand: Operand,
    },
    /// Crop bounds or operand dimensions are unusable.
    InvalidGeometry {
        /// Which geometric requirement was violated.
        reason: &'static str,
    },
    /// The encoder reported an error; the buffer is unaffected.
    EncodeFailure {
        /// What the encoder reported.
        reason: String,
    },
    /// Pixel access outside the buffer's grid.
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },
    /// A declared operation with no implementation.
    UnsupportedOperation {
        /// The operation's name.
        operation: &'static str,
    },
    /// Noise parameters rejected at construction.
    InvalidNoise {
        /// Which parameter requirement was violated.
        reason: &'static str,
    },
}

impl core::fmt::Display for RasterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPath { path } => {
                write!(f, "path '{}' lacks a file name or extension", path.display())
            }
            Self::UnsupportedContainerFormat { extension } => {
                write!(f, "no writable container format for extension '{extension}'")
            }
            Self::DecodeFailure { reason } => write!(f, "decode failed: {reason}"),
            Self::PixelCountExceeded { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::FormatMismatch { format, operand } => match operand {
                Operand::Format(other) => write!(f, "format mismatch: {format} vs {other}"),
                Operand::Channels(n) => {
                    write!(f, "operand of {n} channels does not fit {format}")
                }
                Operand::Alpha => write!(f, "{format} has no alpha channel"),
                Operand::Color => write!(f, "{format} has no color channels"),
            },
            Self::InvalidGeometry { reason } => write!(f, "invalid geometry: {reason}"),
            Self::EncodeFailure { reason } => write!(f, "encode failed: {reason}"),
            Self::OutOfBounds { x, y, width, height } => {
                write!(f, "pixel ({x}, {y}) is outside the {width}x{height} buffer")
            }
            Self::UnsupportedOperation { operation } => {
                write!(f, "{operation} is not implemented")
            }
            Self::InvalidNoise { reason } => write!(f, "invalid noise parameters: {reason}"),
        }
    }
}

impl core::error::Error for RasterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_values() {
        let err = RasterError::PixelCountExceeded {
            actual: 5_000_000_000,
            max: 4_294_967_295,
        };
        assert_eq!(
            err.to_string(),
            "pixel count 5000000000 exceeds limit 4294967295"
        );

        let err = RasterError::OutOfBounds {
            x: 8,
            y: 2,
            width: 8,
            height: 4,
        };
        assert_eq!(err.to_string(), "pixel (8, 2) is outside the 8x4 buffer");
    }

    #[test]
    fn display_names_mismatched_operand() {
        let err = RasterError::FormatMismatch {
            format: PixelFormat::Rgb8,
            operand: Operand::Format(PixelFormat::Rgba8),
        };
        assert_eq!(err.to_string(), "format mismatch: Rgb8 vs Rgba8");

        let err = RasterError::FormatMismatch {
            format: PixelFormat::Grey8,
            operand: Operand::Color,
        };
        assert_eq!(err.to_string(), "Grey8 has no color channels");
    }

    #[test]
    fn display_shows_rejected_path() {
        let err = RasterError::InvalidPath {
            path: PathBuf::from("output/noext"),
        };
        assert_eq!(
            err.to_string(),
            "path 'output/noext' lacks a file name or extension"
        );
    }
}
