//! Container I/O through the `image` crate.
//!
//! Loading sniffs the container from file content, so a source path needs no
//! extension. Saving picks the container from the target extension and can
//! fall back to PNG for extensions it cannot write.

use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use log::{debug, warn};

use crate::buffer::{PixelBuffer, PixelData};
use crate::error::RasterError;

/// JPEG output keeps the full quality range.
const JPEG_QUALITY: u8 = 100;

/// Writable container formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Jpeg,
    Png,
    Bmp,
    Tga,
}

impl ContainerFormat {
    /// Map a file extension to a writable container (case-insensitive).
    /// Returns `None` if nothing here can write it.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ContainerFormat::Jpeg),
            "png" => Some(ContainerFormat::Png),
            "bmp" => Some(ContainerFormat::Bmp),
            "tga" => Some(ContainerFormat::Tga),
            _ => None,
        }
    }

    /// Recognized file extensions.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ContainerFormat::Jpeg => &["jpg", "jpeg"],
            ContainerFormat::Png => &["png"],
            ContainerFormat::Bmp => &["bmp"],
            ContainerFormat::Tga => &["tga"],
        }
    }

    /// Whether the container can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ContainerFormat::Jpeg)
    }

    /// Whether the container can carry single-channel grayscale directly.
    pub fn supports_grayscale(self) -> bool {
        !matches!(self, ContainerFormat::Bmp)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ContainerFormat::Jpeg => ImageFormat::Jpeg,
            ContainerFormat::Png => ImageFormat::Png,
            ContainerFormat::Bmp => ImageFormat::Bmp,
            ContainerFormat::Tga => ImageFormat::Tga,
        }
    }
}

impl core::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ContainerFormat::Jpeg => "JPEG",
            ContainerFormat::Png => "PNG",
            ContainerFormat::Bmp => "BMP",
            ContainerFormat::Tga => "TGA",
        })
    }
}

fn decode_failure(err: impl core::fmt::Display) -> RasterError {
    RasterError::DecodeFailure {
        reason: err.to_string(),
    }
}

fn encode_failure(err: impl core::fmt::Display) -> RasterError {
    RasterError::EncodeFailure {
        reason: err.to_string(),
    }
}

impl PixelBuffer {
    /// Decode an image file into a buffer.
    ///
    /// The container is detected from content; 8-bit grey, grey-alpha, RGB,
    /// and RGBA frames map straight onto the matching format, and anything
    /// deeper is narrowed to 8-bit color first. Decoders never produce the
    /// BGR-ordered formats.
    ///
    /// # Errors
    ///
    /// [`RasterError::DecodeFailure`] when the file is missing, unreadable,
    /// or not a decodable image; [`RasterError::PixelCountExceeded`] when
    /// the decoded frame passes the pixel cap.
    pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer, RasterError> {
        let path = path.as_ref();
        let reader = ImageReader::open(path)
            .map_err(decode_failure)?
            .with_guessed_format()
            .map_err(decode_failure)?;
        let decoded = reader.decode().map_err(decode_failure)?;
        let (width, height) = (decoded.width(), decoded.height());
        let buffer = match decoded {
            DynamicImage::ImageLuma8(img) => PixelBuffer::from_raw(width, height, 1, img.as_raw()),
            DynamicImage::ImageLumaA8(img) => PixelBuffer::from_raw(width, height, 2, img.as_raw()),
            DynamicImage::ImageRgb8(img) => PixelBuffer::from_raw(width, height, 3, img.as_raw()),
            DynamicImage::ImageRgba8(img) => PixelBuffer::from_raw(width, height, 4, img.as_raw()),
            other if other.color().has_alpha() => {
                PixelBuffer::from_raw(width, height, 4, other.to_rgba8().as_raw())
            }
            other => PixelBuffer::from_raw(width, height, 3, other.to_rgb8().as_raw()),
        }?;
        debug!("load: {} -> {:?}", path.display(), buffer);
        Ok(buffer)
    }

    /// Encode the buffer to `path`, picking the container from the
    /// extension.
    ///
    /// An extension nothing here can write is rewritten to ".png" with a
    /// warning, so the call still produces a file; the returned path is the
    /// one actually written. Use [`save_strict`](Self::save_strict) to fail
    /// instead.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidPath`] when `path` has no file name or
    /// extension; [`RasterError::EncodeFailure`] when the encoder or the
    /// filesystem rejects the write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, RasterError> {
        self.save_inner(path.as_ref(), true)
    }

    /// [`save`](Self::save) without the PNG fallback.
    ///
    /// # Errors
    ///
    /// As [`save`](Self::save), plus
    /// [`RasterError::UnsupportedContainerFormat`] for an extension nothing
    /// here can write; nothing is written in that case.
    pub fn save_strict(&self, path: impl AsRef<Path>) -> Result<PathBuf, RasterError> {
        self.save_inner(path.as_ref(), false)
    }

    fn save_inner(&self, path: &Path, allow_fallback_png: bool) -> Result<PathBuf, RasterError> {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return Err(RasterError::InvalidPath {
                path: path.to_path_buf(),
            });
        };
        let (container, target) = match ContainerFormat::from_extension(extension) {
            Some(container) => (container, path.to_path_buf()),
            None if allow_fallback_png => {
                warn!(
                    "save: no writable container for extension '{extension}', writing {} as PNG",
                    path.display()
                );
                (ContainerFormat::Png, path.with_extension("png"))
            }
            None => {
                return Err(RasterError::UnsupportedContainerFormat {
                    extension: extension.to_string(),
                });
            }
        };

        let (bytes, color) = self.encode_payload(container);
        match container {
            ContainerFormat::Jpeg => {
                let file = File::create(&target).map_err(encode_failure)?;
                JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY)
                    .write_image(&bytes, self.width(), self.height(), color)
                    .map_err(encode_failure)?;
            }
            _ => {
                image::save_buffer_with_format(
                    &target,
                    &bytes,
                    self.width(),
                    self.height(),
                    color,
                    container.image_format(),
                )
                .map_err(encode_failure)?;
            }
        }
        debug!("save: {:?} -> {} as {container}", self, target.display());
        Ok(target)
    }

    /// Interleave the storage into bytes the chosen container can encode.
    ///
    /// BGR orders always swizzle to RGB. On top of that, JPEG drops alpha
    /// and BMP expands grayscale to color; everything else passes through
    /// borrowed.
    fn encode_payload(&self, container: ContainerFormat) -> (Cow<'_, [u8]>, ExtendedColorType) {
        let keep_alpha = container.supports_alpha();
        match self.data() {
            PixelData::Grey8(v) if !container.supports_grayscale() => (
                Cow::Owned(v.iter().flat_map(|p| [p.0, p.0, p.0]).collect()),
                ExtendedColorType::Rgb8,
            ),
            PixelData::Grey8(_) => (Cow::Borrowed(self.as_bytes()), ExtendedColorType::L8),
            PixelData::GreyAlpha8(v) if !container.supports_grayscale() => (
                Cow::Owned(v.iter().flat_map(|p| [p.0, p.0, p.0, p.1]).collect()),
                ExtendedColorType::Rgba8,
            ),
            PixelData::GreyAlpha8(v) if !keep_alpha => (
                Cow::Owned(v.iter().map(|p| p.0).collect()),
                ExtendedColorType::L8,
            ),
            PixelData::GreyAlpha8(_) => (Cow::Borrowed(self.as_bytes()), ExtendedColorType::La8),
            PixelData::Rgb8(_) => (Cow::Borrowed(self.as_bytes()), ExtendedColorType::Rgb8),
            PixelData::Rgba8(v) if !keep_alpha => (
                Cow::Owned(v.iter().flat_map(|p| [p.r, p.g, p.b]).collect()),
                ExtendedColorType::Rgb8,
            ),
            PixelData::Rgba8(_) => (Cow::Borrowed(self.as_bytes()), ExtendedColorType::Rgba8),
            PixelData::Bgr8(v) => (
                Cow::Owned(v.iter().flat_map(|p| [p.r, p.g, p.b]).collect()),
                ExtendedColorType::Rgb8,
            ),
            PixelData::Bgra8(v) if !keep_alpha => (
                Cow::Owned(v.iter().flat_map(|p| [p.r, p.g, p.b]).collect()),
                ExtendedColorType::Rgb8,
            ),
            PixelData::Bgra8(v) => (
                Cow::Owned(v.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect()),
                ExtendedColorType::Rgba8,
            ),
        }
    }
}
