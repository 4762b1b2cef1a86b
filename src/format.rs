//! Pixel format identification.

/// Supported pixel layouts.
///
/// The set is closed by design: buffer storage and every operation dispatch
/// over exactly these six layouts, so `match` stays exhaustive. All channels
/// are 8-bit. `Bgr8`/`Bgra8` differ from `Rgb8`/`Rgba8` only in storage
/// order; operations address color logically (r, g, b) in either case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    Grey8,
    GreyAlpha8,
    Rgb8,
    Rgba8,
    Bgr8,
    Bgra8,
}

impl PixelFormat {
    /// Every supported format, in declaration order.
    pub const ALL: [PixelFormat; 6] = [
        PixelFormat::Grey8,
        PixelFormat::GreyAlpha8,
        PixelFormat::Rgb8,
        PixelFormat::Rgba8,
        PixelFormat::Bgr8,
        PixelFormat::Bgra8,
    ];

    /// Number of channels per pixel.
    ///
    /// This table is the single source of truth for per-format channel
    /// counts; nothing else in the crate infers them.
    pub const fn channel_count(self) -> u32 {
        match self {
            PixelFormat::Grey8 => 1,
            PixelFormat::GreyAlpha8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Bgr8 => 3,
            PixelFormat::Bgra8 => 4,
        }
    }

    /// Bytes per pixel. Channels are one byte each.
    pub const fn bytes_per_pixel(self) -> usize {
        self.channel_count() as usize
    }

    /// Whether the layout carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::GreyAlpha8 | PixelFormat::Rgba8 | PixelFormat::Bgra8
        )
    }

    /// Whether the layout is grayscale (no color channels).
    pub const fn is_grayscale(self) -> bool {
        matches!(self, PixelFormat::Grey8 | PixelFormat::GreyAlpha8)
    }

    /// Infer a format from a decoded channel count.
    ///
    /// Decoders produce RGB-ordered data, so 3 and 4 channels map to
    /// [`Rgb8`](PixelFormat::Rgb8) and [`Rgba8`](PixelFormat::Rgba8);
    /// the BGR layouts are never inferred. Returns `None` outside 1..=4.
    pub fn from_channel_count(channels: u32) -> Option<Self> {
        match channels {
            1 => Some(PixelFormat::Grey8),
            2 => Some(PixelFormat::GreyAlpha8),
            3 => Some(PixelFormat::Rgb8),
            4 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            PixelFormat::Grey8 => "Grey8",
            PixelFormat::GreyAlpha8 => "GreyAlpha8",
            PixelFormat::Rgb8 => "Rgb8",
            PixelFormat::Rgba8 => "Rgba8",
            PixelFormat::Bgr8 => "Bgr8",
            PixelFormat::Bgra8 => "Bgra8",
        })
    }
}
