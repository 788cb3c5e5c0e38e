//! Pixel formats and their per-format capabilities.

// ============================================================================
// Pixel Format
// ============================================================================

/// Texel layout of an image or render target.
///
/// `Default` is resolved during descriptor merging; `None` is only legal for
/// attachments that are explicitly absent (e.g. a pipeline without depth).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Default,
    None,
    Rgba8,
    Rgb8,
    Rgba4,
    R5G6B5,
    R5G5B5A1,
    R10G10B10A2,
    Rgba32F,
    Rgba16F,
    R32F,
    R16F,
    L8,
    Depth,
    DepthStencil,
    Dxt1,
    Dxt3,
    Dxt5,
    Pvrtc2Rgb,
    Pvrtc4Rgb,
    Pvrtc2Rgba,
    Pvrtc4Rgba,
    Etc2Rgb8,
    Etc2SRgb8,
}

impl PixelFormat {
    /// Bytes per texel for uncompressed formats, `0` for compressed and unset ones.
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba32F => 16,
            PixelFormat::Rgba16F => 8,
            PixelFormat::Rgba8
            | PixelFormat::R10G10B10A2
            | PixelFormat::R32F
            | PixelFormat::Depth
            | PixelFormat::DepthStencil => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::R5G5B5A1 | PixelFormat::R5G6B5 | PixelFormat::Rgba4 | PixelFormat::R16F => 2,
            PixelFormat::L8 => 1,
            _ => 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_depth(self) -> bool {
        matches!(self, PixelFormat::Depth | PixelFormat::DepthStencil)
    }

    #[must_use]
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            PixelFormat::Dxt1
                | PixelFormat::Dxt3
                | PixelFormat::Dxt5
                | PixelFormat::Pvrtc2Rgb
                | PixelFormat::Pvrtc4Rgb
                | PixelFormat::Pvrtc2Rgba
                | PixelFormat::Pvrtc4Rgba
                | PixelFormat::Etc2Rgb8
                | PixelFormat::Etc2SRgb8
        )
    }

    /// Whether the value names an actual format (not `Default`/`None`).
    #[inline]
    #[must_use]
    pub fn is_concrete(self) -> bool {
        !matches!(self, PixelFormat::Default | PixelFormat::None)
    }

    /// Byte size of one row of `width` texels (one row of 4x4 blocks for
    /// block-compressed formats).
    #[must_use]
    pub fn row_pitch(self, width: u32) -> usize {
        let width = width as usize;
        match self {
            PixelFormat::Dxt1 | PixelFormat::Etc2Rgb8 | PixelFormat::Etc2SRgb8 => width.div_ceil(4).max(1) * 8,
            PixelFormat::Dxt3 | PixelFormat::Dxt5 => width.div_ceil(4).max(1) * 16,
            PixelFormat::Pvrtc4Rgb | PixelFormat::Pvrtc4Rgba => (width.max(8) * 4).div_ceil(8),
            PixelFormat::Pvrtc2Rgb | PixelFormat::Pvrtc2Rgba => (width.max(16) * 2).div_ceil(8),
            _ => width * self.bytes_per_pixel(),
        }
    }

    /// Byte size of one 2D surface of `width` x `height` texels.
    #[must_use]
    pub fn surface_pitch(self, width: u32, height: u32) -> usize {
        let rows = if self.is_compressed() {
            let min_height = match self {
                PixelFormat::Pvrtc2Rgb | PixelFormat::Pvrtc2Rgba | PixelFormat::Pvrtc4Rgb | PixelFormat::Pvrtc4Rgba => 8,
                _ => 4,
            };
            (height as usize).max(min_height).div_ceil(4)
        } else {
            height as usize
        };
        rows * self.row_pitch(width)
    }
}

/// Capabilities a backend reports for one pixel format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelFormatInfo {
    /// Can be sampled in shaders
    pub sample: bool,
    /// Supports linear filtering
    pub filter: bool,
    /// Can be used as a render target
    pub render: bool,
    /// Supports alpha blending as a render target
    pub blend: bool,
    /// Supports MSAA as a render target
    pub msaa: bool,
    /// Is a depth format
    pub depth: bool,
}
