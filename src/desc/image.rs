use super::format::PixelFormat;
use super::types::{BorderColor, Filter, ImageType, MAX_MIPMAPS, Usage, Wrap};
use crate::backend::BackendInfo;
use crate::errors::{GfxError, Result};

/// Pixel data of one face and mip level.
#[derive(Debug, Clone, Copy)]
pub struct SubImage<'a> {
    /// Cube face, `0` for every other image type
    pub face: usize,
    pub mip_level: usize,
    pub data: &'a [u8],
}

/// Pixel data for a whole image, used both at creation and in `update_image`.
#[derive(Debug, Clone, Default)]
pub struct ImageContent<'a> {
    pub subimages: Vec<SubImage<'a>>,
}

impl<'a> ImageContent<'a> {
    /// Content consisting of the top mip level of face 0 only.
    #[must_use]
    pub fn single(data: &'a [u8]) -> Self {
        Self {
            subimages: vec![SubImage {
                face: 0,
                mip_level: 0,
                data,
            }],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subimages.iter().all(|s| s.data.is_empty())
    }
}

/// Creation parameters of a texture or render target.
#[derive(Debug, Clone)]
pub struct ImageDesc<'a> {
    pub image_type: ImageType,
    pub render_target: bool,
    pub width: u32,
    pub height: u32,
    /// Depth of 3D images, layer count of array images
    pub depth: u32,
    pub num_mipmaps: u32,
    pub usage: Usage,
    pub pixel_format: PixelFormat,
    pub sample_count: u32,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap_u: Wrap,
    pub wrap_v: Wrap,
    pub wrap_w: Wrap,
    pub border_color: BorderColor,
    pub max_anisotropy: u32,
    pub min_lod: f32,
    /// `0.0` means "unset" and resolves to `f32::MAX`
    pub max_lod: f32,
    pub content: Option<ImageContent<'a>>,
    pub label: Option<&'a str>,
}

impl Default for ImageDesc<'_> {
    fn default() -> Self {
        Self {
            image_type: ImageType::Default,
            render_target: false,
            width: 0,
            height: 0,
            depth: 0,
            num_mipmaps: 0,
            usage: Usage::Default,
            pixel_format: PixelFormat::Default,
            sample_count: 0,
            min_filter: Filter::Default,
            mag_filter: Filter::Default,
            wrap_u: Wrap::Default,
            wrap_v: Wrap::Default,
            wrap_w: Wrap::Default,
            border_color: BorderColor::Default,
            max_anisotropy: 0,
            min_lod: 0.0,
            max_lod: 0.0,
            content: None,
            label: None,
        }
    }
}

impl<'a> ImageDesc<'a> {
    /// A 2D render target of the given size and format.
    #[must_use]
    pub fn render_target(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            render_target: true,
            width,
            height,
            pixel_format,
            ..Default::default()
        }
    }

    /// Resolves unset fields against the backend defaults and checks the result.
    pub fn with_defaults(&self, info: &BackendInfo) -> Result<Self> {
        let mut desc = self.clone();
        if desc.image_type == ImageType::Default {
            desc.image_type = ImageType::Dim2;
        }
        if desc.depth == 0 {
            desc.depth = 1;
        }
        if desc.num_mipmaps == 0 {
            desc.num_mipmaps = 1;
        }
        if desc.usage == Usage::Default {
            desc.usage = Usage::Immutable;
        }
        if desc.pixel_format == PixelFormat::Default {
            desc.pixel_format = if desc.render_target {
                info.default_color_format
            } else {
                PixelFormat::Rgba8
            };
        }
        if desc.sample_count == 0 {
            desc.sample_count = 1;
        }
        if desc.min_filter == Filter::Default {
            desc.min_filter = Filter::Nearest;
        }
        if desc.mag_filter == Filter::Default {
            desc.mag_filter = Filter::Nearest;
        }
        for wrap in [&mut desc.wrap_u, &mut desc.wrap_v, &mut desc.wrap_w] {
            if *wrap == Wrap::Default {
                *wrap = Wrap::Repeat;
            }
        }
        if desc.border_color == BorderColor::Default {
            desc.border_color = BorderColor::OpaqueBlack;
        }
        if desc.max_anisotropy == 0 {
            desc.max_anisotropy = 1;
        }
        if desc.max_lod == 0.0 {
            desc.max_lod = f32::MAX;
        }

        desc.validate()?;
        Ok(desc)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GfxError::InvalidDescriptor(format!(
                "image size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.pixel_format == PixelFormat::None {
            return Err(GfxError::InvalidDescriptor("image pixel format cannot be None".into()));
        }
        if self.num_mipmaps as usize > MAX_MIPMAPS {
            return Err(GfxError::InvalidDescriptor(format!(
                "image has {} mipmaps (max {MAX_MIPMAPS})",
                self.num_mipmaps
            )));
        }
        if self.render_target {
            if self.usage != Usage::Immutable {
                return Err(GfxError::InvalidDescriptor("render target images must have immutable usage".into()));
            }
            if self.content.is_some() {
                return Err(GfxError::InvalidDescriptor("render target images cannot be initialized with content".into()));
            }
            return Ok(());
        }
        if self.sample_count > 1 {
            return Err(GfxError::InvalidDescriptor("only render targets can be multisampled".into()));
        }
        match &self.content {
            Some(content) => ImageInfo::from(self).check_content(content),
            None if self.usage == Usage::Immutable => Err(GfxError::InvalidDescriptor(
                "immutable images must be initialized with content".into(),
            )),
            None => Ok(()),
        }
    }
}

/// The part of an image description kept after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub image_type: ImageType,
    pub render_target: bool,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_mipmaps: u32,
    pub usage: Usage,
    pub pixel_format: PixelFormat,
    pub sample_count: u32,
}

impl From<&ImageDesc<'_>> for ImageInfo {
    fn from(desc: &ImageDesc<'_>) -> Self {
        Self {
            image_type: desc.image_type,
            render_target: desc.render_target,
            width: desc.width,
            height: desc.height,
            depth: desc.depth,
            num_mipmaps: desc.num_mipmaps,
            usage: desc.usage,
            pixel_format: desc.pixel_format,
            sample_count: desc.sample_count,
        }
    }
}

impl ImageInfo {
    /// Width and height of `mip_level`, never below one texel.
    #[must_use]
    pub fn mip_size(&self, mip_level: u32) -> (u32, u32) {
        ((self.width >> mip_level).max(1), (self.height >> mip_level).max(1))
    }

    /// Byte size of one face at `mip_level`, including every depth slice or layer.
    #[must_use]
    pub fn subimage_size(&self, mip_level: usize) -> usize {
        let (w, h) = self.mip_size(mip_level as u32);
        let slices = match self.image_type {
            ImageType::Dim3 => (self.depth >> mip_level).max(1),
            ImageType::Array => self.depth,
            _ => 1,
        };
        self.pixel_format.surface_pitch(w, h) * slices as usize
    }

    /// Checks that every subimage addresses an existing face and mip level
    /// and carries exactly the bytes that level needs.
    pub fn check_content(&self, content: &ImageContent<'_>) -> Result<()> {
        let faces = self.image_type.num_faces();
        for sub in &content.subimages {
            if sub.face >= faces || sub.mip_level >= self.num_mipmaps as usize {
                return Err(GfxError::InvalidDescriptor(format!(
                    "subimage face {} mip {} out of range ({faces} faces, {} mipmaps)",
                    sub.face, sub.mip_level, self.num_mipmaps
                )));
            }
            let expected = self.subimage_size(sub.mip_level);
            if sub.data.len() != expected {
                return Err(GfxError::InvalidDescriptor(format!(
                    "subimage face {} mip {} has {} bytes, expected {expected}",
                    sub.face,
                    sub.mip_level,
                    sub.data.len()
                )));
            }
        }
        Ok(())
    }
}
