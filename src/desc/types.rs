//! Enumerations shared by the creation descriptors.
//!
//! Every enum that can be left unset has a `Default` variant. The descriptor
//! `with_defaults` functions replace it with a concrete value before the
//! backend ever sees the descriptor.

use bitflags::bitflags;

// ============================================================================
// Limits
// ============================================================================

pub const MAX_COLOR_ATTACHMENTS: usize = 4;
pub const MAX_UNIFORM_BLOCKS: usize = 4;
pub const MAX_STAGE_IMAGES: usize = 12;
pub const MAX_UNIFORM_MEMBERS: usize = 16;
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;
pub const MAX_VERTEX_BUFFERS: usize = 8;
pub const MAX_MIPMAPS: usize = 16;
pub const MAX_ARRAY_LAYERS: usize = 128;
pub const NUM_CUBE_FACES: usize = 6;

// ============================================================================
// Resource Usage
// ============================================================================

/// How often the contents of a buffer or image change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Usage {
    #[default]
    Default,
    /// Initialized once at creation, never updated
    Immutable,
    /// Updated occasionally
    Dynamic,
    /// Rewritten every frame
    Stream,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BufferType {
    #[default]
    Default,
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageType {
    #[default]
    Default,
    Dim2,
    Cube,
    Dim3,
    Array,
}

impl ImageType {
    /// Number of faces a content description may address.
    #[must_use]
    pub fn num_faces(self) -> usize {
        match self {
            ImageType::Cube => NUM_CUBE_FACES,
            _ => 1,
        }
    }
}

// ============================================================================
// Sampling
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    Default,
    Nearest,
    Linear,
    NearestMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Wrap {
    #[default]
    Default,
    Repeat,
    ClampToEdge,
    ClampToBorder,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BorderColor {
    #[default]
    Default,
    TransparentBlack,
    OpaqueBlack,
    OpaqueWhite,
}

// ============================================================================
// Pipeline State
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    #[default]
    Default,
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndexType {
    #[default]
    Default,
    None,
    Uint16,
    Uint32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StencilOp {
    #[default]
    Default,
    Keep,
    Zero,
    Replace,
    IncrClamp,
    DecrClamp,
    Invert,
    IncrWrap,
    DecrWrap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    #[default]
    Default,
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    #[default]
    Default,
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturated,
    BlendColor,
    OneMinusBlendColor,
    BlendAlpha,
    OneMinusBlendAlpha,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendOp {
    #[default]
    Default,
    Add,
    Subtract,
    ReverseSubtract,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CullMode {
    #[default]
    Default,
    None,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FaceWinding {
    #[default]
    Default,
    Ccw,
    Cw,
}

bitflags! {
    /// Color channels written by a pipeline.
    ///
    /// An empty mask means "unset" and becomes [`ColorMask::RGBA`];
    /// use [`ColorMask::NONE`] to disable all writes explicitly.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const R = 1 << 0;
        const G = 1 << 1;
        const B = 1 << 2;
        const A = 1 << 3;
        const RGB = Self::R.bits() | Self::G.bits() | Self::B.bits();
        const RGBA = Self::RGB.bits() | Self::A.bits();
        const NONE = 0x10;
    }
}

impl ColorMask {
    /// Resolves the unset and explicit-none encodings.
    #[must_use]
    pub fn resolve(self) -> Self {
        if self.contains(Self::NONE) {
            Self::empty()
        } else if self.is_empty() {
            Self::RGBA
        } else {
            self
        }
    }
}

// ============================================================================
// Vertex Input
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VertexStep {
    #[default]
    Default,
    PerVertex,
    PerInstance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    #[default]
    Invalid,
    Float,
    Float2,
    Float3,
    Float4,
    Byte4,
    Byte4N,
    UByte4,
    UByte4N,
    Short2,
    Short2N,
    UShort2N,
    Short4,
    Short4N,
    UShort4N,
    Uint10N2,
}

impl VertexFormat {
    /// Size of one attribute of this format in bytes.
    #[must_use]
    pub fn byte_size(self) -> usize {
        match self {
            VertexFormat::Invalid => 0,
            VertexFormat::Float
            | VertexFormat::Byte4
            | VertexFormat::Byte4N
            | VertexFormat::UByte4
            | VertexFormat::UByte4N
            | VertexFormat::Short2
            | VertexFormat::Short2N
            | VertexFormat::UShort2N
            | VertexFormat::Uint10N2 => 4,
            VertexFormat::Float2 | VertexFormat::Short4 | VertexFormat::Short4N | VertexFormat::UShort4N => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
        }
    }
}

// ============================================================================
// Shaders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::Fragment => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UniformType {
    #[default]
    Invalid,
    Float,
    Float2,
    Float3,
    Float4,
    Mat4,
}

// ============================================================================
// Pass Actions
// ============================================================================

/// What happens to an attachment at the start of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Action {
    #[default]
    Default,
    Clear,
    Load,
    DontCare,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mask_unset_means_all_channels() {
        assert_eq!(ColorMask::default().resolve(), ColorMask::RGBA);
        assert_eq!(ColorMask::NONE.resolve(), ColorMask::empty());
        assert_eq!(ColorMask::RGB.resolve(), ColorMask::RGB);
    }

    #[test]
    fn vertex_format_sizes() {
        assert_eq!(VertexFormat::Float3.byte_size(), 12);
        assert_eq!(VertexFormat::UByte4N.byte_size(), 4);
        assert_eq!(VertexFormat::Short4N.byte_size(), 8);
        assert_eq!(VertexFormat::Invalid.byte_size(), 0);
    }
}
