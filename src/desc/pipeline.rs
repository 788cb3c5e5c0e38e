use glam::Vec4;
use smallvec::SmallVec;

use super::format::PixelFormat;
use super::types::{
    BlendFactor, BlendOp, ColorMask, CompareFunc, CullMode, FaceWinding, IndexType, MAX_COLOR_ATTACHMENTS,
    MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_BUFFERS, PrimitiveType, StencilOp, VertexFormat, VertexStep,
};
use crate::backend::BackendInfo;
use crate::errors::{GfxError, Result};
use crate::handle::ShaderHandle;

// ============================================================================
// Vertex Layout
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferLayoutDesc {
    /// `0` resolves to the packed size of the attributes reading this buffer
    pub stride: u32,
    pub step_func: VertexStep,
    /// `0` resolves to `1`
    pub step_rate: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexAttrDesc<'a> {
    pub name: &'a str,
    pub sem_name: &'a str,
    pub sem_index: u32,
    pub buffer_index: usize,
    pub offset: u32,
    pub format: VertexFormat,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutDesc<'a> {
    pub buffers: [BufferLayoutDesc; MAX_VERTEX_BUFFERS],
    pub attrs: SmallVec<[VertexAttrDesc<'a>; MAX_VERTEX_ATTRIBUTES]>,
}

impl LayoutDesc<'_> {
    /// Number of leading buffer slots that at least one attribute reads.
    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.attrs.iter().map(|a| a.buffer_index + 1).max().unwrap_or(0)
    }

    fn resolve(&mut self) -> Result<()> {
        if self.attrs.len() > MAX_VERTEX_ATTRIBUTES {
            return Err(GfxError::InvalidDescriptor(format!(
                "pipeline has {} vertex attributes (max {MAX_VERTEX_ATTRIBUTES})",
                self.attrs.len()
            )));
        }

        let auto_offset = self.attrs.iter().all(|a| a.offset == 0);
        let mut packed = [0u32; MAX_VERTEX_BUFFERS];
        for attr in &mut self.attrs {
            if attr.buffer_index >= MAX_VERTEX_BUFFERS {
                return Err(GfxError::InvalidDescriptor(format!(
                    "vertex attribute '{}' reads buffer slot {} (max {})",
                    attr.name,
                    attr.buffer_index,
                    MAX_VERTEX_BUFFERS - 1
                )));
            }
            if attr.format == VertexFormat::Invalid {
                return Err(GfxError::InvalidDescriptor(format!(
                    "vertex attribute '{}' has no format",
                    attr.name
                )));
            }
            if auto_offset {
                attr.offset = packed[attr.buffer_index];
            }
            packed[attr.buffer_index] += attr.format.byte_size() as u32;
        }

        for (buffer, packed_size) in self.buffers.iter_mut().zip(packed) {
            if buffer.stride == 0 {
                buffer.stride = packed_size;
            }
            if buffer.step_func == VertexStep::Default {
                buffer.step_func = VertexStep::PerVertex;
            }
            if buffer.step_rate == 0 {
                buffer.step_rate = 1;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Fixed-Function State
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StencilState {
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub compare_func: CompareFunc,
}

impl StencilState {
    fn resolve(&mut self) {
        for op in [&mut self.fail_op, &mut self.depth_fail_op, &mut self.pass_op] {
            if *op == StencilOp::Default {
                *op = StencilOp::Keep;
            }
        }
        if self.compare_func == CompareFunc::Default {
            self.compare_func = CompareFunc::Always;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthStencilState {
    pub stencil_front: StencilState,
    pub stencil_back: StencilState,
    pub depth_compare_func: CompareFunc,
    pub depth_write_enabled: bool,
    pub stencil_enabled: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub stencil_ref: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlendState {
    pub enabled: bool,
    pub src_factor_rgb: BlendFactor,
    pub dst_factor_rgb: BlendFactor,
    pub op_rgb: BlendOp,
    pub src_factor_alpha: BlendFactor,
    pub dst_factor_alpha: BlendFactor,
    pub op_alpha: BlendOp,
    pub color_write_mask: ColorMask,
    /// `0` resolves to `1`
    pub color_attachment_count: usize,
    pub color_format: PixelFormat,
    pub depth_format: PixelFormat,
    pub blend_color: Vec4,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RasterizerState {
    pub alpha_to_coverage_enabled: bool,
    pub cull_mode: CullMode,
    pub face_winding: FaceWinding,
    pub sample_count: u32,
    pub depth_bias: f32,
    pub depth_bias_slope_scale: f32,
    pub depth_bias_clamp: f32,
}

// ============================================================================
// Pipeline Descriptor
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PipelineDesc<'a> {
    pub layout: LayoutDesc<'a>,
    pub shader: ShaderHandle,
    pub primitive_type: PrimitiveType,
    pub index_type: IndexType,
    pub depth_stencil: DepthStencilState,
    pub blend: BlendState,
    pub rasterizer: RasterizerState,
    pub label: Option<&'a str>,
}

impl PipelineDesc<'_> {
    /// Resolves unset fields against the backend defaults and checks the result.
    pub fn with_defaults(&self, info: &BackendInfo) -> Result<Self> {
        let mut desc = self.clone();
        if desc.primitive_type == PrimitiveType::Default {
            desc.primitive_type = PrimitiveType::Triangles;
        }
        if desc.index_type == IndexType::Default {
            desc.index_type = IndexType::None;
        }

        let ds = &mut desc.depth_stencil;
        ds.stencil_front.resolve();
        ds.stencil_back.resolve();
        if ds.depth_compare_func == CompareFunc::Default {
            ds.depth_compare_func = CompareFunc::Always;
        }

        let blend = &mut desc.blend;
        for factor in [&mut blend.src_factor_rgb, &mut blend.src_factor_alpha] {
            if *factor == BlendFactor::Default {
                *factor = BlendFactor::One;
            }
        }
        for factor in [&mut blend.dst_factor_rgb, &mut blend.dst_factor_alpha] {
            if *factor == BlendFactor::Default {
                *factor = BlendFactor::Zero;
            }
        }
        for op in [&mut blend.op_rgb, &mut blend.op_alpha] {
            if *op == BlendOp::Default {
                *op = BlendOp::Add;
            }
        }
        blend.color_write_mask = blend.color_write_mask.resolve();
        if blend.color_attachment_count == 0 {
            blend.color_attachment_count = 1;
        }
        if blend.color_format == PixelFormat::Default {
            blend.color_format = info.default_color_format;
        }
        if blend.depth_format == PixelFormat::Default {
            blend.depth_format = PixelFormat::DepthStencil;
        }

        let rast = &mut desc.rasterizer;
        if rast.cull_mode == CullMode::Default {
            rast.cull_mode = CullMode::None;
        }
        if rast.face_winding == FaceWinding::Default {
            rast.face_winding = FaceWinding::Cw;
        }
        if rast.sample_count == 0 {
            rast.sample_count = 1;
        }

        desc.layout.resolve()?;

        if desc.blend.color_attachment_count > MAX_COLOR_ATTACHMENTS {
            return Err(GfxError::InvalidDescriptor(format!(
                "pipeline targets {} color attachments (max {MAX_COLOR_ATTACHMENTS})",
                desc.blend.color_attachment_count
            )));
        }
        if desc.layout.attrs.is_empty() {
            return Err(GfxError::InvalidDescriptor("pipeline has no vertex attributes".into()));
        }
        Ok(desc)
    }
}

/// The part of a pipeline description kept after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineInfo {
    pub shader: ShaderHandle,
    pub index_type: IndexType,
    /// Vertex buffer slots `0..buffer_count` must be bound
    pub buffer_count: usize,
    pub color_attachment_count: usize,
}

impl From<&PipelineDesc<'_>> for PipelineInfo {
    fn from(desc: &PipelineDesc<'_>) -> Self {
        Self {
            shader: desc.shader,
            index_type: desc.index_type,
            buffer_count: desc.layout.buffer_count(),
            color_attachment_count: desc.blend.color_attachment_count,
        }
    }
}
