//! Backend Adapter
//!
//! [`GfxBackend`] is the seam between the validation layer and a concrete
//! graphics API. The layer only calls it with arguments that already passed
//! validation:
//!
//! - every handle passed to a `create_*` call is freshly allocated,
//! - every handle passed to any other call names a live resource,
//! - `apply_*` and `draw` only arrive inside a valid pass.
//!
//! A backend keeps its native objects in its own tables keyed by slot index
//! and answers `create_*` calls with [`ResourceState::Valid`] or
//! [`ResourceState::Failed`].

mod recording;

pub use recording::{BackendCall, CallLog, RecordingBackend};

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::desc::{
    BufferDesc, ImageContent, ImageDesc, IndexType, MAX_STAGE_IMAGES, MAX_VERTEX_BUFFERS, PassAction, PassDesc,
    PipelineDesc, PixelFormat, PixelFormatInfo, ShaderDesc, ShaderStage,
};
use crate::handle::{BufferHandle, ContextHandle, ImageHandle, PassHandle, PipelineHandle, ShaderHandle};
use crate::slot::ResourceState;

// ============================================================================
// Capabilities
// ============================================================================

bitflags! {
    /// Optional features a backend supports.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        const INSTANCING = 1 << 0;
        const ORIGIN_TOP_LEFT = 1 << 1;
        const MULTIPLE_RENDER_TARGETS = 1 << 2;
        const MSAA_RENDER_TARGETS = 1 << 3;
        const IMAGE_TYPE_3D = 1 << 4;
        const IMAGE_TYPE_ARRAY = 1 << 5;
    }
}

/// Numeric limits of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_image_size_2d: u32,
    pub max_image_size_cube: u32,
    pub max_image_size_3d: u32,
    pub max_image_size_array: u32,
    pub max_image_array_layers: u32,
    pub max_vertex_attrs: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_image_size_2d: 16 * 1024,
            max_image_size_cube: 16 * 1024,
            max_image_size_3d: 2 * 1024,
            max_image_size_array: 16 * 1024,
            max_image_array_layers: 2 * 1024,
            max_vertex_attrs: crate::desc::MAX_VERTEX_ATTRIBUTES as u32,
        }
    }
}

/// Static description of a backend, queried once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendInfo {
    pub name: &'static str,
    pub features: Features,
    pub limits: Limits,
    /// Format of the default framebuffer, used for unset render-target formats
    pub default_color_format: PixelFormat,
}

impl Default for BackendInfo {
    fn default() -> Self {
        Self {
            name: "unknown",
            features: Features::empty(),
            limits: Limits::default(),
            default_color_format: PixelFormat::Rgba8,
        }
    }
}

// ============================================================================
// Resolved Bindings
// ============================================================================

/// Bindings after validation: only bound slots, each with a live handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBindings {
    /// `(slot, buffer, offset)` per bound vertex buffer
    pub vertex_buffers: SmallVec<[(usize, BufferHandle, u32); MAX_VERTEX_BUFFERS]>,
    pub index_buffer: Option<(BufferHandle, u32)>,
    pub index_type: IndexType,
    /// `(slot, image)` per bound image, indexed by `ShaderStage::index()`
    pub images: [SmallVec<[(usize, ImageHandle); MAX_STAGE_IMAGES]>; 2],
}

// ============================================================================
// Backend Trait
// ============================================================================

/// Device-side half of the layer.
pub trait GfxBackend {
    fn info(&self) -> BackendInfo;

    fn pixel_format_info(&self, format: PixelFormat) -> PixelFormatInfo;

    // --- Contexts ---

    fn create_context(&mut self, ctx: ContextHandle) -> ResourceState;
    fn destroy_context(&mut self, ctx: ContextHandle);
    fn activate_context(&mut self, ctx: ContextHandle);

    // --- Resources ---

    fn create_buffer(&mut self, buffer: BufferHandle, desc: &BufferDesc<'_>) -> ResourceState;
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    fn create_image(&mut self, image: ImageHandle, desc: &ImageDesc<'_>) -> ResourceState;
    fn destroy_image(&mut self, image: ImageHandle);

    fn create_shader(&mut self, shader: ShaderHandle, desc: &ShaderDesc<'_>) -> ResourceState;
    fn destroy_shader(&mut self, shader: ShaderHandle);

    fn create_pipeline(&mut self, pipeline: PipelineHandle, shader: ShaderHandle, desc: &PipelineDesc<'_>)
    -> ResourceState;
    fn destroy_pipeline(&mut self, pipeline: PipelineHandle);

    fn create_pass(&mut self, pass: PassHandle, desc: &PassDesc<'_>) -> ResourceState;
    fn destroy_pass(&mut self, pass: PassHandle);

    // --- Streaming ---

    fn update_buffer(&mut self, buffer: BufferHandle, data: &[u8]);
    fn append_buffer(&mut self, buffer: BufferHandle, offset: usize, data: &[u8], discard_previous: bool);
    fn update_image(&mut self, image: ImageHandle, content: &ImageContent<'_>);

    // --- Commands ---

    /// `pass == None` targets the default framebuffer.
    fn begin_pass(&mut self, pass: Option<PassHandle>, action: &PassAction, width: u32, height: u32);
    fn end_pass(&mut self);
    fn commit(&mut self);

    fn apply_viewport(&mut self, x: i32, y: i32, width: i32, height: i32, origin_top_left: bool);
    fn apply_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32, origin_top_left: bool);
    fn apply_pipeline(&mut self, pipeline: PipelineHandle);
    fn apply_bindings(&mut self, bindings: &ResolvedBindings);
    fn apply_uniforms(&mut self, stage: ShaderStage, slot: usize, data: &[u8]);
    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32);

    /// Releases device-global state after the last context is gone.
    fn shutdown(&mut self) {}
}
