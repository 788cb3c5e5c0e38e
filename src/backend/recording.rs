//! Headless backend that records the command stream.
//!
//! Every adapter call is appended to a [`CallLog`] shared with the creator of
//! the backend, so the log stays readable after the backend has been moved
//! into a `Gfx`. Creation results can be overridden per resource kind to
//! exercise failed resources and broken backends.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;
use rustc_hash::FxHashMap;

use super::{BackendInfo, Features, GfxBackend, ResolvedBindings};
use crate::desc::{
    BufferDesc, BufferType, ImageContent, ImageDesc, PassAction, PassDesc, PipelineDesc, PixelFormat,
    PixelFormatInfo, ShaderDesc, ShaderStage, Usage,
};
use crate::handle::{BufferHandle, ContextHandle, ImageHandle, PassHandle, PipelineHandle, ResourceKind, ShaderHandle};
use crate::slot::ResourceState;

/// One recorded adapter call, with the data it carried copied out.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateContext(ContextHandle),
    DestroyContext(ContextHandle),
    ActivateContext(ContextHandle),

    CreateBuffer {
        buffer: BufferHandle,
        size: usize,
        buffer_type: BufferType,
        usage: Usage,
    },
    DestroyBuffer(BufferHandle),
    CreateImage {
        image: ImageHandle,
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
    },
    DestroyImage(ImageHandle),
    CreateShader(ShaderHandle),
    DestroyShader(ShaderHandle),
    CreatePipeline {
        pipeline: PipelineHandle,
        shader: ShaderHandle,
    },
    DestroyPipeline(PipelineHandle),
    CreatePass(PassHandle),
    DestroyPass(PassHandle),

    UpdateBuffer {
        buffer: BufferHandle,
        data: Vec<u8>,
    },
    AppendBuffer {
        buffer: BufferHandle,
        offset: usize,
        len: usize,
        discard_previous: bool,
    },
    UpdateImage {
        image: ImageHandle,
        subimages: usize,
    },

    BeginPass {
        pass: Option<PassHandle>,
        action: PassAction,
        width: u32,
        height: u32,
    },
    EndPass,
    Commit,
    ApplyViewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        origin_top_left: bool,
    },
    ApplyScissorRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        origin_top_left: bool,
    },
    ApplyPipeline(PipelineHandle),
    ApplyBindings(ResolvedBindings),
    ApplyUniforms {
        stage: ShaderStage,
        slot: usize,
        data: Vec<u8>,
    },
    Draw {
        base_element: u32,
        num_elements: u32,
        num_instances: u32,
    },
    Shutdown,
}

impl BackendCall {
    #[must_use]
    pub fn is_draw(&self) -> bool {
        matches!(self, BackendCall::Draw { .. })
    }
}

#[derive(Debug, Default)]
struct RecorderState {
    calls: Vec<BackendCall>,
    forced: FxHashMap<ResourceKind, ResourceState>,
}

/// Shared view of the calls a [`RecordingBackend`] received.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Rc<RefCell<RecorderState>>,
}

impl CallLog {
    /// Snapshot of every call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.borrow().calls.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn last(&self) -> Option<BackendCall> {
        self.inner.borrow().calls.last().cloned()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.inner.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.count(BackendCall::is_draw)
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Makes every following creation of `kind` report `Failed`.
    pub fn fail_creations(&self, kind: ResourceKind) {
        self.force_state(kind, ResourceState::Failed);
    }

    /// Makes every following creation of `kind` report `state`.
    pub fn force_state(&self, kind: ResourceKind, state: ResourceState) {
        self.inner.borrow_mut().forced.insert(kind, state);
    }

    /// Restores normal `Valid` creations for `kind`.
    pub fn succeed_creations(&self, kind: ResourceKind) {
        self.inner.borrow_mut().forced.remove(&kind);
    }

    fn push(&self, call: BackendCall) {
        trace!("backend call: {call:?}");
        self.inner.borrow_mut().calls.push(call);
    }

    fn creation_result(&self, kind: ResourceKind) -> ResourceState {
        self.inner
            .borrow()
            .forced
            .get(&kind)
            .copied()
            .unwrap_or(ResourceState::Valid)
    }
}

/// A backend without a device; see the module docs.
#[derive(Debug)]
pub struct RecordingBackend {
    log: CallLog,
    info: BackendInfo,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            info: BackendInfo {
                name: "recording",
                features: Features::all(),
                ..BackendInfo::default()
            },
        }
    }

    /// Reports `info` from [`GfxBackend::info`] instead of the built-in description.
    #[must_use]
    pub fn with_info(mut self, info: BackendInfo) -> Self {
        self.info = info;
        self
    }

    /// A handle on the call log that outlives moving the backend.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn create(&self, kind: ResourceKind, call: BackendCall) -> ResourceState {
        self.log.push(call);
        self.log.creation_result(kind)
    }
}

impl GfxBackend for RecordingBackend {
    fn info(&self) -> BackendInfo {
        self.info.clone()
    }

    fn pixel_format_info(&self, format: PixelFormat) -> PixelFormatInfo {
        let depth = format.is_depth();
        let compressed = format.is_compressed();
        PixelFormatInfo {
            sample: !depth,
            filter: !depth && !matches!(format, PixelFormat::R32F | PixelFormat::Rgba32F),
            render: !compressed && format != PixelFormat::Rgb8,
            blend: !compressed && !depth,
            msaa: !compressed,
            depth,
        }
    }

    fn create_context(&mut self, ctx: ContextHandle) -> ResourceState {
        self.create(ResourceKind::Context, BackendCall::CreateContext(ctx))
    }

    fn destroy_context(&mut self, ctx: ContextHandle) {
        self.log.push(BackendCall::DestroyContext(ctx));
    }

    fn activate_context(&mut self, ctx: ContextHandle) {
        self.log.push(BackendCall::ActivateContext(ctx));
    }

    fn create_buffer(&mut self, buffer: BufferHandle, desc: &BufferDesc<'_>) -> ResourceState {
        self.create(
            ResourceKind::Buffer,
            BackendCall::CreateBuffer {
                buffer,
                size: desc.size,
                buffer_type: desc.buffer_type,
                usage: desc.usage,
            },
        )
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.log.push(BackendCall::DestroyBuffer(buffer));
    }

    fn create_image(&mut self, image: ImageHandle, desc: &ImageDesc<'_>) -> ResourceState {
        self.create(
            ResourceKind::Image,
            BackendCall::CreateImage {
                image,
                width: desc.width,
                height: desc.height,
                pixel_format: desc.pixel_format,
            },
        )
    }

    fn destroy_image(&mut self, image: ImageHandle) {
        self.log.push(BackendCall::DestroyImage(image));
    }

    fn create_shader(&mut self, shader: ShaderHandle, _desc: &ShaderDesc<'_>) -> ResourceState {
        self.create(ResourceKind::Shader, BackendCall::CreateShader(shader))
    }

    fn destroy_shader(&mut self, shader: ShaderHandle) {
        self.log.push(BackendCall::DestroyShader(shader));
    }

    fn create_pipeline(
        &mut self,
        pipeline: PipelineHandle,
        shader: ShaderHandle,
        _desc: &PipelineDesc<'_>,
    ) -> ResourceState {
        self.create(ResourceKind::Pipeline, BackendCall::CreatePipeline { pipeline, shader })
    }

    fn destroy_pipeline(&mut self, pipeline: PipelineHandle) {
        self.log.push(BackendCall::DestroyPipeline(pipeline));
    }

    fn create_pass(&mut self, pass: PassHandle, _desc: &PassDesc<'_>) -> ResourceState {
        self.create(ResourceKind::Pass, BackendCall::CreatePass(pass))
    }

    fn destroy_pass(&mut self, pass: PassHandle) {
        self.log.push(BackendCall::DestroyPass(pass));
    }

    fn update_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        self.log.push(BackendCall::UpdateBuffer {
            buffer,
            data: data.to_vec(),
        });
    }

    fn append_buffer(&mut self, buffer: BufferHandle, offset: usize, data: &[u8], discard_previous: bool) {
        self.log.push(BackendCall::AppendBuffer {
            buffer,
            offset,
            len: data.len(),
            discard_previous,
        });
    }

    fn update_image(&mut self, image: ImageHandle, content: &ImageContent<'_>) {
        self.log.push(BackendCall::UpdateImage {
            image,
            subimages: content.subimages.len(),
        });
    }

    fn begin_pass(&mut self, pass: Option<PassHandle>, action: &PassAction, width: u32, height: u32) {
        self.log.push(BackendCall::BeginPass {
            pass,
            action: *action,
            width,
            height,
        });
    }

    fn end_pass(&mut self) {
        self.log.push(BackendCall::EndPass);
    }

    fn commit(&mut self) {
        self.log.push(BackendCall::Commit);
    }

    fn apply_viewport(&mut self, x: i32, y: i32, width: i32, height: i32, origin_top_left: bool) {
        self.log.push(BackendCall::ApplyViewport {
            x,
            y,
            width,
            height,
            origin_top_left,
        });
    }

    fn apply_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32, origin_top_left: bool) {
        self.log.push(BackendCall::ApplyScissorRect {
            x,
            y,
            width,
            height,
            origin_top_left,
        });
    }

    fn apply_pipeline(&mut self, pipeline: PipelineHandle) {
        self.log.push(BackendCall::ApplyPipeline(pipeline));
    }

    fn apply_bindings(&mut self, bindings: &ResolvedBindings) {
        self.log.push(BackendCall::ApplyBindings(bindings.clone()));
    }

    fn apply_uniforms(&mut self, stage: ShaderStage, slot: usize, data: &[u8]) {
        self.log.push(BackendCall::ApplyUniforms {
            stage,
            slot,
            data: data.to_vec(),
        });
    }

    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        self.log.push(BackendCall::Draw {
            base_element,
            num_elements,
            num_instances,
        });
    }

    fn shutdown(&mut self) {
        self.log.push(BackendCall::Shutdown);
    }
}
