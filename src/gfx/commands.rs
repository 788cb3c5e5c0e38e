//! Command validation.
//!
//! The session flags decide which commands reach the backend:
//!
//! | flag              | set by                         | cleared by                      |
//! |-------------------|--------------------------------|---------------------------------|
//! | `in_pass`         | `begin_*pass`                  | `end_pass`                      |
//! | `pass_valid`      | `begin_*pass` on a usable pass | `end_pass`                      |
//! | `next_draw_valid` | `apply_pipeline` (Valid)       | unusable pipeline or binding    |
//! | `bindings_valid`  | `apply_bindings`               | `apply_pipeline`, `end_pass`    |
//!
//! A draw reaches the backend only when the last three are all set. Invalid
//! passes, failed pipelines and failed or overflowed bindings therefore turn
//! into skipped draws instead of device errors.

use bytemuck::Pod;
use log::{debug, trace};
#[cfg(debug_assertions)]
use log::warn;

use super::Gfx;
use crate::backend::ResolvedBindings;
use crate::desc::{Bindings, BufferType, IndexType, MAX_UNIFORM_BLOCKS, PassAction, ShaderStage};
use crate::errors::{GfxError, Result};
use crate::handle::{PassHandle, PipelineHandle, ResourceKind};
use crate::resources::ResourceTables;
use crate::slot::ResourceState;

/// Validation state of the pass being recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandSession {
    pub in_pass: bool,
    pub pass_valid: bool,
    pub next_draw_valid: bool,
    pub bindings_valid: bool,
    /// `INVALID` for the default pass
    pub current_pass: PassHandle,
    pub current_pipeline: PipelineHandle,
    /// Set once a draw without bindings was reported in this pass
    pub unbound_draw_reported: bool,
}

impl CommandSession {
    /// Whether a draw issued now would reach the backend.
    #[inline]
    #[must_use]
    pub fn can_draw(&self) -> bool {
        self.pass_valid && self.next_draw_valid && self.bindings_valid
    }
}

impl Gfx {
    // ========================================================================
    // Passes
    // ========================================================================

    /// Begins rendering to the default framebuffer of `width` x `height`.
    pub fn begin_default_pass(&mut self, action: &PassAction, width: u32, height: u32) {
        if self.session.in_pass {
            self.fatal(GfxError::NestedPass);
        }
        let action = action.resolved();
        self.backend.begin_pass(None, &action, width, height);
        self.session = CommandSession {
            in_pass: true,
            pass_valid: true,
            ..CommandSession::default()
        };
    }

    /// Begins rendering to an offscreen pass.
    ///
    /// A stale or not-`Valid` pass opens a skipped pass: nothing reaches the
    /// backend until `end_pass`, which still has to be called.
    pub fn begin_pass(&mut self, pass: PassHandle, action: &PassAction) {
        if self.session.in_pass {
            self.fatal(GfxError::NestedPass);
        }
        let size = self.pass_size(pass);
        self.session = CommandSession {
            in_pass: true,
            pass_valid: size.is_some(),
            current_pass: pass,
            ..CommandSession::default()
        };

        match size {
            Some((width, height)) => {
                let action = action.resolved();
                self.backend.begin_pass(Some(pass), &action, width, height);
            }
            None => debug!("skipping commands for unusable pass {pass:?}"),
        }
    }

    /// Size of the first color attachment of `pass`, if the pass is usable.
    fn pass_size(&self, pass: PassHandle) -> Option<(u32, u32)> {
        let record = self.tables.passes.lookup(pass)?;
        if record.slot.state != ResourceState::Valid {
            return None;
        }
        let att = record.info.color_attachments.first()?;
        let image = self.tables.images.lookup(att.image)?;
        Some(image.info.mip_size(att.mip_level))
    }

    /// Ends the current pass. Outside a pass this does nothing.
    pub fn end_pass(&mut self) {
        if !self.session.in_pass {
            return;
        }
        if self.session.pass_valid {
            self.backend.end_pass();
        }
        self.session = CommandSession::default();
    }

    /// Finishes the frame. The frame index advances here and nowhere else.
    pub fn commit(&mut self) {
        if self.session.in_pass {
            self.fatal(GfxError::CommitInsidePass);
        }
        self.backend.commit();
        self.frame.advance();
        trace!("frame {} begins", self.frame.current());
    }

    // ========================================================================
    // Fixed-function state
    // ========================================================================

    pub fn apply_viewport(&mut self, x: i32, y: i32, width: i32, height: i32, origin_top_left: bool) {
        if self.session.pass_valid {
            self.backend.apply_viewport(x, y, width, height, origin_top_left);
        }
    }

    pub fn apply_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32, origin_top_left: bool) {
        if self.session.pass_valid {
            self.backend.apply_scissor_rect(x, y, width, height, origin_top_left);
        }
    }

    // ========================================================================
    // Pipeline, bindings, uniforms
    // ========================================================================

    /// Selects the pipeline for the following draws.
    ///
    /// Previous bindings are invalidated. A failed pipeline makes the
    /// following draws skip; a stale handle is fatal.
    pub fn apply_pipeline(&mut self, pipeline: PipelineHandle) {
        self.session.bindings_valid = false;
        if !self.session.pass_valid {
            return;
        }

        let Some(record) = self.tables.pipelines.lookup(pipeline) else {
            self.fatal(GfxError::InvalidHandle {
                kind: ResourceKind::Pipeline,
                handle: pipeline.raw(),
            });
        };
        let valid = record.slot.state == ResourceState::Valid;
        let shader = record.info.shader;

        if valid && self.tables.shaders.lookup(shader).is_none() {
            self.fatal(GfxError::InvalidArgument(format!(
                "shader {shader:?} of {pipeline:?} no longer exists"
            )));
        }

        self.session.current_pipeline = pipeline;
        self.session.next_draw_valid = valid;
        if valid {
            self.backend.apply_pipeline(pipeline);
        }
    }

    /// Binds vertex/index buffers and images for the following draws.
    ///
    /// Every bound handle must be live. A bound resource that is not `Valid`,
    /// or a buffer whose overflow flag is set, makes the following draws skip.
    pub fn apply_bindings(&mut self, bindings: &Bindings) {
        if !self.session.pass_valid {
            return;
        }
        let pipeline = self.session.current_pipeline;
        if !pipeline.is_valid() {
            self.fatal(GfxError::NoPipeline);
        }

        let resolved = resolve_bindings(&self.tables, pipeline, bindings);
        let (resolved, usable) = self.or_fatal(resolved);

        self.session.next_draw_valid &= usable;
        self.session.bindings_valid = true;
        if self.session.next_draw_valid {
            self.backend.apply_bindings(&resolved);
        }
    }

    /// Uploads uniform block `slot` of `stage` for the following draws.
    ///
    /// `data` must be exactly the block size declared by the pipeline's shader.
    pub fn apply_uniforms(&mut self, stage: ShaderStage, slot: usize, data: &[u8]) {
        if slot >= MAX_UNIFORM_BLOCKS {
            self.fatal(GfxError::InvalidArgument(format!(
                "uniform block slot {slot} out of range (max {})",
                MAX_UNIFORM_BLOCKS - 1
            )));
        }
        if data.is_empty() {
            self.fatal(GfxError::InvalidArgument("uniform data is empty".into()));
        }
        if !self.session.pass_valid || !self.session.next_draw_valid {
            return;
        }

        let checked = self.check_uniform_block(stage, slot, data.len());
        self.or_fatal(checked);
        self.backend.apply_uniforms(stage, slot, data);
    }

    /// [`Gfx::apply_uniforms`] for a plain-old-data uniform struct.
    pub fn apply_uniforms_pod<T: Pod>(&mut self, stage: ShaderStage, slot: usize, uniforms: &T) {
        self.apply_uniforms(stage, slot, bytemuck::bytes_of(uniforms));
    }

    fn check_uniform_block(&self, stage: ShaderStage, slot: usize, len: usize) -> Result<()> {
        let pipeline = self.session.current_pipeline;
        let shader = self
            .tables
            .pipelines
            .lookup(pipeline)
            .map(|p| p.info.shader)
            .ok_or(GfxError::NoPipeline)?;
        let record = self.tables.shaders.lookup(shader).ok_or(GfxError::InvalidHandle {
            kind: ResourceKind::Shader,
            handle: shader.raw(),
        })?;

        let sizes = &record.interface.uniform_block_sizes[stage.index()];
        let Some(&size) = sizes.get(slot) else {
            return Err(GfxError::InvalidArgument(format!(
                "{stage:?} stage of {shader:?} declares {} uniform blocks, slot {slot} used",
                sizes.len()
            )));
        };
        if len != size {
            return Err(GfxError::InvalidArgument(format!(
                "uniform data is {len} bytes, {stage:?} block {slot} of {shader:?} is {size} bytes"
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Draw
    // ========================================================================

    /// Draws `num_elements` vertices (or indices) starting at `base_element`.
    ///
    /// Skipped unless the pass, the pipeline and the bindings are all usable.
    /// Debug builds report the first draw without bindings of each pass.
    pub fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        #[cfg(debug_assertions)]
        if self.session.pass_valid && !self.session.bindings_valid && !self.session.unbound_draw_reported {
            warn!("draw without resource bindings");
            self.session.unbound_draw_reported = true;
        }
        if !self.session.can_draw() {
            return;
        }
        self.backend.draw(base_element, num_elements, num_instances);
    }
}

/// Checks `bindings` against `pipeline` and resolves them for the backend.
///
/// Returns the resolved bindings and whether every bound resource is usable.
fn resolve_bindings(
    tables: &ResourceTables,
    pipeline: PipelineHandle,
    bindings: &Bindings,
) -> Result<(ResolvedBindings, bool)> {
    let info = tables
        .pipelines
        .lookup(pipeline)
        .map(|p| p.info)
        .ok_or(GfxError::InvalidHandle {
            kind: ResourceKind::Pipeline,
            handle: pipeline.raw(),
        })?;
    let mut resolved = ResolvedBindings {
        index_type: info.index_type,
        ..ResolvedBindings::default()
    };
    let mut usable = true;

    // Vertex buffers
    for (slot, (&buffer, &offset)) in bindings
        .vertex_buffers
        .iter()
        .zip(&bindings.vertex_buffer_offsets)
        .enumerate()
    {
        if !buffer.is_valid() {
            if slot < info.buffer_count {
                return Err(GfxError::InvalidArgument(format!(
                    "{pipeline:?} reads vertex buffer slot {slot}, which is not bound"
                )));
            }
            continue;
        }
        let record = tables.buffers.lookup(buffer).ok_or(GfxError::InvalidHandle {
            kind: ResourceKind::Buffer,
            handle: buffer.raw(),
        })?;
        if record.buffer_type != BufferType::Vertex {
            return Err(GfxError::InvalidArgument(format!(
                "{buffer:?} bound to vertex slot {slot} is not a vertex buffer"
            )));
        }
        usable &= record.slot.state == ResourceState::Valid && !record.stream.append_overflow;
        resolved.vertex_buffers.push((slot, buffer, offset));
    }

    // Index buffer
    let index = bindings.index_buffer;
    match (info.index_type, index.is_valid()) {
        (IndexType::None, true) => {
            return Err(GfxError::InvalidArgument(format!(
                "{pipeline:?} is non-indexed but {index:?} is bound as index buffer"
            )));
        }
        (IndexType::Uint16 | IndexType::Uint32, false) => {
            return Err(GfxError::InvalidArgument(format!(
                "{pipeline:?} is indexed but no index buffer is bound"
            )));
        }
        (_, true) => {
            let record = tables.buffers.lookup(index).ok_or(GfxError::InvalidHandle {
                kind: ResourceKind::Buffer,
                handle: index.raw(),
            })?;
            if record.buffer_type != BufferType::Index {
                return Err(GfxError::InvalidArgument(format!("{index:?} is not an index buffer")));
            }
            usable &= record.slot.state == ResourceState::Valid && !record.stream.append_overflow;
            resolved.index_buffer = Some((index, bindings.index_buffer_offset));
        }
        (_, false) => {}
    }

    // Images, checked against the shader interface while the shader is around
    let declared = tables.shaders.lookup(info.shader).map(|s| s.interface.num_images);
    for stage in ShaderStage::ALL {
        let num_declared = declared.map(|d| d[stage.index()]);
        for (slot, &image) in bindings.images(stage).iter().enumerate() {
            if !image.is_valid() {
                if num_declared.is_some_and(|n| slot < n) {
                    return Err(GfxError::InvalidArgument(format!(
                        "{stage:?} image slot {slot} declared by the shader is not bound"
                    )));
                }
                continue;
            }
            if let Some(n) = num_declared.filter(|&n| slot >= n) {
                return Err(GfxError::InvalidArgument(format!(
                    "{image:?} bound to {stage:?} image slot {slot}, shader declares {n}"
                )));
            }
            let record = tables.images.lookup(image).ok_or(GfxError::InvalidHandle {
                kind: ResourceKind::Image,
                handle: image.raw(),
            })?;
            usable &= record.slot.state == ResourceState::Valid;
            resolved.images[stage.index()].push((slot, image));
        }
    }

    Ok((resolved, usable))
}
