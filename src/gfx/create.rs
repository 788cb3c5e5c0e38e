//! Resource creation and destruction.
//!
//! Every `make_*` call runs the same steps:
//! 1. merge the descriptor with its defaults (malformed descriptors are fatal),
//! 2. check references to other resources (pipeline shader, pass attachments),
//! 3. reserve a slot in the active context (exhaustion returns `Err`),
//! 4. let the backend create the object and record `Valid` or `Failed`.
//!
//! A `Failed` resource keeps its handle; draws that use it are skipped.

use log::{trace, warn};

use super::Gfx;
use crate::backend::GfxBackend;
use crate::desc::{
    AttachmentDesc, BufferDesc, ImageDesc, ImageInfo, PassDesc, PassInfo, PipelineDesc, PipelineInfo, ShaderDesc,
    ShaderInterface,
};
use crate::errors::{GfxError, Result};
use crate::handle::{
    BufferHandle, Handle, HandleKind, ImageHandle, PassHandle, PipelineHandle, ResourceKind, ShaderHandle,
};
use crate::resources::{Record, ResourceTables, Table};
use crate::slot::ResourceState;

impl Gfx {
    // ========================================================================
    // Creation
    // ========================================================================

    pub fn make_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferHandle> {
        let desc = desc.with_defaults();
        let desc = self.or_fatal(desc);

        let handle = self.alloc_slot(|t| &mut t.buffers)?;
        let state = self.backend.create_buffer(handle, &desc);
        let state = self.creation_state(ResourceKind::Buffer, state);

        if let Some(record) = self.tables.buffers.lookup_mut(handle) {
            record.slot.state = state;
            record.size = desc.size;
            record.buffer_type = desc.buffer_type;
            record.usage = desc.usage;
        }
        trace!("created {handle:?} ({} bytes, {:?}, {:?})", desc.size, desc.buffer_type, desc.usage);
        Ok(handle)
    }

    pub fn make_image(&mut self, desc: &ImageDesc<'_>) -> Result<ImageHandle> {
        let desc = desc.with_defaults(&self.info);
        let desc = self.or_fatal(desc);

        let handle = self.alloc_slot(|t| &mut t.images)?;
        let state = self.backend.create_image(handle, &desc);
        let state = self.creation_state(ResourceKind::Image, state);

        if let Some(record) = self.tables.images.lookup_mut(handle) {
            record.slot.state = state;
            record.info = ImageInfo::from(&desc);
        }
        trace!("created {handle:?} ({}x{} {:?})", desc.width, desc.height, desc.pixel_format);
        Ok(handle)
    }

    pub fn make_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<ShaderHandle> {
        let desc = desc.with_defaults();
        let desc = self.or_fatal(desc);

        let handle = self.alloc_slot(|t| &mut t.shaders)?;
        let state = self.backend.create_shader(handle, &desc);
        let state = self.creation_state(ResourceKind::Shader, state);

        if let Some(record) = self.tables.shaders.lookup_mut(handle) {
            record.slot.state = state;
            record.interface = ShaderInterface::from(&desc);
        }
        trace!("created {handle:?}");
        Ok(handle)
    }

    /// Creates a pipeline; its shader must be live and `Valid`.
    pub fn make_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<PipelineHandle> {
        let desc = desc.with_defaults(&self.info);
        let desc = self.or_fatal(desc);

        match self.tables.shaders.state(desc.shader) {
            None => self.fatal(GfxError::InvalidHandle {
                kind: ResourceKind::Shader,
                handle: desc.shader.raw(),
            }),
            Some(ResourceState::Valid) => {}
            Some(state) => self.fatal(GfxError::InvalidArgument(format!(
                "pipeline shader {:?} is {state:?}, expected Valid",
                desc.shader
            ))),
        }

        let handle = self.alloc_slot(|t| &mut t.pipelines)?;
        let state = self.backend.create_pipeline(handle, desc.shader, &desc);
        let state = self.creation_state(ResourceKind::Pipeline, state);

        if let Some(record) = self.tables.pipelines.lookup_mut(handle) {
            record.slot.state = state;
            record.info = PipelineInfo::from(&desc);
        }
        trace!("created {handle:?} with {:?}", desc.shader);
        Ok(handle)
    }

    /// Creates an offscreen pass; every attachment must be a live, `Valid`
    /// render target, all of the same size.
    pub fn make_pass(&mut self, desc: &PassDesc<'_>) -> Result<PassHandle> {
        let checked = desc.validate().and_then(|()| self.check_attachments(desc));
        self.or_fatal(checked);

        let handle = self.alloc_slot(|t| &mut t.passes)?;
        let state = self.backend.create_pass(handle, desc);
        let state = self.creation_state(ResourceKind::Pass, state);

        if let Some(record) = self.tables.passes.lookup_mut(handle) {
            record.slot.state = state;
            record.info = PassInfo::from(desc);
        }
        trace!("created {handle:?} with {} color attachments", desc.color_attachments.len());
        Ok(handle)
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Destroys `buffer`. Stale handles are ignored; destroying from a
    /// context other than the owner returns [`GfxError::ContextMismatch`].
    pub fn destroy_buffer(&mut self, buffer: BufferHandle) -> Result<()> {
        self.destroy_in(|t| &mut t.buffers, buffer, |b, h| b.destroy_buffer(h))
    }

    pub fn destroy_image(&mut self, image: ImageHandle) -> Result<()> {
        self.destroy_in(|t| &mut t.images, image, |b, h| b.destroy_image(h))
    }

    pub fn destroy_shader(&mut self, shader: ShaderHandle) -> Result<()> {
        self.destroy_in(|t| &mut t.shaders, shader, |b, h| b.destroy_shader(h))
    }

    pub fn destroy_pipeline(&mut self, pipeline: PipelineHandle) -> Result<()> {
        self.destroy_in(|t| &mut t.pipelines, pipeline, |b, h| b.destroy_pipeline(h))
    }

    pub fn destroy_pass(&mut self, pass: PassHandle) -> Result<()> {
        self.destroy_in(|t| &mut t.passes, pass, |b, h| b.destroy_pass(h))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn alloc_slot<R: Record>(
        &mut self,
        table: impl FnOnce(&mut ResourceTables) -> &mut Table<R>,
    ) -> Result<Handle<R::Kind>> {
        let owner = self.active_context.raw();
        let alloc = table(&mut self.tables).alloc(owner);
        self.recoverable(alloc)
    }

    /// Checks the backend's answer to a create call.
    fn creation_state(&mut self, kind: ResourceKind, state: ResourceState) -> ResourceState {
        match state {
            ResourceState::Valid => {}
            ResourceState::Failed => warn!("backend failed to create {kind}"),
            _ => self.fatal(GfxError::BackendContract { kind, state }),
        }
        state
    }

    fn destroy_in<R: Record>(
        &mut self,
        table: impl Fn(&mut ResourceTables) -> &mut Table<R>,
        handle: Handle<R::Kind>,
        destroy: impl FnOnce(&mut dyn GfxBackend, Handle<R::Kind>),
    ) -> Result<()> {
        let kind = <R::Kind as HandleKind>::KIND;
        let Some(slot) = table(&mut self.tables).lookup(handle).map(|r| *r.slot()) else {
            return Ok(());
        };
        if slot.owning_context != self.active_context.raw() {
            warn!("{kind} {handle:?} must be destroyed from the context it was created in");
            return Err(GfxError::ContextMismatch { kind });
        }

        if slot.state.is_created() {
            destroy(self.backend.as_mut(), handle);
        }
        let freed = table(&mut self.tables).free(handle);
        self.or_fatal(freed);
        trace!("destroyed {handle:?}");
        Ok(())
    }

    fn check_attachments(&self, desc: &PassDesc<'_>) -> Result<()> {
        let mut size = None;
        for (i, att) in desc.attachments().enumerate() {
            let is_depth = i >= desc.color_attachments.len();
            let info = self.attachment_info(att)?;
            if info.pixel_format.is_depth() != is_depth {
                return Err(GfxError::InvalidDescriptor(format!(
                    "pass attachment {:?} has format {:?}, which does not fit a {} attachment",
                    att.image,
                    info.pixel_format,
                    if is_depth { "depth-stencil" } else { "color" }
                )));
            }
            let mip_size = info.mip_size(att.mip_level);
            match size {
                None => size = Some(mip_size),
                Some(expected) if expected != mip_size => {
                    return Err(GfxError::InvalidDescriptor(format!(
                        "pass attachment {:?} is {}x{}, other attachments are {}x{}",
                        att.image, mip_size.0, mip_size.1, expected.0, expected.1
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn attachment_info(&self, att: &AttachmentDesc) -> Result<ImageInfo> {
        let Some(record) = self.tables.images.lookup(att.image) else {
            return Err(GfxError::InvalidHandle {
                kind: ResourceKind::Image,
                handle: att.image.raw(),
            });
        };
        if record.slot.state != ResourceState::Valid {
            return Err(GfxError::InvalidArgument(format!(
                "pass attachment {:?} is {:?}, expected Valid",
                att.image, record.slot.state
            )));
        }
        let info = record.info;
        if !info.render_target {
            return Err(GfxError::InvalidDescriptor(format!(
                "pass attachment {:?} is not a render target",
                att.image
            )));
        }
        if att.mip_level >= info.num_mipmaps {
            return Err(GfxError::InvalidDescriptor(format!(
                "pass attachment {:?} mip level {} out of range",
                att.image, att.mip_level
            )));
        }
        Ok(info)
    }
}
