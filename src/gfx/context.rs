//! Context setup, activation and teardown.
//!
//! Every resource is stamped with the context that was active when it was
//! created. Destroying a context destroys everything stamped with it.

use log::{debug, warn};

use super::Gfx;
use crate::backend::GfxBackend;
use crate::errors::{GfxError, Result};
use crate::handle::{ContextHandle, Handle, ResourceKind};
use crate::resources::{Record, Table};
use crate::slot::ResourceState;

impl Gfx {
    /// Creates a context and makes it the active one.
    pub fn setup_context(&mut self) -> Result<ContextHandle> {
        let alloc = self.tables.contexts.alloc(ContextHandle::INVALID.raw());
        let ctx: ContextHandle = self.recoverable(alloc)?;

        let state = self.backend.create_context(ctx);
        if state != ResourceState::Valid {
            self.fatal(GfxError::BackendContract {
                kind: ResourceKind::Context,
                state,
            });
        }
        if let Some(record) = self.tables.contexts.lookup_mut(ctx) {
            record.slot.state = state;
        }

        self.active_context = ctx;
        self.backend.activate_context(ctx);
        debug!("context {ctx:?} set up and activated");
        Ok(ctx)
    }

    /// Makes `ctx` the context new resources are created in.
    pub fn activate_context(&mut self, ctx: ContextHandle) {
        if self.tables.contexts.lookup(ctx).is_none() {
            self.fatal(GfxError::InvalidHandle {
                kind: ResourceKind::Context,
                handle: ctx.raw(),
            });
        }
        self.active_context = ctx;
        self.backend.activate_context(ctx);
    }

    #[inline]
    #[must_use]
    pub fn active_context(&self) -> ContextHandle {
        self.active_context
    }

    /// Destroys every resource owned by `ctx`, then `ctx` itself.
    ///
    /// A stale handle is ignored. Destroying the active context leaves no
    /// context active.
    pub fn destroy_context(&mut self, ctx: ContextHandle) {
        if self.tables.contexts.lookup(ctx).is_none() {
            warn!("destroy_context called with stale handle {ctx:?}");
            return;
        }
        let owner = ctx.raw();
        let backend = self.backend.as_mut();
        let tables = &mut self.tables;

        // Dependents go first so a backend never sees a dangling reference
        let destroyed = [
            teardown(&mut tables.passes, backend, owner, |b, h| b.destroy_pass(h)),
            teardown(&mut tables.pipelines, backend, owner, |b, h| b.destroy_pipeline(h)),
            teardown(&mut tables.shaders, backend, owner, |b, h| b.destroy_shader(h)),
            teardown(&mut tables.images, backend, owner, |b, h| b.destroy_image(h)),
            teardown(&mut tables.buffers, backend, owner, |b, h| b.destroy_buffer(h)),
        ];
        let mut total = 0;
        for result in destroyed {
            total += self.or_fatal(result);
        }

        self.backend.destroy_context(ctx);
        let freed = self.tables.contexts.free(ctx);
        self.or_fatal(freed);

        if self.active_context == ctx {
            self.active_context = ContextHandle::INVALID;
        }
        debug!("context {ctx:?} destroyed along with {total} resources");
    }
}

/// Destroys and frees every created record of `table` owned by `owner`.
fn teardown<R: Record>(
    table: &mut Table<R>,
    backend: &mut dyn GfxBackend,
    owner: u32,
    destroy: impl Fn(&mut dyn GfxBackend, Handle<R::Kind>),
) -> Result<usize> {
    let owned = table.owned_by(owner);
    for &handle in &owned {
        destroy(&mut *backend, handle);
        table.free(handle)?;
    }
    Ok(owned.len())
}
