//! The `Gfx` Facade
//!
//! [`Gfx`] owns the backend, the resource tables, the frame counter and the
//! command session. All public operations live here, split by concern:
//!
//! - `context`: context setup, activation and teardown
//! - `create`: `make_*` / `destroy_*` for every resource kind
//! - `stream`: per-frame update and append discipline
//! - `commands`: pass, pipeline, bindings, uniforms and draw validation
//!
//! # Failure Model
//!
//! Running out of pool slots and destroying from the wrong context are
//! recoverable: the call returns `Err` and logs a warning. Every other misuse
//! is a programming error and goes through [`Gfx::fatal`], which calls the
//! host's [`FatalHook`] and panics.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = RecordingBackend::new();
//! let mut gfx = Gfx::new(Box::new(backend), GfxSettings::default())?;
//!
//! let vbuf = gfx.make_buffer(&BufferDesc::vertices(bytemuck::cast_slice(&vertices)))?;
//! gfx.begin_default_pass(&PassAction::default(), 800, 600);
//! gfx.apply_pipeline(pipeline);
//! gfx.apply_bindings(&Bindings::vertex_buffer(vbuf));
//! gfx.draw(0, 3, 1);
//! gfx.end_pass();
//! gfx.commit();
//! ```

mod commands;
mod context;
mod create;
mod stream;

pub use commands::CommandSession;

use log::{debug, error};

use crate::backend::{BackendInfo, Features, GfxBackend, Limits};
use crate::desc::{PixelFormat, PixelFormatInfo};
use crate::errors::{GfxError, Result};
use crate::frame::FrameCounter;
use crate::handle::{BufferHandle, ContextHandle, ImageHandle, PassHandle, PipelineHandle, ShaderHandle};
use crate::resources::ResourceTables;
use crate::settings::GfxSettings;
use crate::slot::ResourceState;

/// Called with the error before a fatal misuse panics.
pub type FatalHook = Box<dyn FnMut(&GfxError)>;

/// A backend-agnostic resource manager and command validator.
pub struct Gfx {
    backend: Box<dyn GfxBackend>,
    info: BackendInfo,
    settings: GfxSettings,
    tables: ResourceTables,
    frame: FrameCounter,
    active_context: ContextHandle,
    session: CommandSession,
    fatal_hook: Option<FatalHook>,
    shut_down: bool,
}

impl Gfx {
    /// Sets up the pools and the default context.
    pub fn new(backend: Box<dyn GfxBackend>, settings: GfxSettings) -> Result<Self> {
        let settings = settings.with_defaults();
        settings.validate()?;

        let info = backend.info();
        debug!("initializing gfx on '{}' backend with {settings:?}", info.name);

        let mut gfx = Self {
            backend,
            info,
            settings,
            tables: ResourceTables::new(&settings)?,
            frame: FrameCounter::new(),
            active_context: ContextHandle::INVALID,
            session: CommandSession::default(),
            fatal_hook: None,
            shut_down: false,
        };
        gfx.setup_context()?;
        Ok(gfx)
    }

    /// Installs `hook`, replacing any previous one.
    pub fn set_fatal_hook(&mut self, hook: impl FnMut(&GfxError) + 'static) {
        self.fatal_hook = Some(Box::new(hook));
    }

    /// Reports a precondition violation and aborts the current operation.
    pub fn fatal(&mut self, err: GfxError) -> ! {
        error!("{err}");
        if let Some(hook) = self.fatal_hook.as_mut() {
            hook(&err);
        }
        panic!("{err}");
    }

    /// Unwraps `result`, escalating any error through [`Gfx::fatal`].
    pub(crate) fn or_fatal<T>(&mut self, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => self.fatal(err),
        }
    }

    /// Passes recoverable errors through and escalates the rest.
    pub(crate) fn recoverable<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Err(err) if !err.is_recoverable() => self.fatal(err),
            other => other,
        }
    }

    /// Tears down the active context and releases the backend.
    ///
    /// Runs automatically on drop when not called explicitly.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        let active = self.active_context;
        if self.tables.contexts.lookup(active).is_some() {
            self.destroy_context(active);
        }
        self.backend.shutdown();
        debug!("gfx shut down");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn settings(&self) -> &GfxSettings {
        &self.settings
    }

    #[must_use]
    pub fn backend_info(&self) -> &BackendInfo {
        &self.info
    }

    #[must_use]
    pub fn features(&self) -> Features {
        self.info.features
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        self.info.limits
    }

    /// Capabilities of `format`; asking about `Default` or `None` is fatal.
    pub fn pixel_format_info(&mut self, format: PixelFormat) -> PixelFormatInfo {
        if !format.is_concrete() {
            self.fatal(GfxError::InvalidArgument(format!(
                "no pixel format info for {format:?}"
            )));
        }
        self.backend.pixel_format_info(format)
    }

    /// Index of the frame being recorded; starts at 1 and advances on `commit`.
    #[inline]
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame.current()
    }

    #[must_use]
    pub fn buffer_state(&self, buffer: BufferHandle) -> Option<ResourceState> {
        self.tables.buffers.state(buffer)
    }

    #[must_use]
    pub fn image_state(&self, image: ImageHandle) -> Option<ResourceState> {
        self.tables.images.state(image)
    }

    #[must_use]
    pub fn shader_state(&self, shader: ShaderHandle) -> Option<ResourceState> {
        self.tables.shaders.state(shader)
    }

    #[must_use]
    pub fn pipeline_state(&self, pipeline: PipelineHandle) -> Option<ResourceState> {
        self.tables.pipelines.state(pipeline)
    }

    #[must_use]
    pub fn pass_state(&self, pass: PassHandle) -> Option<ResourceState> {
        self.tables.passes.state(pass)
    }

    /// Read-only view of the command session flags.
    #[must_use]
    pub fn session(&self) -> &CommandSession {
        &self.session
    }
}

impl Drop for Gfx {
    fn drop(&mut self) {
        // A second panic while unwinding from a fatal error would abort
        if !std::thread::panicking() {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for Gfx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gfx")
            .field("backend", &self.info.name)
            .field("settings", &self.settings)
            .field("frame", &self.frame.current())
            .field("active_context", &self.active_context)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
