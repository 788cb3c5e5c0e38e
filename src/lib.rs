//! Slate: a backend-agnostic GPU resource manager.
//!
//! Applications create buffers, images, shaders, pipelines and passes through
//! typed handles; a [`GfxBackend`] does the device work. The layer owns:
//! - generation-counted handles over fixed-size pools,
//! - the `Initial -> Allocating -> Valid/Failed` lifecycle of every resource,
//! - per-frame update/append rules for streamed data,
//! - a command validator that drops draws which would touch unusable state.
//!
//! ```rust,ignore
//! use slate::prelude::*;
//!
//! let mut gfx = Gfx::new(Box::new(RecordingBackend::new()), GfxSettings::default())?;
//! let quad = gfx.make_buffer(&BufferDesc::vertices(bytemuck::cast_slice(&QUAD)))?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod backend;
pub mod desc;
pub mod gfx;
pub mod resources;
pub mod settings;

pub use slate_core::{errors, frame, handle, pool, slot};

pub use backend::{BackendCall, BackendInfo, CallLog, Features, GfxBackend, Limits, RecordingBackend};
pub use gfx::{CommandSession, FatalHook, Gfx};
pub use settings::GfxSettings;
pub use slate_core::{
    BufferHandle, ContextHandle, GfxError, Handle, ImageHandle, PassHandle, PipelineHandle, ResourceKind,
    ResourceState, Result, ShaderHandle,
};

/// Everything needed to drive a `Gfx` instance.
pub mod prelude {
    pub use crate::backend::{GfxBackend, RecordingBackend};
    pub use crate::desc::*;
    pub use crate::gfx::Gfx;
    pub use crate::settings::GfxSettings;
    pub use slate_core::{
        BufferHandle, ContextHandle, GfxError, ImageHandle, PassHandle, PipelineHandle, ResourceKind,
        ResourceState, ShaderHandle,
    };
}
