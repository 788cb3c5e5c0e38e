//! Foundational types for the Slate GFX layer.
//!
//! - [`handle`]: typed, generation-counted resource handles
//! - [`slot`]: per-record identity and validity state
//! - [`pool`]: fixed-capacity free-list index allocator
//! - [`frame`]: the frame counter scoping per-frame update rules
//! - [`errors`]: the shared error type

pub mod errors;
pub mod frame;
pub mod handle;
pub mod pool;
pub mod slot;

pub use errors::{GfxError, Result};
pub use frame::FrameCounter;
pub use handle::{
    BufferHandle, ContextHandle, Handle, HandleKind, ImageHandle, PassHandle, PipelineHandle,
    ResourceKind, ShaderHandle,
};
pub use pool::Pool;
pub use slot::{ResourceState, Slot};
