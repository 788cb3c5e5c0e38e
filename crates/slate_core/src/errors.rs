//! Error Types
//!
//! This module defines the error type shared by every Slate crate.
//!
//! # Overview
//!
//! [`GfxError`] covers two classes of failure:
//! - **Recoverable conditions**: pool exhaustion and context-mismatched destroys.
//!   These are returned to the caller and logged as warnings.
//! - **Precondition violations**: double frees, stale handles where a live one is
//!   required, frame-discipline violations, unbalanced passes. The core crate only
//!   *describes* them; the `Gfx` facade escalates them through its fatal path.
//!
//! # Usage
//!
//! ```rust,ignore
//! use slate_core::errors::{GfxError, Result};
//!
//! fn reserve(pool: &mut Pool) -> Result<u16> {
//!     pool.alloc_index().ok_or(GfxError::PoolExhausted { kind: ResourceKind::Buffer })
//! }
//! ```

use thiserror::Error;

use crate::handle::ResourceKind;
use crate::slot::ResourceState;

/// The error type for the Slate GFX layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    // ========================================================================
    // Pool & Handle Errors
    // ========================================================================
    /// No free slot is left in the pool of the given kind.
    #[error("{kind} pool exhausted")]
    PoolExhausted {
        /// Resource kind whose pool ran dry
        kind: ResourceKind,
    },

    /// A pool was configured with an unusable capacity.
    #[error("invalid {kind} pool size {size} (must be in 1..{max})")]
    InvalidPoolSize {
        kind: ResourceKind,
        size: usize,
        max: usize,
    },

    /// A slot index outside `1..=capacity` reached the pool.
    #[error("invalid slot index {index} (pool capacity {capacity})")]
    InvalidIndex { index: usize, capacity: usize },

    /// The index being freed is already on the free stack.
    #[error("double free of slot index {index}")]
    DoubleFree { index: u16 },

    /// A handle was requested for a slot that is still in use.
    #[error("slot {index} is not in the initial state and cannot be allocated")]
    SlotNotInitial { index: u16 },

    /// The handle does not name a live resource.
    #[error("invalid {kind} handle {handle:#010x}")]
    InvalidHandle { kind: ResourceKind, handle: u32 },

    /// Destroy was called from a context other than the owning one.
    #[error("active context mismatch: {kind} must be destroyed from the context it was created in")]
    ContextMismatch { kind: ResourceKind },

    // ========================================================================
    // Frame Discipline Errors
    // ========================================================================
    /// A second full update of the same resource within one frame.
    #[error("only one update allowed per {kind} and frame")]
    MultipleUpdates { kind: ResourceKind },

    /// Update and append were mixed on the same resource within one frame.
    #[error("update and append on the same {kind} in the same frame is not allowed")]
    UpdateAndAppend { kind: ResourceKind },

    /// The resource was created with immutable usage.
    #[error("{kind} with immutable usage cannot be updated")]
    ImmutableUpdate { kind: ResourceKind },

    /// More bytes than the resource can hold.
    #[error("data size {size} exceeds {kind} capacity {capacity}")]
    DataTooLarge {
        kind: ResourceKind,
        size: usize,
        capacity: usize,
    },

    // ========================================================================
    // Command Validation Errors
    // ========================================================================
    /// `begin_pass` while another pass is open.
    #[error("a pass is already active (passes cannot nest)")]
    NestedPass,

    /// `commit` while a pass is open.
    #[error("commit called while a pass is still active")]
    CommitInsidePass,

    /// `apply_bindings` without a pipeline applied in the current pass.
    #[error("bindings applied without a current pipeline")]
    NoPipeline,

    // ========================================================================
    // Backend & Descriptor Errors
    // ========================================================================
    /// The backend answered a create call with a state other than Valid/Failed.
    #[error("backend returned {state:?} when creating a {kind} (expected Valid or Failed)")]
    BackendContract {
        kind: ResourceKind,
        state: ResourceState,
    },

    /// A creation descriptor is malformed.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// A command argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GfxError {
    /// Whether the condition is part of normal operation under resource
    /// pressure, as opposed to a programming mistake.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GfxError::PoolExhausted { .. } | GfxError::ContextMismatch { .. }
        )
    }
}

/// Alias for `Result<T, GfxError>`.
pub type Result<T> = std::result::Result<T, GfxError>;
