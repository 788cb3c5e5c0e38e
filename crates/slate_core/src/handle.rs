//! Resource Handles
//!
//! A handle is an opaque 32-bit value `(generation << 16) | index`:
//! - the low 16 bits address a slot in the resource table of its kind,
//! - the high 16 bits carry the generation the slot had when the handle was issued.
//!
//! Index `0` is reserved, so the all-zero value [`Handle::INVALID`] never names a
//! resource. Handles are typed by a zero-sized marker so that a buffer handle
//! cannot be passed where an image handle is expected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Number of bits the generation is shifted by.
pub const SLOT_SHIFT: u32 = 16;
/// Mask selecting the slot index from a raw handle.
pub const SLOT_MASK: u32 = (1 << SLOT_SHIFT) - 1;
/// Slot index that is never handed out.
pub const INVALID_SLOT_INDEX: u16 = 0;
/// Raw value of every invalid handle.
pub const INVALID_ID: u32 = 0;
/// Exclusive upper bound for pool capacities.
pub const MAX_POOL_SIZE: usize = 1 << 16;

// ============================================================================
// Resource Kinds
// ============================================================================

/// The kinds of objects managed through handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Image,
    Shader,
    Pipeline,
    Pass,
    Context,
}

impl ResourceKind {
    /// Every kind stored in a per-context resource table, in teardown order.
    pub const RESOURCES: [ResourceKind; 5] = [
        ResourceKind::Buffer,
        ResourceKind::Image,
        ResourceKind::Shader,
        ResourceKind::Pipeline,
        ResourceKind::Pass,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Buffer => "buffer",
            ResourceKind::Image => "image",
            ResourceKind::Shader => "shader",
            ResourceKind::Pipeline => "pipeline",
            ResourceKind::Pass => "pass",
            ResourceKind::Context => "context",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker trait tying a handle type to its [`ResourceKind`].
pub trait HandleKind: 'static {
    const KIND: ResourceKind;
}

macro_rules! define_kinds {
    ($($marker:ident => $kind:ident, $alias:ident;)*) => {
        /// Zero-sized markers used as the type parameter of [`Handle`].
        pub mod kinds {
            $(
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
                pub enum $marker {}

                impl super::HandleKind for $marker {
                    const KIND: super::ResourceKind = super::ResourceKind::$kind;
                }
            )*
        }

        $(
            pub type $alias = Handle<kinds::$marker>;
        )*
    };
}

define_kinds! {
    Buffer => Buffer, BufferHandle;
    Image => Image, ImageHandle;
    Shader => Shader, ShaderHandle;
    Pipeline => Pipeline, PipelineHandle;
    Pass => Pass, PassHandle;
    Context => Context, ContextHandle;
}

// ============================================================================
// Handle
// ============================================================================

/// Generation-counted identifier of a resource of kind `K`.
#[repr(transparent)]
pub struct Handle<K> {
    raw: u32,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
    /// The handle that never names a resource.
    pub const INVALID: Self = Self::from_raw(INVALID_ID);

    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// Packs a generation and a slot index.
    #[inline]
    #[must_use]
    pub const fn compose(generation: u16, index: u16) -> Self {
        Self::from_raw(((generation as u32) << SLOT_SHIFT) | index as u32)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.raw
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        (self.raw & SLOT_MASK) as u16
    }

    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.raw >> SLOT_SHIFT) as u16
    }

    /// `false` for handles whose slot index is the reserved `0`.
    ///
    /// A `true` result says nothing about liveness; only a table lookup does.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.index() != INVALID_SLOT_INDEX
    }
}

impl<K: HandleKind> Handle<K> {
    #[inline]
    #[must_use]
    pub fn kind(self) -> ResourceKind {
        K::KIND
    }
}

impl<K> Clone for Handle<K> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K> Default for Handle<K> {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}#{}v{}", K::KIND, self.index(), self.generation())
        } else {
            write!(f, "{}#invalid", K::KIND)
        }
    }
}
