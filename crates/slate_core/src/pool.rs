//! Fixed-capacity slot pool
//!
//! A pure logical structure that does not hold any resource; it only hands out
//! slot indices and keeps one generation counter per index.
//!
//! - Capacity is fixed at construction and never grows.
//! - Index `0` is never allocated; it serves as the invalid sentinel.
//! - Exhaustion is reported as `None`, never as a failure.
//! - Every index in `1..=capacity` is either on the free stack or in use.

use log::debug;

use crate::errors::{GfxError, Result};
use crate::handle::{Handle, HandleKind, INVALID_SLOT_INDEX, MAX_POOL_SIZE, ResourceKind};
use crate::slot::{ResourceState, Slot};

/// Free-list allocator of slot indices with per-index generation counters.
#[derive(Debug, Clone)]
pub struct Pool {
    kind: ResourceKind,
    capacity: usize,
    /// Free indices; the top of the stack is handed out next
    free_stack: Vec<u16>,
    /// Generation of each index, `[0]` unused
    generations: Vec<u16>,
}

impl Pool {
    /// Creates a pool holding `capacity` slots (indices `1..=capacity`).
    pub fn new(kind: ResourceKind, capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity >= MAX_POOL_SIZE {
            return Err(GfxError::InvalidPoolSize {
                kind,
                size: capacity,
                max: MAX_POOL_SIZE,
            });
        }

        // From capacity down to 1, so pop() allocates lower indices first
        let free_stack = (1..=capacity as u16).rev().collect();
        debug!("{kind} pool created with {capacity} slots");

        Ok(Self {
            kind,
            capacity,
            free_stack,
            generations: vec![0; capacity + 1],
        })
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_stack.len()
    }

    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.capacity - self.free_stack.len()
    }

    /// Current generation counter of `index` (0 if never allocated).
    #[must_use]
    pub fn generation(&self, index: u16) -> u16 {
        self.generations.get(index as usize).copied().unwrap_or(0)
    }

    /// Pops a free index, or `None` when every slot is in use.
    #[inline]
    pub fn alloc_index(&mut self) -> Option<u16> {
        self.free_stack.pop()
    }

    /// Returns `index` to the free stack.
    ///
    /// Debug builds scan the stack first and report a double free.
    pub fn free_index(&mut self, index: u16) -> Result<()> {
        self.check_index(index)?;

        #[cfg(debug_assertions)]
        if self.free_stack.contains(&index) {
            return Err(GfxError::DoubleFree { index });
        }

        if self.free_stack.len() >= self.capacity {
            return Err(GfxError::DoubleFree { index });
        }

        self.free_stack.push(index);
        Ok(())
    }

    /// Issues a new handle for the slot at `index`.
    ///
    /// The slot must be untouched (`Initial` with id `0`). The generation of
    /// `index` is bumped, so handles issued for earlier occupants stop matching.
    pub fn alloc_handle<K: HandleKind>(&mut self, slot: &mut Slot, index: u16) -> Result<Handle<K>> {
        self.check_index(index)?;
        if slot.state != ResourceState::Initial || slot.id != 0 {
            return Err(GfxError::SlotNotInitial { index });
        }

        let counter = &mut self.generations[index as usize];
        *counter = counter.wrapping_add(1).max(1);

        let handle = Handle::<K>::compose(*counter, index);
        slot.id = handle.raw();
        slot.state = ResourceState::Allocating;
        Ok(handle)
    }

    fn check_index(&self, index: u16) -> Result<()> {
        if index == INVALID_SLOT_INDEX || index as usize > self.capacity {
            return Err(GfxError::InvalidIndex {
                index: index as usize,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
