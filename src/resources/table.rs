//! Per-kind resource storage.
//!
//! A [`Table`] pairs a [`Pool`] with a vector of records addressed by slot
//! index. Entry `0` is never used, so a record's position always equals the
//! index part of the handle naming it.

use log::warn;

use crate::errors::{GfxError, Result};
use crate::handle::{Handle, HandleKind, ResourceKind};
use crate::pool::Pool;
use crate::slot::{ResourceState, Slot};

/// A record stored in a [`Table`].
pub trait Record: Default {
    /// Kind of the handles naming records of this type.
    type Kind: HandleKind;

    fn slot(&self) -> &Slot;
    fn slot_mut(&mut self) -> &mut Slot;
}

macro_rules! impl_record {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl $crate::resources::Record for $ty {
                type Kind = $crate::handle::kinds::$kind;

                #[inline]
                fn slot(&self) -> &$crate::slot::Slot {
                    &self.slot
                }

                #[inline]
                fn slot_mut(&mut self) -> &mut $crate::slot::Slot {
                    &mut self.slot
                }
            }
        )*
    };
}
pub(crate) use impl_record;

#[derive(Debug)]
pub struct Table<R> {
    pool: Pool,
    records: Vec<R>,
}

impl<R: Record> Table<R> {
    pub fn new(kind: ResourceKind, capacity: usize) -> Result<Self> {
        let pool = Pool::new(kind, capacity)?;
        let records = (0..=capacity).map(|_| R::default()).collect();
        Ok(Self { pool, records })
    }

    #[inline]
    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Reserves a slot and issues a handle for it, owned by `owning_context`.
    ///
    /// Exhaustion is reported as [`GfxError::PoolExhausted`] and logged.
    pub fn alloc(&mut self, owning_context: u32) -> Result<Handle<R::Kind>> {
        let kind = self.pool.kind();
        let Some(index) = self.pool.alloc_index() else {
            warn!("{kind} pool exhausted");
            return Err(GfxError::PoolExhausted { kind });
        };
        let slot = self.records[index as usize].slot_mut();
        let handle = self.pool.alloc_handle(slot, index)?;
        slot.owning_context = owning_context;
        Ok(handle)
    }

    /// The record named by `handle`, if the handle is still current.
    #[inline]
    #[must_use]
    pub fn lookup(&self, handle: Handle<R::Kind>) -> Option<&R> {
        self.records
            .get(handle.index() as usize)
            .filter(|r| r.slot().matches(handle.raw()))
    }

    #[inline]
    pub fn lookup_mut(&mut self, handle: Handle<R::Kind>) -> Option<&mut R> {
        self.records
            .get_mut(handle.index() as usize)
            .filter(|r| r.slot().matches(handle.raw()))
    }

    /// State of the resource named by `handle`, `None` once it is gone.
    #[must_use]
    pub fn state(&self, handle: Handle<R::Kind>) -> Option<ResourceState> {
        self.lookup(handle).map(|r| r.slot().state)
    }

    /// Resets the record named by `handle` and returns its index to the pool.
    pub fn free(&mut self, handle: Handle<R::Kind>) -> Result<()> {
        let kind = self.pool.kind();
        let index = handle.index();
        let record = self.lookup_mut(handle).ok_or(GfxError::InvalidHandle {
            kind,
            handle: handle.raw(),
        })?;
        *record = R::default();
        self.pool.free_index(index)
    }

    /// Handles of every created resource owned by `context`.
    #[must_use]
    pub fn owned_by(&self, context: u32) -> Vec<Handle<R::Kind>> {
        self.records
            .iter()
            .map(Record::slot)
            .filter(|s| s.id != 0 && s.owning_context == context && s.state.is_created())
            .map(|s| Handle::from_raw(s.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::BufferHandle;

    #[derive(Debug, Default)]
    struct Dummy {
        slot: Slot,
    }

    impl_record!(Dummy => Buffer);

    #[test]
    fn lookup_requires_the_exact_handle() {
        let mut table = Table::<Dummy>::new(ResourceKind::Buffer, 2).unwrap();
        let h = table.alloc(1).unwrap();
        assert!(table.lookup(h).is_some());
        assert!(table.lookup(BufferHandle::INVALID).is_none());
        assert!(table.lookup(BufferHandle::compose(h.generation() + 1, h.index())).is_none());
        assert!(table.lookup(BufferHandle::compose(1, 999)).is_none());
    }

    #[test]
    fn freed_handles_stop_resolving() {
        let mut table = Table::<Dummy>::new(ResourceKind::Buffer, 1).unwrap();
        let h: BufferHandle = table.alloc(1).unwrap();
        table.free(h).unwrap();
        assert!(table.lookup(h).is_none());
        assert_eq!(table.pool().free_count(), 1);

        let again: BufferHandle = table.alloc(1).unwrap();
        assert_eq!(again.index(), h.index());
        assert!(table.lookup(h).is_none());
    }

    #[test]
    fn exhaustion_is_recoverable() {
        let mut table = Table::<Dummy>::new(ResourceKind::Buffer, 1).unwrap();
        let _: BufferHandle = table.alloc(1).unwrap();
        let err = table.alloc(1).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn owned_by_only_reports_created_records() {
        let mut table = Table::<Dummy>::new(ResourceKind::Buffer, 3).unwrap();
        let a: BufferHandle = table.alloc(7).unwrap();
        let b: BufferHandle = table.alloc(7).unwrap();
        let c: BufferHandle = table.alloc(8).unwrap();
        for h in [a, c] {
            table.lookup_mut(h).unwrap().slot.state = ResourceState::Valid;
        }
        // b is still Allocating
        assert_eq!(table.owned_by(7), vec![a]);
        assert!(table.lookup(b).is_some());
        assert_eq!(table.owned_by(8), vec![c]);
    }
}
