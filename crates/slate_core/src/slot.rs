//! Slot identity and validity state
//!
//! Every resource record embeds a [`Slot`]. The slot's `id` is the exact raw
//! handle currently issued for the record; a lookup succeeds only when the
//! caller's handle matches it bit for bit.

/// Validity state machine of a resource slot.
///
/// ```text
/// Initial --alloc--> Allocating --create ok--> Valid
///                               \-create err-> Failed
/// Valid | Failed --destroy--> Initial
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResourceState {
    #[default]
    Initial,
    Allocating,
    Valid,
    Failed,
}

impl ResourceState {
    /// Whether the backend has been asked to create the resource
    /// (and therefore must be asked to destroy it).
    #[inline]
    #[must_use]
    pub fn is_created(self) -> bool {
        matches!(self, ResourceState::Valid | ResourceState::Failed)
    }
}

/// Identity metadata stored in every resource record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    /// Raw handle issued for this slot, `0` when free
    pub id: u32,
    /// Raw handle of the context that created the resource
    pub owning_context: u32,
    pub state: ResourceState,
}

impl Slot {
    /// Whether `raw` names the resource currently occupying this slot.
    #[inline]
    #[must_use]
    pub fn matches(&self, raw: u32) -> bool {
        raw != crate::handle::INVALID_ID && self.id == raw
    }

    /// Returns the slot to its pristine state.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
