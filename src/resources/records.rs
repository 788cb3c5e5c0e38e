use super::table::impl_record;
use crate::desc::{BufferType, ImageInfo, PassInfo, PipelineInfo, ShaderInterface, Usage};
use crate::slot::Slot;

/// Per-frame write bookkeeping of a streamable resource.
///
/// Frame stamps compare against the global frame index, which starts at 1,
/// so `0` reads as "never".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamState {
    pub last_update_frame: u64,
    pub last_append_frame: u64,
    /// Byte offset of the next append within the current frame
    pub append_cursor: usize,
    /// Set when an append did not fit; cleared only by the first append of a
    /// later frame, so it survives `commit`
    pub append_overflow: bool,
}

#[derive(Debug, Default)]
pub struct BufferRecord {
    pub slot: Slot,
    pub size: usize,
    pub buffer_type: BufferType,
    pub usage: Usage,
    pub stream: StreamState,
}

#[derive(Debug, Default)]
pub struct ImageRecord {
    pub slot: Slot,
    pub info: ImageInfo,
    pub stream: StreamState,
}

#[derive(Debug, Default)]
pub struct ShaderRecord {
    pub slot: Slot,
    pub interface: ShaderInterface,
}

#[derive(Debug, Default)]
pub struct PipelineRecord {
    pub slot: Slot,
    pub info: PipelineInfo,
}

#[derive(Debug, Default)]
pub struct PassRecord {
    pub slot: Slot,
    pub info: PassInfo,
}

#[derive(Debug, Default)]
pub struct ContextRecord {
    pub slot: Slot,
}

impl_record!(
    BufferRecord => Buffer,
    ImageRecord => Image,
    ShaderRecord => Shader,
    PipelineRecord => Pipeline,
    PassRecord => Pass,
    ContextRecord => Context,
);
