//! Frame sequencing
//!
//! The frame index is the unit of the "once per frame" rules applied to
//! streamed resources. It starts at 1 so that a watermark of 0 means "never".

/// Monotonic frame counter, advanced once per commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounter {
    frame_index: u64,
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCounter {
    /// Index of the first frame.
    pub const FIRST_FRAME: u64 = 1;

    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_index: Self::FIRST_FRAME,
        }
    }

    /// The frame currently being recorded.
    #[inline]
    #[must_use]
    pub fn current(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn advance(&mut self) {
        self.frame_index = self.frame_index.wrapping_add(1).max(Self::FIRST_FRAME);
    }
}
