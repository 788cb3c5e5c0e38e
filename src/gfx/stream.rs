//! Per-frame update and append discipline.
//!
//! Within one frame a streamable resource accepts either a single full
//! `update` or any number of `append`s, never both. Appends write at a cursor
//! that restarts at 0 with the first append of each frame; an append that
//! does not fit sets a sticky overflow flag instead of writing. The flag stays
//! set across `commit` until the buffer is appended to again, and draws that
//! bind an overflowed buffer are skipped meanwhile.

use log::warn;

use super::Gfx;
use crate::desc::{ImageContent, Usage};
use crate::errors::{GfxError, Result};
use crate::handle::{BufferHandle, ImageHandle, ResourceKind};
use crate::resources::StreamState;
use crate::slot::ResourceState;

/// Frame rules shared by every full update.
fn check_update(kind: ResourceKind, usage: Usage, stream: &StreamState, frame: u64) -> Result<()> {
    if usage == Usage::Immutable {
        return Err(GfxError::ImmutableUpdate { kind });
    }
    if stream.last_update_frame == frame {
        return Err(GfxError::MultipleUpdates { kind });
    }
    if stream.last_append_frame == frame {
        return Err(GfxError::UpdateAndAppend { kind });
    }
    Ok(())
}

impl Gfx {
    /// Replaces the contents of `buffer` from offset 0.
    ///
    /// Ignored for stale or not-`Valid` buffers and for empty `data`.
    pub fn update_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        let frame = self.frame.current();
        let Some(record) = self.tables.buffers.lookup(buffer) else {
            return;
        };
        if record.slot.state != ResourceState::Valid || data.is_empty() {
            return;
        }

        let checked = if data.len() > record.size {
            Err(GfxError::DataTooLarge {
                kind: ResourceKind::Buffer,
                size: data.len(),
                capacity: record.size,
            })
        } else {
            check_update(ResourceKind::Buffer, record.usage, &record.stream, frame)
        };
        self.or_fatal(checked);

        self.backend.update_buffer(buffer, data);
        if let Some(record) = self.tables.buffers.lookup_mut(buffer) {
            record.stream.last_update_frame = frame;
        }
    }

    /// Appends `data` to what was written into `buffer` this frame and
    /// returns the byte offset it was placed at.
    ///
    /// Stale handles return 0. When the data does not fit, nothing is written,
    /// the buffer stays flagged as overflowed until its first append in a
    /// later frame, and the returned offset is where the data would have gone.
    pub fn append_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> usize {
        let frame = self.frame.current();
        let Some(record) = self.tables.buffers.lookup_mut(buffer) else {
            return 0;
        };

        let stream = &mut record.stream;
        if stream.last_append_frame != frame {
            stream.append_cursor = 0;
            stream.append_overflow = false;
        }
        let offset = stream.append_cursor;
        if offset + data.len() > record.size {
            if !stream.append_overflow {
                warn!("{buffer:?} overflowed: {} + {} bytes > {}", offset, data.len(), record.size);
            }
            stream.append_overflow = true;
        }
        stream.last_append_frame = frame;

        if record.slot.state != ResourceState::Valid || stream.append_overflow || data.is_empty() {
            return offset;
        }

        let checked = if record.usage == Usage::Immutable {
            Err(GfxError::ImmutableUpdate {
                kind: ResourceKind::Buffer,
            })
        } else if stream.last_update_frame == frame {
            Err(GfxError::UpdateAndAppend {
                kind: ResourceKind::Buffer,
            })
        } else {
            stream.append_cursor += data.len();
            Ok(())
        };
        self.or_fatal(checked);

        self.backend.append_buffer(buffer, offset, data, offset == 0);
        offset
    }

    /// Whether the last frame that appended to `buffer` overflowed it.
    #[must_use]
    pub fn query_buffer_overflow(&self, buffer: BufferHandle) -> bool {
        self.tables
            .buffers
            .lookup(buffer)
            .is_some_and(|r| r.stream.append_overflow)
    }

    /// Replaces the pixel data of `image`.
    ///
    /// Ignored for stale or not-`Valid` images and for empty content.
    pub fn update_image(&mut self, image: ImageHandle, content: &ImageContent<'_>) {
        let frame = self.frame.current();
        let Some(record) = self.tables.images.lookup(image) else {
            return;
        };
        if record.slot.state != ResourceState::Valid || content.is_empty() {
            return;
        }

        let checked = check_update(ResourceKind::Image, record.info.usage, &record.stream, frame)
            .and_then(|()| record.info.check_content(content));
        self.or_fatal(checked);

        self.backend.update_image(image, content);
        if let Some(record) = self.tables.images.lookup_mut(image) {
            record.stream.last_update_frame = frame;
        }
    }
}
