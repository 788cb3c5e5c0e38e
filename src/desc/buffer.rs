use super::types::{BufferType, Usage};
use crate::errors::{GfxError, Result};

/// Creation parameters of a vertex or index buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferDesc<'a> {
    /// Capacity in bytes, must be non-zero
    pub size: usize,
    pub buffer_type: BufferType,
    pub usage: Usage,
    /// Initial contents; required for immutable buffers
    pub content: Option<&'a [u8]>,
    pub label: Option<&'a str>,
}

impl<'a> BufferDesc<'a> {
    /// An immutable vertex buffer initialized from `data`.
    #[must_use]
    pub fn vertices(data: &'a [u8]) -> Self {
        Self {
            size: data.len(),
            buffer_type: BufferType::Vertex,
            content: Some(data),
            ..Default::default()
        }
    }

    /// An immutable index buffer initialized from `data`.
    #[must_use]
    pub fn indices(data: &'a [u8]) -> Self {
        Self {
            size: data.len(),
            buffer_type: BufferType::Index,
            content: Some(data),
            ..Default::default()
        }
    }

    /// An empty buffer of `size` bytes whose contents are streamed in later.
    #[must_use]
    pub fn streaming(buffer_type: BufferType, size: usize) -> Self {
        Self {
            size,
            buffer_type,
            usage: Usage::Stream,
            ..Default::default()
        }
    }

    /// Resolves unset fields and checks the result.
    pub fn with_defaults(&self) -> Result<Self> {
        let mut desc = *self;
        if desc.buffer_type == BufferType::Default {
            desc.buffer_type = BufferType::Vertex;
        }
        if desc.usage == Usage::Default {
            desc.usage = Usage::Immutable;
        }

        if desc.size == 0 {
            return Err(GfxError::InvalidDescriptor("buffer size must be greater than zero".into()));
        }
        match desc.content {
            None if desc.usage == Usage::Immutable => {
                return Err(GfxError::InvalidDescriptor("immutable buffers must be initialized with content".into()));
            }
            Some(data) if data.len() > desc.size => {
                return Err(GfxError::InvalidDescriptor(format!(
                    "buffer content of {} bytes exceeds size {}",
                    data.len(),
                    desc.size
                )));
            }
            _ => {}
        }
        Ok(desc)
    }
}
