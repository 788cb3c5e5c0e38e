use super::types::{MAX_STAGE_IMAGES, MAX_VERTEX_BUFFERS, ShaderStage};
use crate::handle::{BufferHandle, ImageHandle};

/// Resources bound for the following draws.
///
/// Unused slots hold [`Handle::INVALID`](crate::handle::Handle::INVALID).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bindings {
    pub vertex_buffers: [BufferHandle; MAX_VERTEX_BUFFERS],
    pub vertex_buffer_offsets: [u32; MAX_VERTEX_BUFFERS],
    pub index_buffer: BufferHandle,
    pub index_buffer_offset: u32,
    pub vs_images: [ImageHandle; MAX_STAGE_IMAGES],
    pub fs_images: [ImageHandle; MAX_STAGE_IMAGES],
}

impl Bindings {
    /// Bindings with a single vertex buffer in slot 0.
    #[must_use]
    pub fn vertex_buffer(buffer: BufferHandle) -> Self {
        let mut bindings = Self::default();
        bindings.vertex_buffers[0] = buffer;
        bindings
    }

    #[must_use]
    pub fn with_index_buffer(mut self, buffer: BufferHandle) -> Self {
        self.index_buffer = buffer;
        self
    }

    /// Binds `image` to image slot `slot` of `stage`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below [`MAX_STAGE_IMAGES`].
    #[must_use]
    pub fn with_image(mut self, stage: ShaderStage, slot: usize, image: ImageHandle) -> Self {
        assert!(
            slot < MAX_STAGE_IMAGES,
            "{stage:?} image slot {slot} out of range (max {})",
            MAX_STAGE_IMAGES - 1
        );
        match stage {
            ShaderStage::Vertex => self.vs_images[slot] = image,
            ShaderStage::Fragment => self.fs_images[slot] = image,
        }
        self
    }

    #[must_use]
    pub fn images(&self, stage: ShaderStage) -> &[ImageHandle; MAX_STAGE_IMAGES] {
        match stage {
            ShaderStage::Vertex => &self.vs_images,
            ShaderStage::Fragment => &self.fs_images,
        }
    }
}
