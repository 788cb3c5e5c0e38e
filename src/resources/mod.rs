//! Resource Records & Tables
//!
//! One [`Table`] per object kind, each with its own fixed-size pool:
//! - [`BufferRecord`]: size, type, usage and [`StreamState`]
//! - [`ImageRecord`]: [`ImageInfo`](crate::desc::ImageInfo) and [`StreamState`]
//! - [`ShaderRecord`]: the uniform/image interface of both stages
//! - [`PipelineRecord`]: the shader it was built against, index type, layout extent
//! - [`PassRecord`]: its attachments
//! - [`ContextRecord`]: identity only; ownership lives on each resource's slot

mod records;
mod table;

pub use records::{BufferRecord, ContextRecord, ImageRecord, PassRecord, PipelineRecord, ShaderRecord, StreamState};
pub use table::{Record, Table};

use crate::errors::Result;
use crate::handle::ResourceKind;
use crate::settings::GfxSettings;

/// Every resource table of a `Gfx` instance.
#[derive(Debug)]
pub struct ResourceTables {
    pub buffers: Table<BufferRecord>,
    pub images: Table<ImageRecord>,
    pub shaders: Table<ShaderRecord>,
    pub pipelines: Table<PipelineRecord>,
    pub passes: Table<PassRecord>,
    pub contexts: Table<ContextRecord>,
}

impl ResourceTables {
    pub fn new(settings: &GfxSettings) -> Result<Self> {
        Ok(Self {
            buffers: Table::new(ResourceKind::Buffer, settings.buffer_pool_size)?,
            images: Table::new(ResourceKind::Image, settings.image_pool_size)?,
            shaders: Table::new(ResourceKind::Shader, settings.shader_pool_size)?,
            pipelines: Table::new(ResourceKind::Pipeline, settings.pipeline_pool_size)?,
            passes: Table::new(ResourceKind::Pass, settings.pass_pool_size)?,
            contexts: Table::new(ResourceKind::Context, settings.context_pool_size)?,
        })
    }
}
