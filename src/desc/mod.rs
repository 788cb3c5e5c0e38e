//! Creation Descriptors
//!
//! Plain data describing the objects the layer creates. Every descriptor
//! follows the "zero means default" convention: enum fields start at a
//! `Default` variant and numeric fields at `0`, and `with_defaults` turns a
//! caller's partial description into a complete one before it reaches the
//! backend.
//!
//! Descriptors borrow their bulk data (vertex bytes, shader source, pixels)
//! for the duration of the creation call. What a record needs afterwards is
//! copied into the owned `*Info` / [`ShaderInterface`] types.

pub mod bindings;
pub mod buffer;
pub mod format;
pub mod image;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod types;

pub use bindings::Bindings;
pub use buffer::BufferDesc;
pub use format::{PixelFormat, PixelFormatInfo};
pub use image::{ImageContent, ImageDesc, ImageInfo, SubImage};
pub use pass::{
    AttachmentDesc, ColorAction, DEFAULT_CLEAR_COLOR, DEFAULT_CLEAR_DEPTH, DEFAULT_CLEAR_STENCIL, DepthAction, PassAction,
    PassDesc, PassInfo, StencilAction,
};
pub use pipeline::{
    BlendState, BufferLayoutDesc, DepthStencilState, LayoutDesc, PipelineDesc, PipelineInfo, RasterizerState,
    StencilState, VertexAttrDesc,
};
pub use shader::{
    ShaderAttrDesc, ShaderDesc, ShaderImageDesc, ShaderInterface, ShaderStageDesc, UniformBlockDesc, UniformDesc,
};
pub use types::*;
