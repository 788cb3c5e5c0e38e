//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use slate::backend::CallLog;
use slate::prelude::*;
use slate::settings::GfxSettings;

/// Three `Float3` positions.
pub static TRIANGLE: [f32; 9] = [0.0, 0.5, 0.0, 0.5, -0.5, 0.0, -0.5, -0.5, 0.0];

/// Size of the vertex-stage uniform block declared by [`shader_desc`].
pub const VS_PARAMS_SIZE: usize = 64;

pub struct Harness {
    pub gfx: Gfx,
    pub log: CallLog,
}

pub fn harness() -> Harness {
    harness_with(GfxSettings::default())
}

pub fn harness_with(settings: GfxSettings) -> Harness {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = RecordingBackend::new();
    let log = backend.log();
    let gfx = Gfx::new(Box::new(backend), settings).expect("gfx setup");
    log.clear();
    Harness { gfx, log }
}

pub fn triangle_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&TRIANGLE)
}

pub fn vertex_buffer(gfx: &mut Gfx) -> BufferHandle {
    gfx.make_buffer(&BufferDesc::vertices(triangle_bytes())).unwrap()
}

pub fn stream_buffer(gfx: &mut Gfx, size: usize) -> BufferHandle {
    gfx.make_buffer(&BufferDesc::streaming(BufferType::Vertex, size)).unwrap()
}

/// A shader with one uniform block in the vertex stage and one image in the
/// fragment stage.
pub fn shader_desc() -> ShaderDesc<'static> {
    let mut desc = ShaderDesc {
        vs: ShaderStageDesc {
            source: Some("vertex source"),
            ..Default::default()
        },
        fs: ShaderStageDesc {
            source: Some("fragment source"),
            ..Default::default()
        },
        ..Default::default()
    };
    desc.vs.uniform_blocks.push(UniformBlockDesc {
        size: VS_PARAMS_SIZE,
        ..Default::default()
    });
    desc.fs.images.push(ShaderImageDesc {
        name: "tex",
        image_type: ImageType::Dim2,
    });
    desc
}

/// A shader without uniforms or images.
pub fn plain_shader_desc() -> ShaderDesc<'static> {
    ShaderDesc {
        vs: ShaderStageDesc {
            source: Some("vertex source"),
            ..Default::default()
        },
        fs: ShaderStageDesc {
            source: Some("fragment source"),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn pipeline_desc(shader: ShaderHandle) -> PipelineDesc<'static> {
    let mut desc = PipelineDesc {
        shader,
        ..Default::default()
    };
    desc.layout.attrs.push(VertexAttrDesc {
        name: "position",
        format: VertexFormat::Float3,
        ..Default::default()
    });
    desc
}

/// A valid pipeline over [`plain_shader_desc`].
pub fn plain_pipeline(gfx: &mut Gfx) -> PipelineHandle {
    let shader = gfx.make_shader(&plain_shader_desc()).unwrap();
    gfx.make_pipeline(&pipeline_desc(shader)).unwrap()
}

/// A dynamic 4x4 RGBA8 texture.
pub fn texture(gfx: &mut Gfx) -> ImageHandle {
    gfx.make_image(&ImageDesc {
        width: 4,
        height: 4,
        usage: Usage::Dynamic,
        ..Default::default()
    })
    .unwrap()
}
