//! Command Validation Tests
//!
//! Tests for:
//! - Pass bracketing: nesting, commit inside a pass, skipped offscreen passes
//! - Draw gating by pipeline, bindings and resource states
//! - Binding and uniform checks against the pipeline's shader
//! - Default pass actions

mod common;

use common::{
    harness, pipeline_desc, plain_pipeline, shader_desc, stream_buffer, texture, vertex_buffer, Harness,
    VS_PARAMS_SIZE,
};
use glam::Vec4;
use slate::backend::BackendCall;
use slate::desc::{DEFAULT_CLEAR_COLOR, DEFAULT_CLEAR_DEPTH, DEFAULT_CLEAR_STENCIL};
use slate::prelude::*;

/// Records one triangle draw with a plain pipeline into the default pass.
fn draw_triangle(h: &mut Harness, pipeline: PipelineHandle, bindings: &Bindings) {
    h.gfx.begin_default_pass(&PassAction::default(), 640, 480);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(bindings);
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();
}

/// A pipeline over [`shader_desc`] plus bindings that satisfy it.
fn textured_setup(h: &mut Harness) -> (PipelineHandle, Bindings) {
    let shader = h.gfx.make_shader(&shader_desc()).unwrap();
    let pipeline = h.gfx.make_pipeline(&pipeline_desc(shader)).unwrap();
    let vbuf = vertex_buffer(&mut h.gfx);
    let image = texture(&mut h.gfx);
    let bindings = Bindings::vertex_buffer(vbuf).with_image(ShaderStage::Fragment, 0, image);
    (pipeline, bindings)
}

fn render_target(h: &mut Harness, width: u32, height: u32) -> PassHandle {
    let color = h
        .gfx
        .make_image(&ImageDesc::render_target(width, height, PixelFormat::Rgba8))
        .unwrap();
    let mut desc = PassDesc::default();
    desc.color_attachments.push(AttachmentDesc {
        image: color,
        ..Default::default()
    });
    h.gfx.make_pass(&desc).unwrap()
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn valid_frame_reaches_the_backend_in_order() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);
    h.log.clear();

    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf));
    h.gfx.commit();

    let calls = h.log.calls();
    assert!(matches!(calls[0], BackendCall::BeginPass { pass: None, width: 640, height: 480, .. }));
    assert_eq!(calls[1], BackendCall::ApplyPipeline(pipeline));
    match &calls[2] {
        BackendCall::ApplyBindings(resolved) => {
            assert_eq!(resolved.vertex_buffers.as_slice(), &[(0, vbuf, 0)]);
            assert_eq!(resolved.index_buffer, None);
        }
        other => panic!("expected ApplyBindings, got {other:?}"),
    }
    assert_eq!(
        calls[3],
        BackendCall::Draw {
            base_element: 0,
            num_elements: 3,
            num_instances: 1
        }
    );
    assert_eq!(calls[4], BackendCall::EndPass);
    assert_eq!(calls[5], BackendCall::Commit);
    assert_eq!(calls.len(), 6);
}

#[test]
fn default_pass_action_clears_to_default_values() {
    let mut h = harness();
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.end_pass();

    let Some(BackendCall::BeginPass { action, .. }) = h.log.calls().into_iter().next() else {
        panic!("expected BeginPass");
    };
    for color in action.colors {
        assert_eq!(color.action, Action::Clear);
        assert_eq!(color.value, DEFAULT_CLEAR_COLOR);
    }
    assert_eq!(action.depth.action, Action::Clear);
    assert_eq!(action.depth.value, DEFAULT_CLEAR_DEPTH);
    assert_eq!(action.stencil.value, DEFAULT_CLEAR_STENCIL);
}

#[test]
fn explicit_pass_action_is_kept() {
    let mut h = harness();
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    h.gfx.begin_default_pass(&PassAction::clear(red), 8, 8);
    h.gfx.end_pass();

    let Some(BackendCall::BeginPass { action, .. }) = h.log.calls().into_iter().next() else {
        panic!("expected BeginPass");
    };
    assert_eq!(action.colors[0].value, red);
    // Depth was left unset
    assert_eq!(action.depth.value, DEFAULT_CLEAR_DEPTH);
}

#[test]
fn textured_draw_with_uniforms() {
    let mut h = harness();
    let (pipeline, bindings) = textured_setup(&mut h);
    h.log.clear();

    h.gfx.begin_default_pass(&PassAction::default(), 64, 64);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(&bindings);
    h.gfx.apply_uniforms_pod(ShaderStage::Vertex, 0, &glam::Mat4::IDENTITY);
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();

    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyUniforms { .. })), 1);
    assert_eq!(h.log.draw_count(), 1);
}

// ============================================================================
// Pass bracketing
// ============================================================================

#[test]
#[should_panic(expected = "passes cannot nest")]
fn nested_pass_is_fatal() {
    let mut h = harness();
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
}

#[test]
#[should_panic(expected = "commit called while a pass is still active")]
fn commit_inside_pass_is_fatal() {
    let mut h = harness();
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.commit();
}

#[test]
fn end_pass_outside_a_pass_does_nothing() {
    let mut h = harness();
    h.gfx.end_pass();
    assert!(h.log.is_empty());
}

#[test]
fn offscreen_pass_uses_attachment_size() {
    let mut h = harness();
    let pass = render_target(&mut h, 256, 128);
    h.log.clear();

    h.gfx.begin_pass(pass, &PassAction::default());
    h.gfx.end_pass();

    assert!(matches!(
        h.log.calls()[0],
        BackendCall::BeginPass { pass: Some(p), width: 256, height: 128, .. } if p == pass
    ));
}

#[test]
fn destroyed_pass_skips_everything_until_end_pass() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);
    let pass = render_target(&mut h, 32, 32);
    h.gfx.destroy_pass(pass).unwrap();
    h.log.clear();

    h.gfx.begin_pass(pass, &PassAction::default());
    assert!(h.gfx.session().in_pass);
    assert!(!h.gfx.session().pass_valid);
    h.gfx.apply_viewport(0, 0, 32, 32, true);
    h.gfx.apply_scissor_rect(0, 0, 32, 32, true);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(&Bindings::vertex_buffer(vbuf));
    h.gfx.apply_uniforms(ShaderStage::Vertex, 0, &[0; 16]);
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();

    assert!(h.log.is_empty());
    assert!(!h.gfx.session().in_pass);

    // The bracket is balanced, so the next pass is not a nesting error
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.end_pass();
    h.gfx.commit();
}

#[test]
fn failed_pass_is_skipped() {
    let mut h = harness();
    h.log.fail_creations(ResourceKind::Pass);
    let pass = render_target(&mut h, 32, 32);
    h.log.clear();

    h.gfx.begin_pass(pass, &PassAction::default());
    h.gfx.end_pass();
    assert!(h.log.is_empty());
}

#[test]
fn viewport_and_scissor_reach_the_backend_inside_a_valid_pass() {
    let mut h = harness();
    h.gfx.apply_viewport(0, 0, 8, 8, true);
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_viewport(0, 0, 8, 8, true);
    h.gfx.apply_scissor_rect(1, 1, 4, 4, false);
    h.gfx.end_pass();

    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyViewport { .. })), 1);
    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyScissorRect { .. })), 1);
}

// ============================================================================
// Draw gating
// ============================================================================

#[test]
fn draw_without_bindings_is_skipped() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);

    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();

    assert_eq!(h.log.draw_count(), 0);
}

#[test]
fn new_pipeline_requires_new_bindings() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);

    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(&Bindings::vertex_buffer(vbuf));
    h.gfx.draw(0, 3, 1);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();

    assert_eq!(h.log.draw_count(), 1);
}

#[test]
fn failed_pipeline_skips_draws() {
    let mut h = harness();
    h.log.fail_creations(ResourceKind::Pipeline);
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);
    h.log.clear();

    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf));

    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyPipeline(_))), 0);
    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyBindings(_))), 0);
    assert_eq!(h.log.draw_count(), 0);
}

#[test]
fn failed_image_binding_skips_draws() {
    let mut h = harness();
    let shader = h.gfx.make_shader(&shader_desc()).unwrap();
    let pipeline = h.gfx.make_pipeline(&pipeline_desc(shader)).unwrap();
    let vbuf = vertex_buffer(&mut h.gfx);
    h.log.fail_creations(ResourceKind::Image);
    let image = texture(&mut h.gfx);
    h.log.clear();

    let bindings = Bindings::vertex_buffer(vbuf).with_image(ShaderStage::Fragment, 0, image);
    draw_triangle(&mut h, pipeline, &bindings);

    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyPipeline(_))), 1);
    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyBindings(_))), 0);
    assert_eq!(h.log.draw_count(), 0);
}

#[test]
fn overflowed_buffer_skips_draws_until_appended_again() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = stream_buffer(&mut h.gfx, 36);

    h.gfx.append_buffer(vbuf, &[0; 24]);
    h.gfx.append_buffer(vbuf, &[0; 24]);
    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf));
    assert_eq!(h.log.draw_count(), 0);
    h.gfx.commit();

    h.gfx.append_buffer(vbuf, &[0; 36]);
    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf));
    assert_eq!(h.log.draw_count(), 1);
}

#[test]
fn overflow_keeps_skipping_draws_in_frames_without_appends() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = stream_buffer(&mut h.gfx, 8);

    h.gfx.append_buffer(vbuf, &[0; 16]);
    h.gfx.commit();

    // The buffer still holds partial data from the overflowing frame
    assert!(h.gfx.query_buffer_overflow(vbuf));
    h.log.clear();
    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf));

    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyPipeline(_))), 1);
    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyBindings(_))), 0);
    assert_eq!(h.log.draw_count(), 0);
}

#[test]
#[should_panic(expected = "invalid pipeline handle")]
fn stale_pipeline_is_fatal() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    h.gfx.destroy_pipeline(pipeline).unwrap();

    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
}

#[test]
#[should_panic(expected = "no longer exists")]
fn pipeline_whose_shader_was_destroyed_is_fatal() {
    let mut h = harness();
    let shader = h.gfx.make_shader(&common::plain_shader_desc()).unwrap();
    let pipeline = h.gfx.make_pipeline(&pipeline_desc(shader)).unwrap();
    h.gfx.destroy_shader(shader).unwrap();

    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
#[should_panic(expected = "bindings applied without a current pipeline")]
fn bindings_without_pipeline_are_fatal() {
    let mut h = harness();
    let vbuf = vertex_buffer(&mut h.gfx);
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_bindings(&Bindings::vertex_buffer(vbuf));
}

#[test]
#[should_panic(expected = "invalid buffer handle")]
fn stale_vertex_buffer_is_fatal() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);
    h.gfx.destroy_buffer(vbuf).unwrap();
    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf));
}

#[test]
#[should_panic(expected = "which is not bound")]
fn missing_vertex_buffer_is_fatal() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    draw_triangle(&mut h, pipeline, &Bindings::default());
}

#[test]
#[should_panic(expected = "is not a vertex buffer")]
fn index_buffer_in_vertex_slot_is_fatal() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let ibuf = h
        .gfx
        .make_buffer(&BufferDesc::indices(bytemuck::cast_slice(&[0u16, 1, 2])))
        .unwrap();
    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(ibuf));
}

#[test]
#[should_panic(expected = "is non-indexed")]
fn index_buffer_on_non_indexed_pipeline_is_fatal() {
    let mut h = harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);
    let ibuf = h
        .gfx
        .make_buffer(&BufferDesc::indices(bytemuck::cast_slice(&[0u16, 1, 2])))
        .unwrap();
    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf).with_index_buffer(ibuf));
}

#[test]
fn indexed_draw_resolves_index_type() {
    let mut h = harness();
    let shader = h.gfx.make_shader(&common::plain_shader_desc()).unwrap();
    let pipeline = h
        .gfx
        .make_pipeline(&PipelineDesc {
            index_type: IndexType::Uint16,
            ..pipeline_desc(shader)
        })
        .unwrap();
    let vbuf = vertex_buffer(&mut h.gfx);
    let ibuf = h
        .gfx
        .make_buffer(&BufferDesc::indices(bytemuck::cast_slice(&[0u16, 1, 2])))
        .unwrap();
    h.log.clear();

    draw_triangle(&mut h, pipeline, &Bindings::vertex_buffer(vbuf).with_index_buffer(ibuf));

    let resolved = h.log.calls().into_iter().find_map(|c| match c {
        BackendCall::ApplyBindings(r) => Some(r),
        _ => None,
    });
    let resolved = resolved.expect("bindings reached the backend");
    assert_eq!(resolved.index_buffer, Some((ibuf, 0)));
    assert_eq!(resolved.index_type, IndexType::Uint16);
    assert_eq!(h.log.draw_count(), 1);
}

#[test]
#[should_panic(expected = "declared by the shader is not bound")]
fn missing_declared_image_is_fatal() {
    let mut h = harness();
    let (pipeline, bindings) = textured_setup(&mut h);
    let bindings = Bindings {
        fs_images: Default::default(),
        ..bindings
    };
    draw_triangle(&mut h, pipeline, &bindings);
}

#[test]
#[should_panic(expected = "shader declares 1")]
fn image_beyond_declared_slots_is_fatal() {
    let mut h = harness();
    let (pipeline, bindings) = textured_setup(&mut h);
    let extra = texture(&mut h.gfx);
    draw_triangle(&mut h, pipeline, &bindings.with_image(ShaderStage::Fragment, 1, extra));
}

// ============================================================================
// Uniforms
// ============================================================================

#[test]
#[should_panic(expected = "uniform block slot 4 out of range")]
fn uniform_slot_out_of_range_is_fatal() {
    let mut h = harness();
    h.gfx.apply_uniforms(ShaderStage::Vertex, 4, &[0; 16]);
}

#[test]
#[should_panic(expected = "uniform data is empty")]
fn empty_uniform_data_is_fatal() {
    let mut h = harness();
    h.gfx.apply_uniforms(ShaderStage::Vertex, 0, &[]);
}

#[test]
#[should_panic(expected = "uniform data is 16 bytes")]
fn uniform_size_mismatch_is_fatal() {
    let mut h = harness();
    let (pipeline, bindings) = textured_setup(&mut h);
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(&bindings);
    h.gfx.apply_uniforms(ShaderStage::Vertex, 0, &[0; 16]);
}

#[test]
#[should_panic(expected = "declares 0 uniform blocks")]
fn undeclared_uniform_block_is_fatal() {
    let mut h = harness();
    let (pipeline, bindings) = textured_setup(&mut h);
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(&bindings);
    h.gfx.apply_uniforms(ShaderStage::Fragment, 0, &[0; VS_PARAMS_SIZE]);
}

#[test]
fn uniforms_for_failed_pipeline_are_dropped() {
    let mut h = harness();
    h.log.fail_creations(ResourceKind::Pipeline);
    let pipeline = plain_pipeline(&mut h.gfx);
    h.log.clear();

    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_uniforms(ShaderStage::Vertex, 0, &[0; 16]);
    h.gfx.end_pass();

    assert_eq!(h.log.count(|c| matches!(c, BackendCall::ApplyUniforms { .. })), 0);
}
