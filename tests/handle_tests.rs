//! Handle & Pool Tests
//!
//! Tests for:
//! - Pool exhaustion through the public API (recoverable, earlier handles stay live)
//! - Generation counting: reused slots issue newer handles, old ones go stale
//! - Stale and invalid handles tolerated by queries, streaming and destroy

mod common;

use common::{harness_with, triangle_bytes, vertex_buffer};
use slate::backend::BackendCall;
use slate::prelude::*;

fn small_pools() -> GfxSettings {
    GfxSettings {
        buffer_pool_size: 3,
        ..Default::default()
    }
}

// ============================================================================
// Exhaustion
// ============================================================================

#[test]
fn allocation_past_capacity_fails_and_keeps_earlier_handles() {
    let mut h = harness_with(small_pools());
    let handles: Vec<_> = (0..3).map(|_| vertex_buffer(&mut h.gfx)).collect();

    let err = h.gfx.make_buffer(&BufferDesc::vertices(triangle_bytes())).unwrap_err();
    assert_eq!(err, GfxError::PoolExhausted { kind: ResourceKind::Buffer });
    assert!(err.is_recoverable());

    for handle in handles {
        assert_eq!(h.gfx.buffer_state(handle), Some(ResourceState::Valid));
    }
}

#[test]
fn exhausted_creation_yields_invalid_handle_via_default() {
    let mut h = harness_with(small_pools());
    for _ in 0..3 {
        vertex_buffer(&mut h.gfx);
    }
    let handle = h
        .gfx
        .make_buffer(&BufferDesc::vertices(triangle_bytes()))
        .unwrap_or_default();
    assert_eq!(handle, BufferHandle::INVALID);
    assert_eq!(h.gfx.buffer_state(handle), None);

    // Every tolerant API accepts the invalid handle
    h.gfx.update_buffer(handle, &[1, 2, 3]);
    assert_eq!(h.gfx.append_buffer(handle, &[1, 2, 3]), 0);
    assert!(!h.gfx.query_buffer_overflow(handle));
    assert_eq!(h.gfx.destroy_buffer(handle), Ok(()));
}

#[test]
fn exhaustion_issues_no_backend_create() {
    let mut h = harness_with(small_pools());
    for _ in 0..3 {
        vertex_buffer(&mut h.gfx);
    }
    h.log.clear();
    let _ = h.gfx.make_buffer(&BufferDesc::vertices(triangle_bytes()));
    assert!(h.log.is_empty());
}

// ============================================================================
// Generations
// ============================================================================

#[test]
fn reused_slot_gets_a_newer_generation() {
    let mut h = harness_with(small_pools());
    let first = vertex_buffer(&mut h.gfx);
    h.gfx.destroy_buffer(first).unwrap();

    let second = vertex_buffer(&mut h.gfx);
    assert_eq!(second.index(), first.index());
    assert!(second.generation() > first.generation());
    assert_ne!(second, first);

    assert_eq!(h.gfx.buffer_state(first), None);
    assert_eq!(h.gfx.buffer_state(second), Some(ResourceState::Valid));
}

#[test]
fn destroying_a_stale_handle_leaves_the_new_occupant_alone() {
    let mut h = harness_with(small_pools());
    let first = vertex_buffer(&mut h.gfx);
    h.gfx.destroy_buffer(first).unwrap();
    let second = vertex_buffer(&mut h.gfx);
    h.log.clear();

    assert_eq!(h.gfx.destroy_buffer(first), Ok(()));
    assert!(h.log.is_empty());
    assert_eq!(h.gfx.buffer_state(second), Some(ResourceState::Valid));
}

#[test]
fn destroy_frees_the_slot_for_reuse() {
    let mut h = harness_with(small_pools());
    let handles: Vec<_> = (0..3).map(|_| vertex_buffer(&mut h.gfx)).collect();
    h.gfx.destroy_buffer(handles[1]).unwrap();

    let again = vertex_buffer(&mut h.gfx);
    assert_eq!(again.index(), handles[1].index());
    assert!(h.gfx.make_buffer(&BufferDesc::vertices(triangle_bytes())).is_err());
}

#[test]
fn handles_are_never_zero_and_start_at_index_one() {
    let mut h = harness_with(small_pools());
    let first = vertex_buffer(&mut h.gfx);
    assert!(first.is_valid());
    assert_eq!(first.index(), 1);
    assert_ne!(first.raw(), 0);
}

#[test]
fn destroy_calls_the_backend_exactly_once() {
    let mut h = harness_with(small_pools());
    let buffer = vertex_buffer(&mut h.gfx);
    h.gfx.destroy_buffer(buffer).unwrap();
    h.gfx.destroy_buffer(buffer).unwrap();
    assert_eq!(h.log.count(|c| *c == BackendCall::DestroyBuffer(buffer)), 1);
}
