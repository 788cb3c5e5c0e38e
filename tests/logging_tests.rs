//! Logging Tests
//!
//! Tests for:
//! - Warnings emitted by command validation, captured through a `log::Log` sink
//!
//! The sink is process-wide, so this binary holds a single test. The warning
//! only exists in debug builds.

#![cfg(debug_assertions)]

mod common;

use std::sync::Mutex;

use common::{plain_pipeline, vertex_buffer};
use log::{LevelFilter, Log, Metadata, Record};
use slate::prelude::*;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut lines) = LINES.lock() {
            lines.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture;

fn count(message: &str) -> usize {
    LINES.lock().unwrap().iter().filter(|l| l.as_str() == message).count()
}

#[test]
fn unbound_draw_is_reported_once_per_pass() {
    // Installed before the harness, whose env_logger init then backs off
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut h = common::harness();
    let pipeline = plain_pipeline(&mut h.gfx);
    let vbuf = vertex_buffer(&mut h.gfx);

    for _ in 0..2 {
        h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
        h.gfx.apply_pipeline(pipeline);
        h.gfx.draw(0, 3, 1);
        h.gfx.draw(0, 3, 1);
        h.gfx.draw(0, 3, 1);
        h.gfx.end_pass();
    }
    assert_eq!(count("draw without resource bindings"), 2);

    // Bound draws and draws outside a pass stay quiet
    h.gfx.begin_default_pass(&PassAction::default(), 8, 8);
    h.gfx.apply_pipeline(pipeline);
    h.gfx.apply_bindings(&Bindings::vertex_buffer(vbuf));
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();
    h.gfx.draw(0, 3, 1);

    assert_eq!(count("draw without resource bindings"), 2);
    assert_eq!(h.log.draw_count(), 1);
}
