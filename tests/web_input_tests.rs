// Host-side tests for the web front-end's pure helpers and constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use input::*;

const RECT: CssRect = CssRect {
    left: 100.0,
    top: 50.0,
    width: 400.0,
    height: 300.0,
};

#[test]
fn css_maps_onto_backing_store() {
    // 2x devicePixelRatio backing store
    let p = css_to_backing_px(300.0, 200.0, RECT, 800, 600).expect("inside");
    assert!((p.x - 400.0).abs() < 1e-4);
    assert!((p.y - 300.0).abs() < 1e-4);

    let origin = css_to_backing_px(100.0, 50.0, RECT, 800, 600).expect("corner");
    assert_eq!((origin.x, origin.y), (0.0, 0.0));
}

#[test]
fn positions_outside_the_rect_are_not_clamped() {
    let p = css_to_backing_px(50.0, 20.0, RECT, 400, 300).expect("finite");
    assert!(p.x < 0.0 && p.y < 0.0);
}

#[test]
fn zero_sized_rect_gives_none() {
    let empty = CssRect {
        width: 0.0,
        ..RECT
    };
    assert!(css_to_backing_px(10.0, 10.0, empty, 800, 600).is_none());
}

#[test]
fn backing_size_applies_and_caps_dpr() {
    assert_eq!(backing_size(400.0, 300.0, 2.0, 2.0, 8192), (800, 600));
    assert_eq!(backing_size(400.0, 300.0, 3.0, 2.0, 8192), (800, 600));
    assert_eq!(backing_size(400.0, 300.0, f64::NAN, 2.0, 8192), (400, 300));
    assert_eq!(backing_size(0.0, 0.0, 1.0, 2.0, 8192), (1, 1));
    assert_eq!(backing_size(10_000.0, 10.0, 1.0, 2.0, 8192), (8192, 10));
}

#[test]
fn keys_map_to_actions() {
    assert_eq!(key_action("c"), Some(KeyAction::CyclePalette));
    assert_eq!(key_action("C"), Some(KeyAction::CyclePalette));
    assert_eq!(key_action(" "), Some(KeyAction::TogglePause));
    assert_eq!(key_action("Enter"), Some(KeyAction::ToggleFullscreen));
    assert_eq!(key_action("Escape"), Some(KeyAction::ExitFullscreen));
    assert_eq!(key_action("x"), None);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn dom_constants_are_sane() {
    assert_eq!(CANVAS_ID, "app-canvas");
    assert!(MAX_DEVICE_PIXEL_RATIO >= 1.0);
    assert!(MAX_BACKING_EDGE >= 2048);
    for ev in [EV_POINTER_MOVE, EV_POINTER_ENTER, EV_POINTER_LEAVE] {
        assert!(ev.starts_with("pointer"));
    }
    assert_eq!(EV_CLICK, "click");
    assert_eq!(EV_KEYDOWN, "keydown");
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn core_constants_keep_their_relationships() {
    use trail_core::constants::*;
    assert!(TUBE_RADIUS_MIN < TUBE_RADIUS_MAX);
    assert!(RING_INNER_RADIUS < RING_OUTER_RADIUS);
    assert!(PULSE_INTERVAL_MS < PULSE_DURATION_MS);
    assert!(VISIBILITY_DRAW_MIN < VISIBILITY_PULSE_MIN);
    assert!(SPRING_DAMPING > 0.0 && SPRING_DAMPING < 1.0);
    // stable for the semi-implicit step at h = 1
    assert!(SPRING_STIFFNESS + 4.0 * SPRING_INTERNAL_STIFFNESS < 4.0 - 2.0 * SPRING_DAMPING);
}
