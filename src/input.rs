// Pure pointer and key mapping, free of DOM types so host tests can include it.

use trail_core::ScreenPoint;

/// Canvas bounding rect in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Map a client-space CSS position onto the canvas backing store.
/// Returns `None` while the canvas has no layout size.
#[inline]
pub fn css_to_backing_px(
    client_x: f32,
    client_y: f32,
    rect: CssRect,
    backing_width: u32,
    backing_height: u32,
) -> Option<ScreenPoint> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let x_css = client_x - rect.left;
    let y_css = client_y - rect.top;
    let sx = (x_css / rect.width) * backing_width as f32;
    let sy = (y_css / rect.height) * backing_height as f32;
    let p = ScreenPoint::new(sx, sy);
    p.is_finite().then_some(p)
}

/// Backing-store size for a canvas laid out at `css_w` x `css_h`.
#[inline]
pub fn backing_size(css_w: f64, css_h: f64, dpr: f64, max_dpr: f64, max_edge: u32) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 {
        dpr.min(max_dpr)
    } else {
        1.0
    };
    let edge = |css: f64| {
        let px = (css.max(0.0) * dpr) as u32;
        px.clamp(1, max_edge)
    };
    (edge(css_w), edge(css_h))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    CyclePalette,
    TogglePause,
    ToggleFullscreen,
    ExitFullscreen,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "c" | "C" => Some(KeyAction::CyclePalette),
        " " => Some(KeyAction::TogglePause),
        "Enter" => Some(KeyAction::ToggleFullscreen),
        "Escape" => Some(KeyAction::ExitFullscreen),
        _ => None,
    }
}
