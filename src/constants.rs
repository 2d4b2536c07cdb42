// DOM wiring and host-loop constants for the web front-end.
// Simulation tuning lives in `trail_core::constants`; bloom and clear color
// live in `trail_render`.

// Element id of the render canvas in index.html
pub const CANVAS_ID: &str = "app-canvas";

// Pointer listeners are attached to the canvas
pub const EV_POINTER_MOVE: &str = "pointermove";
pub const EV_POINTER_ENTER: &str = "pointerenter";
pub const EV_POINTER_LEAVE: &str = "pointerleave";
pub const EV_CLICK: &str = "click";

// Window-level listener
pub const EV_KEYDOWN: &str = "keydown";

// Cap on devicePixelRatio when sizing the backing store
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Largest backing-store edge in pixels (WebGPU default maxTextureDimension2D)
pub const MAX_BACKING_EDGE: u32 = 8192;
