//! Default tuning constants for the trail simulation.
//!
//! These express intended behavior (stiffness, time constants, clamp limits)
//! and keep magic numbers out of the code. `TrailConfig::default()` is built
//! from them.
use glam::Vec3;

// Chain layout
pub const STRAND_COUNT: usize = 1;
pub const TRAIL_LENGTH: usize = 24; // nodes per strand (head = newest)

// Spring chain (per-frame units, unit time step)
pub const SPRING_STIFFNESS: f32 = 0.12; // pull toward the target point
pub const SPRING_DAMPING: f32 = 0.3; // velocity damping
pub const SPRING_INTERNAL_STIFFNESS: f32 = 0.25; // neighbor coupling along the chain
pub const SPRING_REST_LENGTH: f32 = 0.01; // world units between neighbors at rest

// Pointer
pub const IDLE_TIMEOUT_MS: f64 = 1000.0;
pub const VELOCITY_BLEND: f32 = 0.1; // smoothed = lerp(smoothed, raw, α)
pub const MAX_VELOCITY: f32 = 60.0; // px per frame mapped to velocity factor 1

// Visibility fade
pub const VISIBILITY_BLEND: f32 = 0.1;
pub const VISIBILITY_DRAW_MIN: f32 = 0.01; // below this no tube is emitted
pub const VISIBILITY_PULSE_MIN: f32 = 0.9; // pulses spawn only above this

// Idle pulses
pub const PULSE_INTERVAL_MS: f64 = 1000.0;
pub const PULSE_DURATION_MS: f64 = 1500.0;
pub const PULSE_MAX_RADIUS: f32 = 3.0; // scale grows to 1 + max at the end of life
pub const RING_INNER_RADIUS: f32 = 0.08;
pub const RING_OUTER_RADIUS: f32 = 0.1;
pub const RING_SEGMENTS: usize = 48;

// Tube
pub const TUBE_RADIUS_MIN: f32 = 0.015; // fast pointer
pub const TUBE_RADIUS_MAX: f32 = 0.06; // slow pointer
pub const TUBE_TUBULAR_SEGMENTS: usize = 64;
pub const TUBE_RADIAL_SEGMENTS: usize = 8;
pub const CURVE_TENSION: f32 = 0.5; // 0.5 = classic Catmull-Rom

// Camera
pub const CAMERA_Z: f32 = 5.0; // eye distance from the trail plane
pub const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Queued input intents held between steps
pub const MAX_PENDING_EVENTS: usize = 64;

// Delta-time scaled stepping clamps a long frame to this many reference frames
pub const MAX_STEP_SCALE: f32 = 4.0;

#[inline]
pub fn camera_eye() -> Vec3 {
    Vec3::new(0.0, 0.0, CAMERA_Z)
}
