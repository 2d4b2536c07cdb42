//! Session configuration. Values are fixed for the lifetime of a session.

use crate::constants::*;
use crate::error::ConfigError;
use crate::palette::{Palette, DEFAULT_PALETTES};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
    pub internal_stiffness: f32,
    pub rest_length: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: SPRING_STIFFNESS,
            damping: SPRING_DAMPING,
            internal_stiffness: SPRING_INTERNAL_STIFFNESS,
            rest_length: SPRING_REST_LENGTH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseParams {
    pub interval_ms: f64,
    pub duration_ms: f64,
    pub max_radius: f32,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            interval_ms: PULSE_INTERVAL_MS,
            duration_ms: PULSE_DURATION_MS,
            max_radius: PULSE_MAX_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TubeParams {
    pub radius_min: f32,
    pub radius_max: f32,
    pub tubular_segments: usize,
    pub radial_segments: usize,
    pub tension: f32,
}

impl Default for TubeParams {
    fn default() -> Self {
        Self {
            radius_min: TUBE_RADIUS_MIN,
            radius_max: TUBE_RADIUS_MAX,
            tubular_segments: TUBE_TUBULAR_SEGMENTS,
            radial_segments: TUBE_RADIAL_SEGMENTS,
            tension: CURVE_TENSION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub fov_y_radians: f32,
    pub distance: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_y_radians: CAMERA_FOV_Y,
            distance: CAMERA_Z,
        }
    }
}

/// How the integrator and the smoothing filters advance per frame.
///
/// `PerFrame` steps once per rendered frame regardless of wall-clock time, so
/// the trail feels faster on high refresh-rate displays. `Scaled` multiplies
/// the step by `dt / (1000 / reference_hz)`, which keeps the feel constant
/// across refresh rates but differs from the per-frame behavior at any rate
/// other than the reference.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum StepMode {
    #[default]
    PerFrame,
    Scaled { reference_hz: f32 },
}

impl StepMode {
    /// Step size `h` for a frame that took `dt_ms`.
    pub fn step_scale(&self, dt_ms: f64) -> f32 {
        match *self {
            StepMode::PerFrame => 1.0,
            StepMode::Scaled { reference_hz } => {
                let frame_ms = 1000.0 / reference_hz as f64;
                ((dt_ms / frame_ms) as f32).clamp(0.0, MAX_STEP_SCALE)
            }
        }
    }
}

/// Per-frame blend factor `alpha` rescaled to a step of size `h`.
#[inline]
pub fn scaled_blend(alpha: f32, h: f32) -> f32 {
    if h == 1.0 {
        alpha
    } else {
        1.0 - (1.0 - alpha).powf(h)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrailConfig {
    pub strand_count: usize,
    pub trail_length: usize,
    pub spring: SpringParams,
    pub idle_timeout_ms: f64,
    pub max_velocity: f32,
    pub velocity_blend: f32,
    pub visibility_blend: f32,
    pub pulse: PulseParams,
    pub tube: TubeParams,
    pub camera: CameraParams,
    pub palettes: Vec<Palette>,
    pub step_mode: StepMode,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            strand_count: STRAND_COUNT,
            trail_length: TRAIL_LENGTH,
            spring: SpringParams::default(),
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            max_velocity: MAX_VELOCITY,
            velocity_blend: VELOCITY_BLEND,
            visibility_blend: VISIBILITY_BLEND,
            pulse: PulseParams::default(),
            tube: TubeParams::default(),
            camera: CameraParams::default(),
            palettes: DEFAULT_PALETTES.to_vec(),
            step_mode: StepMode::PerFrame,
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_zero("strand_count", self.strand_count)?;
        non_zero("trail_length", self.trail_length)?;
        non_zero("tubular_segments", self.tube.tubular_segments)?;
        non_zero("radial_segments", self.tube.radial_segments)?;

        non_negative("stiffness", self.spring.stiffness)?;
        non_negative("damping", self.spring.damping)?;
        non_negative("internal_stiffness", self.spring.internal_stiffness)?;
        non_negative("rest_length", self.spring.rest_length)?;
        non_negative("velocity_blend", self.velocity_blend)?;
        non_negative("visibility_blend", self.visibility_blend)?;
        non_negative("pulse_max_radius", self.pulse.max_radius)?;
        non_negative("radius_min", self.tube.radius_min)?;
        non_negative("radius_max", self.tube.radius_max)?;
        if !(self.max_velocity.is_finite() && self.max_velocity > 0.0) {
            return Err(ConfigError::InvalidConstant {
                name: "max_velocity",
                value: self.max_velocity,
            });
        }

        positive_ms("idle_timeout_ms", self.idle_timeout_ms)?;
        positive_ms("pulse_interval_ms", self.pulse.interval_ms)?;
        positive_ms("pulse_duration_ms", self.pulse.duration_ms)?;

        if self.tube.radius_min > self.tube.radius_max {
            return Err(ConfigError::RadiusRange {
                min: self.tube.radius_min,
                max: self.tube.radius_max,
            });
        }
        if self.palettes.is_empty() {
            return Err(ConfigError::NoPalettes);
        }
        if let StepMode::Scaled { reference_hz } = self.step_mode {
            if !(reference_hz.is_finite() && reference_hz > 0.0) {
                return Err(ConfigError::ReferenceRate(reference_hz));
            }
        }
        Ok(())
    }
}

fn non_zero(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroCount { name });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::InvalidConstant { name, value });
    }
    Ok(())
}

fn positive_ms(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NonPositiveDuration { name, value });
    }
    Ok(())
}
