use thiserror::Error;

/// Rejected `TrailConfig` values. Raised once at session construction; the
/// frame step itself never fails.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidConstant { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value} ms")]
    NonPositiveDuration { name: &'static str, value: f64 },
    #[error("tube radius range inverted: min {min} > max {max}")]
    RadiusRange { min: f32, max: f32 },
    #[error("palette list is empty")]
    NoPalettes,
    #[error("reference rate must be positive, got {0} Hz")]
    ReferenceRate(f32),
}
