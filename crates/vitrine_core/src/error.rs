use thiserror::Error;

/// Configuration defects detected at construction time. These indicate
/// a broken deployment table, not a runtime condition, so callers fail
/// fast instead of limping along with nonsense bounds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("camera distance bounds inverted: min {min} > max {max}")]
    DistanceBounds { min: f32, max: f32 },

    #[error("camera polar bounds out of range: [{min}, {max}] must be ordered and within (0, pi)")]
    PolarBounds { min: f32, max: f32 },

    #[error("camera field of view {fov} degrees is not in (0, 180)")]
    FieldOfView { fov: f32 },

    #[error("part `{part}`: {reason}")]
    Placement { part: String, reason: String },
}
