//! Error types

use crate::float_types::Real;

/// Everything that can stop a spring from being generated or emitted.
///
/// None of these are recoverable for the current invocation: the pipeline
/// either hands back a complete [`SpringModel`](crate::scene::SpringModel)
/// or one of these.
#[derive(Debug, thiserror::Error)]
pub enum SpringError {
    /// (Precondition) An input lies outside its documented range
    #[error("(Precondition) {parameter} = {value}: {reason}")]
    Precondition {
        parameter: &'static str,
        value: Real,
        reason: &'static str,
    },
    /// (Degenerate) The inputs describe geometry that cannot be built
    #[error("(Degenerate) {0}")]
    Degenerate(String),
    /// (DegenerateAngle) The start angle of a coil sampled at the origin
    #[error("(DegenerateAngle) cannot take the angle of ({x}, {y}), the coil radius is zero")]
    DegenerateAngle { x: Real, y: Real },
    /// (Config) A parameter file could not be parsed
    #[error("(Config) {0}")]
    Config(String),
    /// (Host) The scene collaborator refused an emission step
    #[error("(Host) {0}")]
    Host(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for SpringError {
    fn from(value: toml::de::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<toml::ser::Error> for SpringError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl SpringError {
    pub(crate) const fn precondition(
        parameter: &'static str,
        value: Real,
        reason: &'static str,
    ) -> Self {
        Self::Precondition { parameter, value, reason }
    }
}
