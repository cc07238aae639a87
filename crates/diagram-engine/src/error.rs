use thiserror::Error;

/// Errors raised while normalising animation input.
///
/// The frame loop never surfaces these: leaf constructors log them and fall
/// back to a zero-duration step. They are returned directly only from the
/// outer parsing surfaces (config loading, cancel-force parsing).
#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("failed to parse animation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("{kind} step was given both a target and a delta")]
    ConflictingEndpoints { kind: &'static str },

    #[error("{kind} step needs a target or a delta")]
    MissingEndpoint { kind: &'static str },

    #[error("invalid duration {0} (must be finite and >= 0)")]
    InvalidDuration(f64),

    #[error("unknown cancel force `{0}` (expected `complete` or `freeze`)")]
    InvalidForce(String),
}

pub type Result<T> = std::result::Result<T, AnimationError>;
