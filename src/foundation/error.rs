/// Convenience result type used across burnfx.
pub type BurnResult<T> = Result<T, BurnError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Errors only surface while building an engine or loading a preset. A running
/// engine clamps instead of failing.
#[derive(thiserror::Error, Debug)]
pub enum BurnError {
    /// Invalid preset, region, ramp, timeline or particle configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing presets.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BurnError {
    /// Build a [`BurnError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`BurnError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for BurnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
