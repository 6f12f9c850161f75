/// Convenience result type used across printzone.
pub type PrintZoneResult<T> = Result<T, PrintZoneError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Recoverable editor outcomes (missing layer ids, stale loads, unavailable exports) are not
/// errors; they are reported through return values and events instead.
#[derive(thiserror::Error, Debug)]
pub enum PrintZoneError {
    /// Invalid product, scene or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Asset bytes could not be decoded or resolved.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization or encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PrintZoneError {
    /// Build a [`PrintZoneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PrintZoneError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`PrintZoneError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PrintZoneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PrintZoneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
