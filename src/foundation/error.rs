/// Crate-wide result alias.
pub type MorphResult<T> = Result<T, MorphError>;

/// Errors produced while parsing, normalizing, serializing or animating paths.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Path data could not be parsed. `offset` is the byte offset of the offending token.
    #[error("malformed path data at byte {offset}: {message}")]
    MalformedPath {
        /// Byte offset into the path-data string.
        offset: usize,
        /// Human-readable reason.
        message: String,
    },

    /// A flat cubic coordinate sequence does not have `2 + 6n` entries.
    #[error("invalid coordinate count: {0} (expected 2 + 6n)")]
    InvalidCoordinateCount(usize),

    /// Path coordinates whose axes disagree in length.
    #[error("mismatched coordinate axes: {x} x values, {y} y values")]
    MismatchedAxes {
        /// Number of x coordinates.
        x: usize,
        /// Number of y coordinates.
        y: usize,
    },

    /// A path has no sub-path that can be interpolated.
    #[error("path has no cubic sub-path")]
    EmptyPath,

    /// Scene graph misuse (unknown node, double attachment, cycles).
    #[error("scene error: {0}")]
    Scene(String),

    /// Invalid animation configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Any other error, typically I/O while loading configuration.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    /// Build a [`MorphError::MalformedPath`].
    pub fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedPath {
            offset,
            message: message.into(),
        }
    }

    /// Build a [`MorphError::Scene`].
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`MorphError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
