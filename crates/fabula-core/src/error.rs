use thiserror::Error;

/// Core error type shared across Fabula crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The path is absent from both the active and the fallback locale.
    #[error("{path}: path not found in active or fallback locale")]
    PathNotFound { path: String },
    /// A path prefix resolved to a leaf where a mapping was expected.
    #[error("{path}: invalid locale shape, '{segment}' is not a mapping")]
    InvalidLocaleShape { path: String, segment: String },
    /// The addressed value cannot be turned into a string.
    #[error("{path}: unsupported leaf type {found}")]
    UnsupportedLeafType { path: String, found: String },
    /// The addressed sequence has nothing to choose from.
    #[error("{path}: empty list")]
    EmptyList { path: String },
    /// Locale data could not be decoded.
    #[error("locale parse error: {0}")]
    Parse(String),
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Convenience alias for results returned by Fabula crates.
pub type Result<T> = std::result::Result<T, Error>;
