use thiserror::Error;

/// Errors emitted by pattern generation and reference resolution.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A `{..}` quantifier has bounds that are not unsigned integers.
    #[error("malformed quantifier {quantifier} in pattern {pattern}")]
    MalformedQuantifier { pattern: String, quantifier: String },
    /// Reference expansion went deeper than the configured limit.
    #[error("{path}: reference depth exceeded, chain: {}", chain.join(" -> "))]
    CyclicReference { path: String, chain: Vec<String> },
    #[error(transparent)]
    Locale(#[from] fabula_core::Error),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    /// A shared lock was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}
