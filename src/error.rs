//! Configuration-validation error type.
//!
//! Per-string translation never fails: anomalies are recovered locally and
//! surfaced as warnings/flags on the result. The only fallible operation is
//! constructing a [`crate::engine::Translator`] from a defective
//! configuration (a prior that does not sum to 1, a missing failsafe rule,
//! a fallback member absent from the vocabulary, ...). Those are authoring
//! defects, caught once at construction time.

#[derive(Clone)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigError")
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for ConfigError {}
