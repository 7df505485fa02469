//! Error handling for tokenfield-rs
//!
//! The widget itself never fails: malformed tokens, missing bindings and
//! missing hit-testing all degrade to a visible state instead of an error.
//! The types here cover the fallible edges around it, namely loading and
//! saving settings, binding catalogs and app state.

use thiserror::Error;

/// Main error type for tokenfield-rs operations
#[derive(Error, Debug)]
pub enum TokenFieldError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to binding catalogs
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TokenFieldError>,
    },
}

impl TokenFieldError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TokenFieldError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for TokenFieldError {
    fn from(err: toml::de::Error) -> Self {
        TokenFieldError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for TokenFieldError {
    fn from(err: toml::ser::Error) -> Self {
        TokenFieldError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for TokenFieldError {
    fn from(err: serde_json::Error) -> Self {
        TokenFieldError::Serialization(err.to_string())
    }
}

/// Result type alias for tokenfield-rs operations
pub type Result<T> = std::result::Result<T, TokenFieldError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TokenFieldError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
