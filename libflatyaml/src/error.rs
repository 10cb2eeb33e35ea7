//! Error types for flat YAML decoding.

use std::io;
use thiserror::Error;

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decode context carrying the source name for error reporting.
#[derive(Clone, Debug, Default)]
pub struct DecodeContext {
    pub source_name: Option<String>,
}

impl DecodeContext {
    /// Create a new decode context.
    pub fn new(source_name: Option<&str>) -> Self {
        Self {
            source_name: source_name.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    ///
    /// `line` and `col` are zero-based; messages are one-based.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.source_name {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at line {}", line + 1),
        }
    }
}

/// Error type for flat YAML decoding.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The source text could not be obtained.
    #[error("Source unavailable: {name}: {source}")]
    SourceUnavailable {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A line that cannot be classified given the current state.
    #[error("Malformed line ({0}){1}")]
    MalformedLine(String, String),

    /// A key that does not start with an ASCII letter or carries
    /// characters outside the key alphabet.
    #[error("Unresolvable key \"{0}\"{1}")]
    UnresolvableKey(String, String),

    /// Tab character used for indentation.
    #[error("Tab not allowed in indentation (use spaces){0}")]
    TabIndentation(String),
}

impl DecodeError {
    /// Create a malformed-line error without location.
    pub fn malformed(reason: impl Into<String>) -> Self {
        DecodeError::MalformedLine(reason.into(), String::new())
    }

    /// Create an unresolvable-key error without location.
    pub fn unresolvable_key(key: impl Into<String>) -> Self {
        DecodeError::UnresolvableKey(key.into(), String::new())
    }

    /// Wrap an I/O failure of the source collaborator.
    pub fn source_unavailable(name: impl Into<String>, source: io::Error) -> Self {
        DecodeError::SourceUnavailable {
            name: name.into(),
            source,
        }
    }

    /// Attach location information to a line-level error.
    pub fn with_location(self, ctx: &DecodeContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            DecodeError::MalformedLine(reason, _) => DecodeError::MalformedLine(reason, suffix),
            DecodeError::UnresolvableKey(key, _) => DecodeError::UnresolvableKey(key, suffix),
            DecodeError::TabIndentation(_) => DecodeError::TabIndentation(suffix),
            other => other,
        }
    }
}
