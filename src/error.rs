//! Error types for the signature/delta core.
//!
//! Three kinds, matching the failure taxonomy of the system: I/O errors
//! from the octet source, codec errors from a malformed wire stream, and
//! configuration errors caught at construction time.

use std::fmt;

/// A staged failure with a human-readable cause.
///
/// `stage` names which part of the pipeline produced the error
/// (`"signature"`, `"delta"`, `"codec"`), per the error-handling design:
/// every error must carry a cause describing which input and stage
/// produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Propagated verbatim from the octet source or sink.
    #[error("{stage}: I/O error: {source}")]
    Io {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Truncated input, unknown record kind, or an oversized field.
    #[error("{stage}: codec error: {cause}")]
    Codec { stage: &'static str, cause: String },

    /// Invalid construction parameters (zero window size, buffer
    /// multiplier below one, etc).
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl Error {
    #[must_use]
    pub fn io(stage: &'static str, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }

    #[must_use]
    pub fn codec(stage: &'static str, cause: impl fmt::Display) -> Self {
        Self::Codec {
            stage,
            cause: cause.to_string(),
        }
    }

    #[must_use]
    pub fn config(reason: impl fmt::Display) -> Self {
        Self::Config {
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
