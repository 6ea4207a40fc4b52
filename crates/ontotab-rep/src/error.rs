//! Representation-layer error types

use thiserror::Error;

/// Errors raised by the tabular representation layer.
#[derive(Debug, Error)]
pub enum RepError {
    /// A worksheet id that the provider has never seen.
    #[error("unknown worksheet: {0}")]
    UnknownWorksheet(String),

    /// A header path must contain at least one segment.
    #[error("empty header path")]
    EmptyHeaderPath,
}
