//! Synthesis error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while serializing or writing a template
///
/// Descriptor construction itself is pure and cannot fail; only the
/// serialization boundary and file output can.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write template to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SynthError>;
