use std::path::PathBuf;

use thiserror::Error;

/// Why the embedding capability could not be brought up.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("embedding backend not compiled in (rebuild with --features onnx)")]
    BackendDisabled,

    #[error("no embedding model directory configured")]
    NoModelConfigured,

    #[error("{file} not found in {dir}")]
    ModelFileMissing { dir: PathBuf, file: &'static str },

    #[error("failed to load embedding model: {0}")]
    Load(String),
}

/// Failure to read a rubric document.
#[derive(Debug, Error)]
pub enum RubricError {
    #[error("rubric file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read rubric file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rubric in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("rubric file {path} is empty")]
    Empty { path: PathBuf },
}
