use std::path::PathBuf;

use thiserror::Error;

/// Failures of the inference pipeline. None of them are recovered from;
/// they propagate to `main` and end the process.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to load model {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("SHA256 mismatch for model {}: expected {expected}, got {actual}", path.display())]
    Checksum {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

pub type Result<T, E = ClassifyError> = std::result::Result<T, E>;
