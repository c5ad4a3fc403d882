//! Error types for buildplan
//!
//! Uses `thiserror` for library errors. Every variant is fatal: the tool
//! runs once per CI invocation and a failure must stop the pipeline rather
//! than mask a misconfiguration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for buildplan operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Main error type for buildplan operations
#[derive(Error, Debug)]
pub enum PlanError {
    /// Services directory could not be enumerated
    #[error("cannot enumerate services directory {path}: {source}")]
    ServicesDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A registered service is missing its dependency manifest
    #[error("cannot read dependency manifest for service '{service}' at {path}: {source}")]
    Manifest {
        service: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// No files found under a fingerprint root
    #[error("no files found under {dir} while fingerprinting '{unit}' - an empty service directory is a configuration fault")]
    NoFiles { unit: String, dir: PathBuf },

    /// Changed-file entry without a folder component
    #[error("changed file entry '{entry}' has no top-level folder component")]
    ChangedPath { entry: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
