//! Data types for the export merge.

use std::path::PathBuf;
use thiserror::Error;

use crate::raster::ImageError;

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Where the flattened PNG was written.
    pub saved_path: PathBuf,
    /// Size of the encoded PNG.
    pub byte_len: usize,
}

/// Outcome of an export request (success or failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Success(ExportResult),
    Failed(String),
}

/// Errors that can occur while flattening and saving an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to decode base image: {0}")]
    Decode(#[source] ImageError),

    #[error("Failed to draw annotations: {0}")]
    Render(#[source] ImageError),

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Failed to save export: {0}")]
    Save(#[from] std::io::Error),

    #[error("Export persistence failed: {0}")]
    Persistence(String),

    #[error("An export is already in progress")]
    AlreadyInProgress,

    #[error("No base image loaded")]
    NoImage,

    #[error("Export manager not running")]
    ManagerStopped,

    #[error("Export task failed: {0}")]
    Task(String),
}

/// Status of the export manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    InProgress,
    Success,
    Failed(String),
}
