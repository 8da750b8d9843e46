//! Contract for pixel-editing operations performed outside the editor.
//!
//! Crop, rotate, flip and resize are executed by an external image service.
//! The editor only hands over the current base image path and swaps in the
//! resulting file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::draw::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// A transform the user asked for through one of the transform tools.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformRequest {
    Crop(Bounds),
    /// Clockwise rotation in degrees.
    Rotate(i32),
    Flip(FlipAxis),
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Transform not supported: {0}")]
    Unsupported(String),

    #[error("Transform failed: {0}")]
    Failed(String),
}

/// External image service applying a transform to `input` and returning the
/// path of the produced image.
pub trait TransformService {
    fn apply(&self, request: &TransformRequest, input: &Path) -> Result<PathBuf, TransformError>;
}
