//! Export merge: flattening annotations into a copy of the base image.
//!
//! This module provides:
//! - The merge itself, driven by the same compositor as the live view
//! - A background [`ExportManager`] that runs one export at a time
//! - File persistence with atomic temp-file-then-rename writes

pub mod file;
pub mod types;

mod dependencies;
mod manager;
mod merge;
mod pipeline;

pub use dependencies::{ExportDependencies, ImagePersistence};
pub use file::FileSaveConfig;
pub use manager::ExportManager;
pub use merge::flatten;
pub use pipeline::{ExportRequest, perform_export};
pub use types::{ExportError, ExportOutcome, ExportResult, ExportStatus};
