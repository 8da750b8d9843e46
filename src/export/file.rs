//! File persistence for flattened exports.

use super::types::ExportError;
use crate::config::ExportConfig;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Configuration for file saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSaveConfig {
    /// Target directory; `None` writes next to the original image.
    pub output_directory: Option<PathBuf>,
    /// Inserted between the original stem and the timestamp.
    pub filename_suffix: String,
    /// chrono format specifiers for the timestamp.
    pub timestamp_format: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for FileSaveConfig {
    fn from(config: &ExportConfig) -> Self {
        let directory = config.output_directory.trim();
        Self {
            output_directory: (!directory.is_empty()).then(|| expand_tilde(directory)),
            filename_suffix: config.filename_suffix.clone(),
            timestamp_format: config.timestamp_format.clone(),
        }
    }
}

/// `<stem><suffix>_<timestamp>.png` for `original`.
pub fn generate_filename(original: &Path, config: &FileSaveConfig) -> String {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!(
        "{stem}{}_{}.png",
        config.filename_suffix,
        timestamp(&config.timestamp_format)
    )
}

fn timestamp(format: &str) -> String {
    use std::fmt::Write as _;

    let now = Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        log::warn!("Invalid timestamp format '{format}', using {DEFAULT_TIMESTAMP_FORMAT}");
        out = now.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
    }
    out
}

/// Directory the export of `original` is written to.
pub fn target_directory(original: &Path, config: &FileSaveConfig) -> PathBuf {
    if let Some(dir) = &config.output_directory {
        return dir.clone();
    }
    match original.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// First free path for `filename` in `directory`, appending `-1`, `-2`, ...
/// to the stem when an earlier export already took the name.
fn unique_path(directory: &Path, filename: &str) -> PathBuf {
    let candidate = directory.join(filename);
    if !candidate.exists() {
        return candidate;
    }
    let stem = filename.trim_end_matches(".png");
    (1u32..)
        .map(|n| directory.join(format!("{stem}-{n}.png")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Writes `image_data` for `original` through a temporary file in the target
/// directory and renames it into place, so a failed write leaves no partial file.
pub fn save_export(
    original: &Path,
    image_data: &[u8],
    config: &FileSaveConfig,
) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&target_directory(original, config))?;
    let file_path = unique_path(&directory, &generate_filename(original, config));

    log::info!(
        "Saving export to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );

    let mut temp = tempfile::Builder::new()
        .prefix(".rastermark-")
        .suffix(".tmp")
        .tempfile_in(&directory)?;
    temp.write_all(image_data)?;
    temp.as_file().sync_all()?;
    temp.persist(&file_path).map_err(|e| ExportError::Save(e.error))?;

    log::debug!("Export written: {} bytes", fs::metadata(&file_path)?.len());
    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
