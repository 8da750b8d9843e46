use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

/// Errors raised while turning a file into drawable pixels.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image is too large for a drawing surface ({width}x{height})")]
    TooLarge { width: u32, height: u32 },

    #[error("Cairo surface error: {0}")]
    Surface(#[from] cairo::Error),

    #[error("Image loading task failed: {0}")]
    Task(String),
}

/// Decodes an image file at its natural size into straight-alpha RGBA.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<RgbaImage, ImageError>;
}

/// Decoder backed by the `image` crate, format guessed from the file contents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageDecoder;

impl ImageDecoder for DefaultImageDecoder {
    fn decode(&self, path: &Path) -> Result<RgbaImage, ImageError> {
        let decoded = image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| ImageError::Decode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(e),
            })?
            .decode()
            .map_err(|source| ImageError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );
        Ok(decoded.to_rgba8())
    }
}
