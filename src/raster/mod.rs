//! Base image handling: decoding, Cairo surface conversion, background loading
//! and the contract for external pixel transforms.

pub mod decode;
pub mod loader;
pub mod surface;
pub mod transform;

use std::path::{Path, PathBuf};

use cairo::ImageSurface;
use image::RgbaImage;

pub use decode::{DefaultImageDecoder, ImageDecoder, ImageError};
pub use loader::{ImageLoader, PendingLoad};
pub use surface::rgba_to_surface;
pub use transform::{TransformError, TransformRequest, TransformService};

/// A decoded base image: the original pixels (sampled by the mosaic filter)
/// and a Cairo surface of the same pixels for the image layer.
#[derive(Debug)]
pub struct BaseImage {
    path: PathBuf,
    pixels: RgbaImage,
    surface: ImageSurface,
}

impl BaseImage {
    pub fn new(path: impl Into<PathBuf>, pixels: RgbaImage) -> Result<Self, ImageError> {
        let surface = rgba_to_surface(&pixels)?;
        Ok(Self {
            path: path.into(),
            pixels,
            surface,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
