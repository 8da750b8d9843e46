//! Flattening annotations into the base image.

use crate::draw::{Annotation, Scene, compose};
use crate::raster::BaseImage;

use super::types::ExportError;

/// Draws `annotations` over `base` in canonical layer order and encodes the
/// result as PNG. Runs the same compositor as the live view.
pub fn flatten(base: &BaseImage, annotations: &[Annotation]) -> Result<Vec<u8>, ExportError> {
    let scene = Scene {
        base: Some(base),
        annotations,
        preview: None,
    };
    let surface = compose(&scene)
        .ok_or(ExportError::NoImage)?
        .map_err(ExportError::Render)?;

    let mut buffer = Vec::new();
    surface
        .write_to_png(&mut buffer)
        .map_err(|e| ExportError::Encode(e.to_string()))?;

    log::debug!(
        "Flattened {} annotations over {}x{} image ({} bytes)",
        annotations.len(),
        base.width(),
        base.height(),
        buffer.len()
    );
    Ok(buffer)
}
