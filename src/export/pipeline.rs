use std::{fmt, path::PathBuf, sync::Arc};

use crate::draw::Annotation;
use crate::export::{
    dependencies::ExportDependencies,
    merge,
    types::{ExportError, ExportResult},
};
use crate::raster::{BaseImage, ImageDecoder};
use tokio::task;

/// Snapshot of the editor state an export needs.
#[derive(Clone, PartialEq)]
pub struct ExportRequest {
    pub image_path: PathBuf,
    pub annotations: Vec<Annotation>,
}

impl fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRequest")
            .field("image_path", &self.image_path)
            .field("annotations", &self.annotations.len())
            .finish()
    }
}

/// Decodes the base image, flattens the annotations and hands the PNG to the
/// configured persistence.
pub async fn perform_export(
    request: ExportRequest,
    dependencies: Arc<ExportDependencies>,
) -> Result<ExportResult, ExportError> {
    log::info!("Starting export: {:?}", request);

    let image_path = request.image_path.clone();
    let decoder = Arc::clone(&dependencies.decoder);

    // Cairo surfaces are not Send; decode and draw stay on one blocking thread.
    let image_data = task::spawn_blocking(move || render_export(decoder.as_ref(), &request))
        .await
        .map_err(|e| ExportError::Task(format!("Render task failed: {}", e)))??;

    let byte_len = image_data.len();
    log::debug!("Encoded export: {} bytes", byte_len);

    let saved_path = dependencies
        .persistence
        .save(&image_path, image_data)
        .await?;

    Ok(ExportResult {
        saved_path,
        byte_len,
    })
}

fn render_export(
    decoder: &dyn ImageDecoder,
    request: &ExportRequest,
) -> Result<Vec<u8>, ExportError> {
    let pixels = decoder
        .decode(&request.image_path)
        .map_err(ExportError::Decode)?;
    let base = BaseImage::new(&request.image_path, pixels).map_err(ExportError::Decode)?;
    merge::flatten(&base, &request.annotations)
}
