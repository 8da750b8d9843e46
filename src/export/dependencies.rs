use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::task;

use crate::export::{
    file::{self, FileSaveConfig},
    types::ExportError,
};
use crate::raster::{DefaultImageDecoder, ImageDecoder};

/// Abstraction over where flattened images end up.
#[async_trait]
pub trait ImagePersistence: Send + Sync {
    /// Stores the encoded PNG for `original` and returns the written path.
    async fn save(&self, original: &Path, image_data: Vec<u8>) -> Result<PathBuf, ExportError>;
}

/// Bundle of dependencies used by the export pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct ExportDependencies {
    pub decoder: Arc<dyn ImageDecoder>,
    pub persistence: Arc<dyn ImagePersistence>,
}

impl ExportDependencies {
    /// Default decoder with file persistence configured by `save_config`.
    pub fn with_save_config(save_config: FileSaveConfig) -> Self {
        Self {
            decoder: Arc::new(DefaultImageDecoder),
            persistence: Arc::new(FilePersistence {
                config: save_config,
            }),
        }
    }
}

impl Default for ExportDependencies {
    fn default() -> Self {
        Self::with_save_config(FileSaveConfig::default())
    }
}

/// Writes exports to disk via [`file::save_export`].
struct FilePersistence {
    config: FileSaveConfig,
}

#[async_trait]
impl ImagePersistence for FilePersistence {
    async fn save(&self, original: &Path, image_data: Vec<u8>) -> Result<PathBuf, ExportError> {
        let original = original.to_path_buf();
        let config = self.config.clone();
        task::spawn_blocking(move || file::save_export(&original, &image_data, &config))
            .await
            .map_err(|e| ExportError::Task(format!("Save task failed: {}", e)))?
    }
}
