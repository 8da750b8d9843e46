//! Background decoding of base images.
//!
//! Decoding runs on tokio's blocking pool; the caller keeps a [`PendingLoad`]
//! and polls it from its own loop without blocking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::decode::{DefaultImageDecoder, ImageDecoder, ImageError};

/// Spawns decode jobs onto a tokio runtime.
#[derive(Clone)]
pub struct ImageLoader {
    runtime_handle: tokio::runtime::Handle,
    decoder: Arc<dyn ImageDecoder>,
}

impl ImageLoader {
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_decoder(runtime_handle, Arc::new(DefaultImageDecoder))
    }

    /// Loader with a custom decoder (useful for testing).
    pub fn with_decoder(
        runtime_handle: &tokio::runtime::Handle,
        decoder: Arc<dyn ImageDecoder>,
    ) -> Self {
        Self {
            runtime_handle: runtime_handle.clone(),
            decoder,
        }
    }

    /// Starts decoding `path` in the background.
    pub fn load(&self, path: impl Into<PathBuf>) -> PendingLoad {
        let path = path.into();
        let (tx, rx) = oneshot::channel();
        let decoder = self.decoder.clone();
        let job_path = path.clone();

        log::debug!("Loading base image {}", path.display());
        let task = self
            .runtime_handle
            .spawn_blocking(move || decoder.decode(&job_path));
        self.runtime_handle.spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(ImageError::Task(e.to_string())),
            };
            // Receiver may already be gone if the load was superseded.
            let _ = tx.send(result);
        });

        PendingLoad { path, rx }
    }
}

/// Handle to an in-flight decode.
#[derive(Debug)]
pub struct PendingLoad {
    path: PathBuf,
    rx: oneshot::Receiver<Result<RgbaImage, ImageError>>,
}

impl PendingLoad {
    /// Wraps an already-available result.
    pub fn ready(path: impl Into<PathBuf>, result: Result<RgbaImage, ImageError>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self {
            path: path.into(),
            rx,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking poll. `None` while decoding is still running.
    pub fn try_take(&mut self) -> Option<Result<RgbaImage, ImageError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(ImageError::Task(
                "loader dropped before finishing".to_string(),
            ))),
        }
    }

    /// Waits for the decode to finish.
    pub async fn wait(self) -> Result<RgbaImage, ImageError> {
        self.rx
            .await
            .unwrap_or_else(|_| Err(ImageError::Task("loader dropped before finishing".into())))
    }
}
