use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, mpsc};

use crate::export::{
    dependencies::ExportDependencies,
    file::FileSaveConfig,
    pipeline::{ExportRequest, perform_export},
    types::{ExportError, ExportOutcome, ExportStatus},
};

/// Runs exports on a background task so the editor loop never blocks.
///
/// Only one export runs at a time; requests made while one is in flight are
/// rejected rather than queued.
#[derive(Clone)]
pub struct ExportManager {
    /// Channel for sending export requests.
    request_tx: mpsc::UnboundedSender<ExportRequest>,
    /// Set from request acceptance until the outcome is stored.
    in_flight: Arc<AtomicBool>,
    /// Shared status of the current export.
    status: Arc<Mutex<ExportStatus>>,
    /// Outcome of the last export, until taken.
    last_result: Arc<Mutex<Option<ExportOutcome>>>,
}

impl ExportManager {
    /// Create an export manager writing files according to `save_config`.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    pub fn new(runtime_handle: &tokio::runtime::Handle, save_config: FileSaveConfig) -> Self {
        Self::with_dependencies(
            runtime_handle,
            ExportDependencies::with_save_config(save_config),
        )
    }

    /// Create an export manager with custom dependencies (useful for testing).
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: ExportDependencies,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ExportRequest>();
        let in_flight = Arc::new(AtomicBool::new(false));
        let status = Arc::new(Mutex::new(ExportStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));
        let dependencies = Arc::new(dependencies);

        let flight_clone = in_flight.clone();
        let status_clone = status.clone();
        let result_clone = last_result.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing export request: {:?}", request);
                *status_clone.lock().await = ExportStatus::InProgress;

                let (status, outcome) = match perform_export(request, dependencies.clone()).await
                {
                    Ok(result) => {
                        log::info!("Export saved: {}", result.saved_path.display());
                        (ExportStatus::Success, ExportOutcome::Success(result))
                    }
                    Err(e) => {
                        let error_message = e.to_string();
                        log::error!("Export failed: {}", error_message);
                        (
                            ExportStatus::Failed(error_message.clone()),
                            ExportOutcome::Failed(error_message),
                        )
                    }
                };
                *status_clone.lock().await = status;
                *result_clone.lock().await = Some(outcome);
                flight_clone.store(false, Ordering::Release);
            }
        });

        Self {
            request_tx,
            in_flight,
            status,
            last_result,
        }
    }

    /// Queue an export. Non-blocking; the outcome is picked up later with
    /// [`ExportManager::try_take_result`].
    ///
    /// # Errors
    /// `AlreadyInProgress` while a previous export has not finished,
    /// `ManagerStopped` if the background task is gone.
    pub fn request_export(&self, request: ExportRequest) -> Result<(), ExportError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Export requested while another is in progress");
            return Err(ExportError::AlreadyInProgress);
        }

        if self.request_tx.send(request).is_err() {
            self.in_flight.store(false, Ordering::Release);
            return Err(ExportError::ManagerStopped);
        }
        Ok(())
    }

    /// Whether an accepted export has not produced its outcome yet.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Get the current export status.
    pub async fn get_status(&self) -> ExportStatus {
        self.status.lock().await.clone()
    }

    /// Get the result of the last export and clear it.
    pub async fn take_result(&self) -> Option<ExportOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<ExportOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.status.lock().await = ExportStatus::Idle;
    }
}

#[cfg(test)]
impl ExportManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<ExportRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            in_flight: Arc::new(AtomicBool::new(false)),
            status: Arc::new(Mutex::new(ExportStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }
}
