//! Editor session: the annotation store, its undo history, tool settings and
//! the base image they are drawn over.
//!
//! `add`, `update` and `delete` are the only recording mutators. Undo and redo
//! go straight to the store's raw mutators through [`History`], so replays are
//! never recorded again.

mod tool_settings;

#[cfg(test)]
mod tests;

pub use tool_settings::ToolSettings;

use cairo::ImageSurface;
use log::{debug, info, warn};

use crate::draw::{
    Annotation, AnnotationId, AnnotationPatch, AnnotationStore, Scene, compositor,
};
use crate::export::ExportRequest;
use crate::history::{History, HistoryAction};
use crate::raster::{
    BaseImage, ImageError, ImageLoader, PendingLoad, TransformError, TransformRequest,
    TransformService,
};

/// Where the base image is in its lifecycle.
#[derive(Debug, Default)]
pub enum ImageState {
    #[default]
    Empty,
    Loading(PendingLoad),
    Ready(BaseImage),
    /// Decoding failed; rendering is withheld.
    Failed(String),
}

/// Owns everything a single editing session mutates.
#[derive(Debug)]
pub struct Editor {
    store: AnnotationStore,
    history: History,
    tool_settings: ToolSettings,
    /// Settings restored by [`Editor::reset`].
    defaults: ToolSettings,
    image: ImageState,
    /// Logical clock for ids and timestamps.
    clock: u64,
    needs_redraw: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(ToolSettings::default())
    }
}

impl Editor {
    pub fn new(tool_settings: ToolSettings) -> Self {
        Self {
            store: AnnotationStore::new(),
            history: History::new(),
            defaults: tool_settings.clone(),
            tool_settings,
            image: ImageState::Empty,
            clock: 0,
            needs_redraw: true,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.store.selected()
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tool_settings
    }

    /// Mutable tool settings. Only annotations created afterwards are affected.
    pub fn tool_settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.tool_settings
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Logical clock
    // ------------------------------------------------------------------

    /// Advances the logical clock and returns the new tick.
    pub fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Fresh annotation id (`annotation-<tick>`).
    pub fn next_id(&mut self) -> AnnotationId {
        AnnotationId(format!("annotation-{}", self.tick()))
    }

    // ------------------------------------------------------------------
    // Recording mutators
    // ------------------------------------------------------------------

    /// Appends an annotation and records the add. Rejects duplicate ids.
    pub fn add(&mut self, annotation: Annotation) -> bool {
        if self.store.position(&annotation.id).is_some() {
            warn!("Annotation {} already exists; ignoring add", annotation.id);
            return false;
        }

        let index = self.store.len();
        let stamp = self.tick();
        debug!("Add {} {}", annotation.kind.type_name(), annotation.id);
        self.store.push(annotation.clone());
        self.history
            .record(HistoryAction::add(stamp, annotation, index, stamp));
        self.needs_redraw = true;
        true
    }

    /// Merges `patch` into the annotation with `id`, bumping `updated_at`.
    /// Unknown ids and empty patches change nothing and record nothing.
    pub fn update(&mut self, id: &AnnotationId, patch: AnnotationPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let Some(index) = self.store.position(id) else {
            debug!("Update of unknown annotation {id} ignored");
            return false;
        };

        let before = self.store.annotations()[index].clone();
        let stamp = self.tick();
        let after = patch.apply(&before, stamp);
        self.store.replace(after.clone());
        self.history
            .record(HistoryAction::update(stamp, before, after, index, stamp));
        self.needs_redraw = true;
        true
    }

    /// Removes the annotation with `id` and records the delete.
    pub fn delete(&mut self, id: &AnnotationId) -> bool {
        let Some((index, removed)) = self.store.remove(id) else {
            debug!("Delete of unknown annotation {id} ignored");
            return false;
        };

        let stamp = self.tick();
        debug!("Delete {} at index {index}", removed.id);
        self.history
            .record(HistoryAction::delete(stamp, removed, index, stamp));
        self.needs_redraw = true;
        true
    }

    // ------------------------------------------------------------------
    // Non-recording operations
    // ------------------------------------------------------------------

    pub fn select(&mut self, id: Option<AnnotationId>) {
        let before = self.store.selected().cloned();
        self.store.select(id);
        if self.store.selected() != before.as_ref() {
            self.needs_redraw = true;
        }
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.store);
        self.needs_redraw |= changed;
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.store);
        self.needs_redraw |= changed;
        changed
    }

    /// Clears annotations, selection and history and restores the initial tool settings.
    /// The base image is kept.
    pub fn reset(&mut self) {
        self.clear_annotations();
        self.tool_settings = self.defaults.clone();
        info!("Editor reset");
    }

    fn clear_annotations(&mut self) {
        self.store.clear();
        self.history.clear();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Base image
    // ------------------------------------------------------------------

    pub fn image_state(&self) -> &ImageState {
        &self.image
    }

    pub fn base_image(&self) -> Option<&BaseImage> {
        match &self.image {
            ImageState::Ready(base) => Some(base),
            _ => None,
        }
    }

    /// Installs a decoded base image. Existing annotations and history refer
    /// to the previous image and are dropped.
    pub fn set_base_image(&mut self, base: BaseImage) {
        info!(
            "Base image {} ({}x{})",
            base.path().display(),
            base.width(),
            base.height()
        );
        self.clear_annotations();
        self.image = ImageState::Ready(base);
    }

    /// Starts replacing the base image with the result of `pending`.
    pub fn begin_image_load(&mut self, pending: PendingLoad) {
        debug!("Waiting for base image {}", pending.path().display());
        self.clear_annotations();
        self.image = ImageState::Loading(pending);
    }

    /// Polls an in-flight load. Returns `true` when it finished during this
    /// call, which also raises the redraw flag.
    pub fn poll_image(&mut self) -> bool {
        let ImageState::Loading(pending) = &mut self.image else {
            return false;
        };
        let Some(result) = pending.try_take() else {
            return false;
        };
        let path = pending.path().to_path_buf();

        self.image = match result.and_then(|pixels| BaseImage::new(path, pixels)) {
            Ok(base) => {
                info!(
                    "Base image ready: {} ({}x{})",
                    base.path().display(),
                    base.width(),
                    base.height()
                );
                ImageState::Ready(base)
            }
            Err(e) => {
                warn!("Base image failed to load: {e}");
                ImageState::Failed(e.to_string())
            }
        };
        self.needs_redraw = true;
        true
    }

    /// Routes a transform tool request to the external service and loads the
    /// image it produces. Annotations and history are cleared once the
    /// service succeeds.
    pub fn apply_transform(
        &mut self,
        service: &dyn TransformService,
        request: &TransformRequest,
        loader: &ImageLoader,
    ) -> Result<(), TransformError> {
        let input = match &self.image {
            ImageState::Ready(base) => base.path().to_path_buf(),
            ImageState::Loading(pending) => pending.path().to_path_buf(),
            _ => {
                return Err(TransformError::Failed(
                    "no base image to transform".to_string(),
                ));
            }
        };

        let output = service.apply(request, &input)?;
        info!("Transform {:?} produced {}", request, output.display());
        self.begin_image_load(loader.load(output));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rendering and export
    // ------------------------------------------------------------------

    pub fn scene<'a>(&'a self, preview: Option<&'a Annotation>) -> Scene<'a> {
        Scene {
            base: self.base_image(),
            annotations: self.store.annotations(),
            preview,
        }
    }

    /// Composites the current state. `None` until the base image is ready.
    pub fn render(
        &self,
        preview: Option<&Annotation>,
    ) -> Option<Result<ImageSurface, ImageError>> {
        compositor::compose(&self.scene(preview))
    }

    /// Snapshot of what export needs. Export never touches the editor.
    pub fn export_request(&self) -> Option<ExportRequest> {
        let path = match &self.image {
            ImageState::Ready(base) => base.path().to_path_buf(),
            _ => return None,
        };
        Some(ExportRequest {
            image_path: path,
            annotations: self.store.annotations().to_vec(),
        })
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns and clears the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}
