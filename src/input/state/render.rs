//! Live frame: the composited editor plus gesture preview and selection overlay.

use cairo::{Context, ImageSurface};

use crate::draw::{Annotation, AnnotationId, Bounds, Scene, compose, render};
use crate::input::tool::Tool;
use crate::raster::ImageError;

use super::core::PREVIEW_ID;
use super::{DrawingState, InputState, ResizeHandle};

impl InputState {
    /// Uncommitted annotation for the gesture in progress, drawn by the
    /// compositor with its layer. Dragging yields the moved copy and text
    /// entry the typed text.
    pub fn preview(&self) -> Option<Annotation> {
        let preview_id = || AnnotationId::from(PREVIEW_ID);
        match &self.state {
            DrawingState::Drawing(session) => {
                session.build_annotation(preview_id(), self.editor.tool_settings(), 0)
            }
            DrawingState::Dragging { id, dx, dy, .. } => self
                .editor
                .store()
                .get(id)
                .map(|annotation| annotation.translated(*dx, *dy)),
            DrawingState::TextInput { anchor, buffer } if !buffer.trim().is_empty() => {
                Some(self.text_annotation(preview_id(), 0, *anchor, buffer.clone()))
            }
            DrawingState::Idle | DrawingState::TextInput { .. } => None,
        }
    }

    /// Bounds the selection overlay is drawn around, following a drag in
    /// progress. Only shown with the select tool.
    pub fn selection_bounds(&self) -> Option<Bounds> {
        if self.active_tool != Tool::Select {
            return None;
        }
        if let DrawingState::Dragging { id, dx, dy, .. } = &self.state {
            return self
                .editor
                .store()
                .get(id)
                .map(|annotation| annotation.bounds.translated(*dx, *dy));
        }
        let id = self.editor.selected()?;
        self.editor.store().get(id).map(|annotation| annotation.bounds)
    }

    /// Composites the editor with the gesture preview and the selection
    /// overlay. `None` until the base image is ready.
    ///
    /// The overlay is drawn here only, so exports never contain it.
    pub fn render(&self) -> Option<Result<ImageSurface, ImageError>> {
        let frame = self.compose_frame()?;
        let Some(bounds) = self.selection_bounds() else {
            return Some(frame);
        };
        Some(frame.and_then(|surface| {
            draw_selection_overlay(&surface, &bounds)?;
            Ok(surface)
        }))
    }

    fn compose_frame(&self) -> Option<Result<ImageSurface, ImageError>> {
        let preview = self.preview();
        let DrawingState::Dragging { id, .. } = &self.state else {
            return self.editor.render(preview.as_ref());
        };

        // The dragged annotation is drawn only at its moved position.
        let others: Vec<Annotation> = self
            .editor
            .annotations()
            .iter()
            .filter(|a| &a.id != id)
            .cloned()
            .collect();
        compose(&Scene {
            base: self.editor.base_image(),
            annotations: &others,
            preview: preview.as_ref(),
        })
    }
}

fn draw_selection_overlay(surface: &ImageSurface, bounds: &Bounds) -> Result<(), ImageError> {
    let handles = ResizeHandle::ALL.map(|handle| handle.position(bounds));
    {
        let ctx = Context::new(surface)?;
        render::render_selection(&ctx, bounds, &handles)?;
    }
    surface.flush();
    Ok(())
}
