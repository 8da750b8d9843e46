use crate::draw::{AnnotationPatch, Point};
use crate::input::{events::MouseButton, session::DrawingSession, tool::Tool};
use crate::raster::TransformRequest;
use log::debug;

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a mouse button press event.
    ///
    /// # Behavior
    /// - Left press with an open text entry: resolves it (blur), then opens a
    ///   new entry at the pointer
    /// - Left press with Select: selects the topmost hit and starts a drag, or
    ///   clears the selection on a miss
    /// - Left press with a drawing tool: starts a drawing session
    /// - Right press: cancels the drawing session or drag
    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) {
        let point = Point::new(x, y);
        match button {
            MouseButton::Left => {
                if matches!(self.state, DrawingState::TextInput { .. }) {
                    self.resolve_text_entry();
                } else if !matches!(self.state, DrawingState::Idle) {
                    return;
                }
                self.begin_gesture(point);
            }
            MouseButton::Right => {
                if matches!(
                    self.state,
                    DrawingState::Drawing(_) | DrawingState::Dragging { .. }
                ) {
                    self.cancel_gesture();
                }
            }
            MouseButton::Middle => {}
        }
    }

    fn begin_gesture(&mut self, point: Point) {
        match self.active_tool {
            Tool::Select => {
                let hit = self.editor.store().hit_test(point).map(|a| a.id.clone());
                match hit {
                    Some(id) => {
                        debug!("Selected {id}");
                        self.editor.select(Some(id.clone()));
                        self.state = DrawingState::Dragging {
                            id,
                            origin: point,
                            dx: 0.0,
                            dy: 0.0,
                        };
                    }
                    None => self.editor.select(None),
                }
            }
            Tool::Text => {
                self.state = DrawingState::TextInput {
                    anchor: point,
                    buffer: String::new(),
                };
                self.editor.request_redraw();
            }
            tool if tool.starts_session() => {
                self.state = DrawingState::Drawing(DrawingSession::begin(tool, point));
                self.editor.request_redraw();
            }
            tool => debug!("{} tool has no pointer gesture", tool.name()),
        }
    }

    /// Processes pointer motion.
    ///
    /// Drawing sessions record the position; drags accumulate the net delta.
    /// The store is never written here.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) {
        let point = Point::new(x, y);
        match &mut self.state {
            DrawingState::Drawing(session) => {
                session.extend(point);
                self.editor.request_redraw();
            }
            DrawingState::Dragging { origin, dx, dy, .. } => {
                *dx = point.x - origin.x;
                *dy = point.y - origin.y;
                self.editor.request_redraw();
            }
            DrawingState::Idle | DrawingState::TextInput { .. } => {}
        }
    }

    /// Processes mouse button release events.
    ///
    /// # Behavior
    /// - Drawing: commits the session as one annotation, or discards it if
    ///   degenerate
    /// - Crop: queues a crop request for the transform service
    /// - Dragging: records a single move by the net delta (none if zero)
    pub fn on_mouse_release(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != MouseButton::Left {
            return;
        }
        if !matches!(
            self.state,
            DrawingState::Drawing(_) | DrawingState::Dragging { .. }
        ) {
            return;
        }

        let point = Point::new(x, y);
        self.on_mouse_motion_if_moved(point);

        match std::mem::take(&mut self.state) {
            DrawingState::Drawing(session) => self.finish_session(session),
            DrawingState::Dragging { id, dx, dy, .. } => {
                self.editor.request_redraw();
                if dx == 0.0 && dy == 0.0 {
                    return;
                }
                let Some(current) = self.editor.store().get(&id) else {
                    return;
                };
                let patch = AnnotationPatch::translation(current, dx, dy);
                self.editor.update(&id, patch);
            }
            other => self.state = other,
        }
    }

    /// Pointer leaving the canvas ends the gesture as a release would.
    pub fn on_pointer_leave(&mut self, x: f64, y: f64) {
        self.on_mouse_release(MouseButton::Left, x, y);
    }

    /// Applies the release position unless it repeats the last recorded one.
    fn on_mouse_motion_if_moved(&mut self, point: Point) {
        let moved = match &self.state {
            DrawingState::Drawing(session) => {
                session.end.map_or(point != session.start, |end| end != point)
            }
            DrawingState::Dragging { .. } => true,
            DrawingState::Idle | DrawingState::TextInput { .. } => false,
        };
        if moved {
            self.on_mouse_motion(point.x, point.y);
        }
    }

    fn finish_session(&mut self, session: DrawingSession) {
        self.editor.request_redraw();

        if session.tool == Tool::Crop {
            match session.drag_bounds() {
                Some(bounds) if bounds.width > 0.0 && bounds.height > 0.0 => {
                    self.set_pending_transform(TransformRequest::Crop(bounds));
                }
                _ => debug!("Empty crop region discarded"),
            }
            return;
        }

        let id = self.editor.next_id();
        let now = self.editor.tick();
        match session.build_annotation(id, self.editor.tool_settings(), now) {
            Some(annotation) => {
                self.editor.add(annotation);
            }
            None => debug!("Degenerate {} gesture discarded", session.tool.name()),
        }
    }
}
