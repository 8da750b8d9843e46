//! Tool state machine and input state management.

use crate::config::{Action, KeyBinding};
use crate::draw::{Annotation, AnnotationId, AnnotationKind, Bounds, Point, Style, render};
use crate::editor::Editor;
use crate::input::{modifiers::Modifiers, session::DrawingSession, tool::Tool};
use crate::raster::TransformRequest;
use log::debug;
use std::collections::HashMap;

/// Id given to the uncommitted preview annotation.
pub(super) const PREVIEW_ID: &str = "preview";

/// Current gesture state machine.
///
/// Tracks whether the user is idle, drawing, dragging a selection or
/// entering text. State transitions occur on mouse and keyboard events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    /// Not actively drawing - waiting for user input
    #[default]
    Idle,
    /// Pointer held down with a drawing tool
    Drawing(DrawingSession),
    /// Dragging the selected annotation; the delta is applied on release
    Dragging {
        id: AnnotationId,
        /// Pointer position at press
        origin: Point,
        /// Net movement so far
        dx: f64,
        dy: f64,
    },
    /// Inline text entry
    TextInput {
        /// Top-left corner of the text block
        anchor: Point,
        /// Accumulated text buffer
        buffer: String,
    },
}

/// Edge or corner grabbed on a selection's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    /// Clockwise from the top-left corner.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    /// Centre of this handle on `bounds`.
    pub fn position(self, bounds: &Bounds) -> Point {
        let (left, top) = (bounds.x, bounds.y);
        let (right, bottom) = (bounds.x + bounds.width, bounds.y + bounds.height);
        let (mid_x, mid_y) = (left + bounds.width / 2.0, top + bounds.height / 2.0);
        match self {
            ResizeHandle::TopLeft => Point::new(left, top),
            ResizeHandle::Top => Point::new(mid_x, top),
            ResizeHandle::TopRight => Point::new(right, top),
            ResizeHandle::Right => Point::new(right, mid_y),
            ResizeHandle::BottomRight => Point::new(right, bottom),
            ResizeHandle::Bottom => Point::new(mid_x, bottom),
            ResizeHandle::BottomLeft => Point::new(left, bottom),
            ResizeHandle::Left => Point::new(left, mid_y),
        }
    }
}

/// Result of [`InputState::resize_selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Handle-based resizing is not available; nothing changed.
    Unsupported,
}

/// Input state wrapping the editor.
///
/// Holds the active tool, the in-progress gesture and modifier keys. Finished
/// gestures are committed through the editor's recording mutators so each
/// one becomes exactly one undoable action.
pub struct InputState {
    /// The editing session gestures are committed to
    pub editor: Editor,
    /// Tool used for the next pointer press
    pub active_tool: Tool,
    /// Current gesture state machine
    pub state: DrawingState,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Keybinding action map for efficient lookup
    action_map: HashMap<KeyBinding, Action>,
    /// Set when the user asked for an export; taken by the host
    pending_export: bool,
    /// Transform gesture waiting for the host's transform service
    pending_transform: Option<TransformRequest>,
}

impl InputState {
    /// Creates an input state around `editor` using the given keybindings.
    pub fn new(editor: Editor, action_map: HashMap<KeyBinding, Action>) -> Self {
        Self {
            editor,
            active_tool: Tool::default(),
            state: DrawingState::Idle,
            modifiers: Modifiers::new(),
            action_map,
            pending_export: false,
            pending_transform: None,
        }
    }

    /// Switches tools. An open text entry is resolved first (blur semantics)
    /// and any other gesture is cancelled.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.active_tool {
            return;
        }
        self.resolve_text_entry();
        self.cancel_gesture();
        debug!("Tool {} -> {}", self.active_tool.name(), tool.name());
        self.active_tool = tool;
        self.editor.request_redraw();
    }

    /// Abandons the current gesture without committing anything.
    pub fn cancel_gesture(&mut self) {
        if !matches!(self.state, DrawingState::Idle) {
            debug!("Gesture cancelled");
            self.state = DrawingState::Idle;
            self.editor.request_redraw();
        }
    }

    /// Clears the editor, the gesture and pending requests.
    pub fn reset(&mut self) {
        self.state = DrawingState::Idle;
        self.pending_export = false;
        self.pending_transform = None;
        self.modifiers.clear();
        self.editor.reset();
    }

    /// Commits the open text entry if its trimmed text is non-empty, otherwise
    /// dismisses it. Returns whether an annotation was added.
    pub fn resolve_text_entry(&mut self) -> bool {
        let DrawingState::TextInput { anchor, buffer } = &self.state else {
            return false;
        };
        let anchor = *anchor;
        let text = buffer.trim().to_string();
        self.state = DrawingState::Idle;
        self.editor.request_redraw();

        if text.is_empty() {
            debug!("Empty text entry dismissed");
            return false;
        }
        let id = self.editor.next_id();
        let now = self.editor.tick();
        let annotation = self.text_annotation(id, now, anchor, text);
        self.editor.add(annotation)
    }

    /// Text block at `anchor` sized to its laid-out extent.
    pub(super) fn text_annotation(
        &self,
        id: AnnotationId,
        now: u64,
        anchor: Point,
        text: String,
    ) -> Annotation {
        let settings = self.editor.tool_settings();
        let font = settings.font();
        let font_size = settings.font_size;
        let (width, height) = render::measure_text(&text, font_size, &font);
        let style = Style {
            color: settings.color,
            stroke_width: 0.0,
            opacity: settings.opacity,
            fill_color: None,
        };
        let kind = AnnotationKind::Text {
            text,
            font_size,
            font_family: font.family,
            font_weight: font.weight,
        };
        Annotation::new(
            id,
            kind,
            Bounds::new(anchor.x, anchor.y, width, height),
            style,
            now,
        )
    }

    /// Handle-based resizing of the selection. Always unsupported; never
    /// mutates the store.
    pub fn resize_selection(&mut self, handle: ResizeHandle, dx: f64, dy: f64) -> ResizeOutcome {
        debug!("Resize via {handle:?} by ({dx}, {dy}) is not supported");
        ResizeOutcome::Unsupported
    }

    /// Looks up the action bound to `key_str` under the current modifiers.
    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        for (binding, action) in &self.action_map {
            if binding.matches(
                key_str,
                self.modifiers.ctrl,
                self.modifiers.shift,
                self.modifiers.alt,
            ) {
                return Some(*action);
            }
        }
        None
    }

    /// Takes and clears a pending export request.
    pub fn take_pending_export(&mut self) -> bool {
        std::mem::take(&mut self.pending_export)
    }

    pub(super) fn set_pending_export(&mut self) {
        self.pending_export = true;
    }

    /// Takes and clears a pending transform request.
    pub fn take_pending_transform(&mut self) -> Option<TransformRequest> {
        self.pending_transform.take()
    }

    pub(super) fn set_pending_transform(&mut self, request: TransformRequest) {
        debug!("Transform {:?} pending for host", request);
        self.pending_transform = Some(request);
    }
}
