use crate::config::Action;
use crate::input::{events::Key, tool::Tool};
use log::debug;

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a key press event.
    ///
    /// Handles:
    /// - Modifier key tracking
    /// - Text entry (plain keys go to the buffer; only text commit and cancel
    ///   bindings apply while typing)
    /// - History, selection, tool and export actions (configurable keybindings)
    pub fn on_key_press(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                return;
            }
            Key::Alt => {
                self.modifiers.alt = true;
                return;
            }
            _ => {}
        }

        if matches!(self.state, DrawingState::TextInput { .. }) {
            self.on_text_key(key);
            return;
        }

        let Some(key_str) = key.binding_name() else {
            return;
        };
        if let Some(action) = self.find_action(&key_str) {
            self.handle_action(action);
        }
    }

    fn on_text_key(&mut self, key: Key) {
        // Plain letters are text; bindings are only checked for special keys
        // or when a command modifier is held.
        let check_actions = match key {
            Key::Escape | Key::Return => true,
            _ => self.modifiers.command_held(),
        };
        if check_actions
            && let Some(key_str) = key.binding_name()
            && let Some(action @ (Action::CommitText | Action::Cancel)) =
                self.find_action(&key_str)
        {
            self.handle_action(action);
            return;
        }

        let DrawingState::TextInput { buffer, .. } = &mut self.state else {
            return;
        };
        match key {
            Key::Char(c) if !self.modifiers.command_held() => buffer.push(c),
            Key::Space => buffer.push(' '),
            Key::Return => buffer.push('\n'),
            Key::Backspace => {
                buffer.pop();
            }
            _ => return,
        }
        self.editor.request_redraw();
    }

    /// Handle an action triggered by a keybinding.
    pub(super) fn handle_action(&mut self, action: Action) {
        debug!("Action {:?}", action);
        match action {
            Action::Undo => {
                self.cancel_gesture();
                self.editor.undo();
            }
            Action::Redo => {
                self.cancel_gesture();
                self.editor.redo();
            }
            Action::DeleteSelection => {
                if let Some(id) = self.editor.selected().cloned() {
                    self.cancel_gesture();
                    self.editor.delete(&id);
                }
            }
            Action::SelectTool => self.set_tool(Tool::Select),
            Action::PenTool => self.set_tool(Tool::Pen),
            Action::HighlighterTool => self.set_tool(Tool::Highlighter),
            Action::ArrowTool => self.set_tool(Tool::Arrow),
            Action::CircleTool => self.set_tool(Tool::Circle),
            Action::RectangleTool => self.set_tool(Tool::Rectangle),
            Action::TextTool => self.set_tool(Tool::Text),
            Action::MosaicTool => self.set_tool(Tool::Mosaic),
            Action::CommitText => {
                self.resolve_text_entry();
            }
            Action::Cancel => match self.state {
                DrawingState::Idle => self.editor.select(None),
                _ => self.cancel_gesture(),
            },
            Action::Export => {
                self.resolve_text_entry();
                self.set_pending_export();
                // The host's save flow can swallow key releases.
                self.modifiers.clear();
            }
        }
    }

    /// Processes a key release event. Only modifier state is tracked.
    pub fn on_key_release(&mut self, key: Key) {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Ctrl => self.modifiers.ctrl = false,
            Key::Alt => self.modifiers.alt = false,
            _ => {}
        }
    }
}
