//! Keybinding configuration types and parsing.
//!
//! This module defines the configurable keybinding system that allows users
//! to customize keyboard shortcuts for all editor actions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // History
    Undo,
    Redo,

    // Selection
    DeleteSelection,

    // Tool selection
    SelectTool,
    PenTool,
    HighlighterTool,
    ArrowTool,
    CircleTool,
    RectangleTool,
    TextTool,
    MosaicTool,

    // Text entry
    CommitText,

    // Cancel the active gesture or text entry
    Cancel,

    // Export the flattened image
    Export,
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+Z" or "Escape".
    /// Modifiers can appear in any order and spaces around '+' are allowed.
    /// The key part is stored lowercased so lookups and duplicate detection
    /// are case-insensitive.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        // Normalize by removing spaces around '+'
        let s_normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in s_normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into empty trailing parts; the key is '+'
        let key = key_parts.join("+");
        let key = if key.is_empty() {
            "+".to_string()
        } else {
            key.to_lowercase()
        };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings. Users specify them in config.toml as:
/// ```toml
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// redo = ["Ctrl+Shift+Z", "Ctrl+Y"]
/// pen_tool = ["P"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_redo")]
    pub redo: Vec<String>,

    #[serde(default = "default_delete_selection")]
    pub delete_selection: Vec<String>,

    #[serde(default = "default_select_tool")]
    pub select_tool: Vec<String>,

    #[serde(default = "default_pen_tool")]
    pub pen_tool: Vec<String>,

    #[serde(default = "default_highlighter_tool")]
    pub highlighter_tool: Vec<String>,

    #[serde(default = "default_arrow_tool")]
    pub arrow_tool: Vec<String>,

    #[serde(default = "default_circle_tool")]
    pub circle_tool: Vec<String>,

    #[serde(default = "default_rectangle_tool")]
    pub rectangle_tool: Vec<String>,

    #[serde(default = "default_text_tool")]
    pub text_tool: Vec<String>,

    #[serde(default = "default_mosaic_tool")]
    pub mosaic_tool: Vec<String>,

    #[serde(default = "default_commit_text")]
    pub commit_text: Vec<String>,

    #[serde(default = "default_cancel")]
    pub cancel: Vec<String>,

    #[serde(default = "default_export")]
    pub export: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            undo: default_undo(),
            redo: default_redo(),
            delete_selection: default_delete_selection(),
            select_tool: default_select_tool(),
            pen_tool: default_pen_tool(),
            highlighter_tool: default_highlighter_tool(),
            arrow_tool: default_arrow_tool(),
            circle_tool: default_circle_tool(),
            rectangle_tool: default_rectangle_tool(),
            text_tool: default_text_tool(),
            mosaic_tool: default_mosaic_tool(),
            commit_text: default_commit_text(),
            cancel: default_cancel(),
            export: default_export(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions for efficient matching.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups: [(&[String], Action); 14] = [
            (&self.undo, Action::Undo),
            (&self.redo, Action::Redo),
            (&self.delete_selection, Action::DeleteSelection),
            (&self.select_tool, Action::SelectTool),
            (&self.pen_tool, Action::PenTool),
            (&self.highlighter_tool, Action::HighlighterTool),
            (&self.arrow_tool, Action::ArrowTool),
            (&self.circle_tool, Action::CircleTool),
            (&self.rectangle_tool, Action::RectangleTool),
            (&self.text_tool, Action::TextTool),
            (&self.mosaic_tool, Action::MosaicTool),
            (&self.commit_text, Action::CommitText),
            (&self.cancel, Action::Cancel),
            (&self.export, Action::Export),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn default_undo() -> Vec<String> {
    vec!["Ctrl+Z".to_string()]
}

fn default_redo() -> Vec<String> {
    vec!["Ctrl+Shift+Z".to_string(), "Ctrl+Y".to_string()]
}

fn default_delete_selection() -> Vec<String> {
    vec!["Delete".to_string(), "Backspace".to_string()]
}

fn default_select_tool() -> Vec<String> {
    vec!["V".to_string()]
}

fn default_pen_tool() -> Vec<String> {
    vec!["P".to_string()]
}

fn default_highlighter_tool() -> Vec<String> {
    vec!["H".to_string()]
}

fn default_arrow_tool() -> Vec<String> {
    vec!["A".to_string()]
}

fn default_circle_tool() -> Vec<String> {
    vec!["O".to_string()]
}

fn default_rectangle_tool() -> Vec<String> {
    vec!["R".to_string()]
}

fn default_text_tool() -> Vec<String> {
    vec!["T".to_string()]
}

fn default_mosaic_tool() -> Vec<String> {
    vec!["M".to_string()]
}

fn default_commit_text() -> Vec<String> {
    vec!["Ctrl+Return".to_string()]
}

fn default_cancel() -> Vec<String> {
    vec!["Escape".to_string()]
}

fn default_export() -> Vec<String> {
    vec!["Ctrl+S".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert_eq!(binding.key, "escape");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_ctrl_shift_key() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(binding.key, "z");
        assert!(binding.ctrl);
        assert!(binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_with_spaces() {
        let binding = KeyBinding::parse("Ctrl + Shift + W").unwrap();
        assert_eq!(binding.key, "w");
        assert!(binding.ctrl);
        assert!(binding.shift);
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(binding.key, "+");
        assert!(binding.ctrl);
    }

    #[test]
    fn test_parse_rejects_modifier_only() {
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
        assert!(KeyBinding::parse("   ").is_err());
    }

    #[test]
    fn test_matches() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert!(binding.matches("Z", true, true, false));
        assert!(binding.matches("z", true, true, false));
        assert!(!binding.matches("Z", false, true, false));
        assert!(!binding.matches("Z", true, false, false));
        assert!(!binding.matches("Y", true, true, false));
    }

    #[test]
    fn test_build_action_map() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let ctrl_z = KeyBinding::parse("Ctrl+Z").unwrap();
        assert_eq!(map.get(&ctrl_z), Some(&Action::Undo));

        let ctrl_y = KeyBinding::parse("Ctrl+Y").unwrap();
        assert_eq!(map.get(&ctrl_y), Some(&Action::Redo));

        let delete = KeyBinding::parse("Delete").unwrap();
        assert_eq!(map.get(&delete), Some(&Action::DeleteSelection));

        let m = KeyBinding::parse("m").unwrap();
        assert_eq!(map.get(&m), Some(&Action::MosaicTool));
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let config = KeybindingsConfig {
            redo: vec!["Ctrl+Z".to_string()],
            ..KeybindingsConfig::default()
        };

        let err_msg = config.build_action_map().unwrap_err();
        assert!(err_msg.contains("Duplicate keybinding"));
        assert!(err_msg.contains("Ctrl+Z"));
    }

    #[test]
    fn test_duplicate_with_different_modifier_order_and_case() {
        let config = KeybindingsConfig {
            undo: vec!["Ctrl+Shift+w".to_string()],
            export: vec!["Shift+Ctrl+W".to_string()],
            ..KeybindingsConfig::default()
        };

        assert!(config.build_action_map().is_err());
    }
}
