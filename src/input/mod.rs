//! Input handling and tool state machine.
//!
//! This module translates host keyboard and mouse events into editor
//! operations. It tracks the active tool, the in-progress gesture (drawing,
//! dragging or text entry) and modifier keys, and commits finished gestures
//! to the [`Editor`](crate::editor::Editor).

pub mod events;
pub mod modifiers;
pub mod session;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use session::DrawingSession;
pub use state::{DrawingState, InputState, ResizeHandle, ResizeOutcome};
pub use tool::Tool;
