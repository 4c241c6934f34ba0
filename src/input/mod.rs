//! Input handling and the interaction state machine.
//!
//! This module translates backend keyboard and mouse events into scene
//! mutations and settings changes. It maintains the pointer gesture state
//! (idle vs. dragging with captured grab offset), the hover feedback, and
//! the keyboard collaborator layer.

pub mod events;
pub mod modifiers;
pub mod settings;
pub mod state;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use settings::EditorSettings;
pub use state::{InputState, PointerState};

// Re-export for public API (unused internally but part of public interface)
#[allow(unused_imports)]
pub use modifiers::Modifiers;
