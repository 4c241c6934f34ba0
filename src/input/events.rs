//! Generic input event types for cross-backend compatibility.

/// Generic key representation for cross-backend compatibility.
///
/// Backend implementations map their native key codes to these generic
/// key values for unified input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key
    Escape,
    /// Tab key (cycles canvas size presets)
    Tab,
    /// Shift modifier
    Shift,
    /// Ctrl modifier
    Ctrl,
    /// Plus key (also Equals, for layouts where + is shifted)
    Plus,
    /// Minus key (also Underscore)
    Minus,
    /// F10 function key (toggle help)
    F10,
    /// Unmapped or unrecognized key
    Unknown,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (place / drag / select)
    Left,
    /// Right mouse button (delete)
    Right,
    /// Middle mouse button (currently unused)
    Middle,
}
