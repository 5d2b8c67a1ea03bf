use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Per-frame input edges.
///
/// `InputState` holds level state (held keys/buttons, cursor position).
/// `InputFrame` holds what changed during the most recent `poll_events`.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Mouse buttons pressed this frame.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Mouse buttons released this frame.
    pub buttons_released: HashSet<MouseButton>,

    /// Cursor movement this frame, in logical pixels.
    pub cursor_delta: (f64, f64),
}

impl InputFrame {
    /// Resets every edge set and the cursor delta.
    ///
    /// Must run before the next batch of events is delivered.
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.cursor_delta = (0.0, 0.0);
    }
}
