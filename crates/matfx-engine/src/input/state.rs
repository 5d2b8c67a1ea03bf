use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonAction, InputEvent, Key, MouseButton};

/// Level input state for a single window.
///
/// Holds "is down" information and the cursor position.
/// Edges are written into an `InputFrame` as events are applied.
#[derive(Debug, Default)]
pub struct InputState {
    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    /// Cursor position in logical pixels. `(0, 0)` until the first sample.
    pub cursor_pos: (f64, f64),

    /// Previous cursor sample; `None` until the first cursor event.
    last_cursor: Option<(f64, f64)>,
}

impl InputState {
    /// Applies one raw event to the level state and writes edges to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, action } => match action {
                ButtonAction::Press => {
                    self.keys_down.insert(key);
                    frame.keys_pressed.insert(key);
                }
                ButtonAction::Release => {
                    self.keys_down.remove(&key);
                    frame.keys_released.insert(key);
                }
                ButtonAction::Repeat => {}
            },

            InputEvent::MouseButton { button, action } => match action {
                ButtonAction::Press => {
                    self.buttons_down.insert(button);
                    frame.buttons_pressed.insert(button);
                }
                ButtonAction::Release => {
                    self.buttons_down.remove(&button);
                    frame.buttons_released.insert(button);
                }
                ButtonAction::Repeat => {}
            },

            InputEvent::CursorMoved { x, y } => {
                // First sample seeds the baseline so it reports no movement.
                let (lx, ly) = self.last_cursor.unwrap_or((x, y));
                frame.cursor_delta = (x - lx, y - ly);
                self.last_cursor = Some((x, y));
                self.cursor_pos = (x, y);
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}
