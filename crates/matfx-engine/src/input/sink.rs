use super::types::{ButtonAction, InputEvent, Key, MouseButton};

/// Receiver for raw input events.
///
/// A window system invokes the sink synchronously from inside its event pump,
/// on the caller's thread. Every mutation a sink performs is therefore visible
/// to queries made after `poll_events` returns.
pub trait InputSink {
    fn on_key(&mut self, key: Key, action: ButtonAction);

    fn on_mouse_button(&mut self, button: MouseButton, action: ButtonAction);

    fn on_cursor_moved(&mut self, x: f64, y: f64);

    /// Routes an `InputEvent` to the matching callback.
    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, action } => self.on_key(key, action),
            InputEvent::MouseButton { button, action } => self.on_mouse_button(button, action),
            InputEvent::CursorMoved { x, y } => self.on_cursor_moved(x, y),
        }
    }
}
