use std::rc::Rc;

use super::runtime::WinitSystem;
use super::system::{WindowConfig, WindowSystem};
use crate::device::GraphicsContext;
use crate::error::{EngineError, EngineResult};
use crate::input::{ButtonAction, InputEvent, InputFrame, InputSink, InputState, Key, MouseButton};

/// Input sink owned by the window: level state, per-frame edges and the
/// built-in Escape-to-close policy.
#[derive(Debug, Default)]
struct WindowInput {
    state: InputState,
    frame: InputFrame,
    close_requested: bool,
}

impl InputSink for WindowInput {
    fn on_key(&mut self, key: Key, action: ButtonAction) {
        // Not configurable: Escape always closes.
        if key == Key::Escape && action == ButtonAction::Press {
            self.close_requested = true;
        }
        self.state
            .apply_event(&mut self.frame, InputEvent::Key { key, action });
    }

    fn on_mouse_button(&mut self, button: MouseButton, action: ButtonAction) {
        self.state
            .apply_event(&mut self.frame, InputEvent::MouseButton { button, action });
    }

    fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.state
            .apply_event(&mut self.frame, InputEvent::CursorMoved { x, y });
    }
}

/// Application window with frame-coherent input state.
///
/// Input queries are pure reads. Edge queries (`*_just_*`, `mouse_delta`)
/// describe only what the most recent `poll_events` delivered.
pub struct Window<S: WindowSystem = WinitSystem> {
    system: S,
    config: WindowConfig,
    open: bool,
    input: WindowInput,
}

impl Window<WinitSystem> {
    pub fn new(config: WindowConfig) -> Self {
        Self::with_system(config, WinitSystem::new())
    }

    /// Graphics context bound to the window; `None` before `init`.
    pub fn graphics_context(&self) -> Option<Rc<GraphicsContext>> {
        self.system.graphics_context()
    }
}

impl<S: WindowSystem> Window<S> {
    pub fn with_system(config: WindowConfig, system: S) -> Self {
        Self {
            system,
            config,
            open: false,
            input: WindowInput::default(),
        }
    }

    /// Starts the windowing system and opens the window.
    ///
    /// On `ContextCreation` the windowing system has already been torn down.
    pub fn init(&mut self) -> EngineResult<()> {
        if self.open {
            log::warn!("window already initialized; init ignored");
            return Ok(());
        }

        self.system.init().map_err(EngineError::WindowCreation)?;

        if let Err(e) = self.system.create_window(&self.config) {
            self.system.terminate();
            return Err(EngineError::ContextCreation(e));
        }

        self.open = true;
        log::info!(
            "window \"{}\" opened ({}x{} requested)",
            self.config.title,
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    /// Destroys the window (if open) and terminates the windowing system.
    /// Safe to call any number of times.
    pub fn shutdown(&mut self) {
        if self.open {
            self.system.destroy_window();
            self.open = false;
            log::info!("window \"{}\" closed", self.config.title);
        }
        self.system.terminate();
    }

    pub fn should_close(&self) -> bool {
        self.system.should_close()
    }

    /// Application-side close request.
    pub fn request_close(&mut self) {
        self.system.set_should_close(true);
    }

    pub fn swap_buffers(&mut self) {
        self.system.swap_buffers();
    }

    /// Starts a new input frame: drops last frame's edges and mouse delta,
    /// then delivers pending OS events.
    pub fn poll_events(&mut self) {
        self.input.frame.clear();
        self.system.poll_events(&mut self.input);

        if std::mem::take(&mut self.input.close_requested) {
            log::debug!("escape pressed; requesting close");
            self.system.set_should_close(true);
        }
    }

    /// Drawable size in physical pixels, queried live.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.system.framebuffer_size()
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Size the window was created with, in logical pixels.
    pub fn requested_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.input.state.key_down(key)
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.input.frame.keys_pressed.contains(&key)
    }

    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.input.frame.keys_released.contains(&key)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.input.state.button_down(button)
    }

    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.input.frame.buttons_pressed.contains(&button)
    }

    pub fn is_mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.input.frame.buttons_released.contains(&button)
    }

    /// Cursor position in logical window coordinates.
    pub fn mouse_position(&self) -> (f64, f64) {
        self.input.state.cursor_pos
    }

    pub fn mouse_delta(&self) -> (f64, f64) {
        self.input.frame.cursor_delta
    }
}

impl<S: WindowSystem> Drop for Window<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
