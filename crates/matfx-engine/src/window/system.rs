use crate::device::ContextRequest;
use crate::input::InputSink;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Requested inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    pub context: ContextRequest,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "MatFX".to_string(),
            width: 800,
            height: 600,
            context: ContextRequest::default(),
        }
    }
}

/// OS window/context provider.
///
/// Owns at most one window. `Window` drives it and maps its errors onto the
/// engine's error taxonomy.
pub trait WindowSystem {
    /// Brings up the windowing system.
    fn init(&mut self) -> anyhow::Result<()>;

    /// Creates the window and binds its graphics context.
    fn create_window(&mut self, config: &WindowConfig) -> anyhow::Result<()>;

    /// Destroys the window if one exists.
    fn destroy_window(&mut self);

    /// Tears the windowing system down. Must tolerate repeated calls.
    fn terminate(&mut self);

    fn should_close(&self) -> bool;

    fn set_should_close(&mut self, value: bool);

    fn swap_buffers(&mut self);

    /// Delivers pending events, invoking `sink` synchronously for input.
    fn poll_events(&mut self, sink: &mut dyn InputSink);

    /// Live drawable size in physical pixels; `(0, 0)` without a window.
    fn framebuffer_size(&self) -> (u32, u32);
}
