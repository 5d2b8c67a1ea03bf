//! Application window, its input state, and the OS window system behind it.
//!
//! `WinitSystem` owns the winit EventLoop and window and is pumped once per
//! frame from `Window::poll_events`.

mod app_window;
mod runtime;
mod system;

pub use app_window::Window;
pub use runtime::WinitSystem;
pub use system::{WindowConfig, WindowSystem};
