//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Window systems translate platform events into `InputEvent`s and deliver
//! them through an `InputSink`.

mod frame;
pub(crate) mod platform;
mod sink;
mod state;
mod types;

pub use frame::InputFrame;
pub use sink::InputSink;
pub use state::InputState;
pub use types::{ButtonAction, InputEvent, Key, MouseButton};
