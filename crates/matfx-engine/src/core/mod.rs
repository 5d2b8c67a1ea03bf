//! Application frame loop.
//!
//! Drives an initialized `Window` and `Renderer` through the per-frame
//! protocol until the window asks to close.

mod frame_loop;

pub use frame_loop::{FrameStats, run};
