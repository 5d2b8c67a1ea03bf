//! MatFX engine crate.
//!
//! Window and input handling, the wgpu-backed GPU device, the triangle
//! renderer and the frame loop that ties them together.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod window;

mod error;

#[cfg(test)]
mod testing;

pub use error::{EngineError, EngineResult};
