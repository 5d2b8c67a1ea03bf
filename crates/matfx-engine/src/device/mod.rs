//! wgpu-backed GPU device and graphics context.
//!
//! This module is responsible for:
//! - the per-window graphics context (instance + surface + pending frame)
//! - creating the adapter/device/queue and configuring the surface
//! - implementing the renderer's `Gfx` capability on top of wgpu

mod context;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use context::GraphicsContext;
pub use error::SurfaceErrorAction;
pub use gpu::WgpuGfx;
pub use init::{ContextRequest, GlProfile, GpuInit};
