//! Rendering: the `Gfx` capability and the triangle renderer built on it.
//!
//! The renderer speaks only `Gfx`; `device::WgpuGfx` is the production
//! backend.

mod gfx;
mod renderer;
mod triangle;

pub use gfx::{
    Bindings, BufferDesc, BufferId, ClearColor, Gfx, PassDesc, PipelineDesc, PipelineId,
    PixelFormat, ShaderDesc, ShaderId, ShaderStage, VertexFormat, VertexLayout,
};
pub use renderer::{Renderer, RendererState};
