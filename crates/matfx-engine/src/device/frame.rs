use crate::render::{Bindings, PipelineId};

/// Command recorded between `begin_pass` and `end_pass`.
///
/// wgpu render passes borrow their encoder and resources, so commands are
/// collected first and replayed into a real pass when it ends.
#[derive(Debug, Clone)]
pub(crate) enum PassCommand {
    Pipeline(PipelineId),
    Bindings(Bindings),
    Draw {
        base_element: u32,
        num_elements: u32,
        num_instances: u32,
    },
}

/// A swapchain frame with an open render pass.
pub(crate) struct OpenPass {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub clear: wgpu::Color,
    /// Whether the depth target is attached.
    pub depth: bool,
    pub commands: Vec<PassCommand>,
}

/// A frame whose pass was encoded and now waits for `commit`.
pub(crate) struct EncodedFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub encoder: wgpu::CommandEncoder,
}

/// Pass state of the backend.
#[derive(Default)]
pub(crate) enum PassSlot {
    #[default]
    Closed,
    /// Pass opened but the frame could not be acquired; commands are dropped.
    Skipped,
    Open(OpenPass),
}
