//! GPU backend capability.
//!
//! `Renderer` talks to the GPU only through [`Gfx`]. The production backend is
//! [`crate::device::WgpuGfx`]; tests use a recording double.

/// Opaque vertex/index buffer handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Opaque shader handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderId(pub u32);

/// Opaque pipeline handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineId(pub u32);

/// Per-attribute vertex formats supported by the pipeline layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexFormat {
    Float2,
    Float3,
    Float4,
}

impl VertexFormat {
    /// Size of one attribute in bytes.
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
        }
    }
}

/// Interleaved vertex layout for buffer slot 0.
///
/// Attribute `i` is bound to shader location `i`.
#[derive(Debug, Copy, Clone)]
pub struct VertexLayout<'a> {
    pub attrs: &'a [VertexFormat],
}

impl VertexLayout<'_> {
    /// Byte offset of each attribute within one vertex.
    pub fn offsets(&self) -> Vec<u64> {
        self.attrs
            .iter()
            .scan(0u64, |offset, attr| {
                let at = *offset;
                *offset += attr.size();
                Some(at)
            })
            .collect()
    }

    /// Distance between consecutive vertices in bytes.
    pub fn stride(&self) -> u64 {
        self.attrs.iter().map(|a| a.size()).sum()
    }
}

/// Render target formats.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    /// Whatever color format the presentation surface was configured with.
    Swapchain,
    Rgba8,
    Bgra8,
    /// Depth-only target.
    Depth,
    DepthStencil,
}

impl PixelFormat {
    pub fn is_depth(self) -> bool {
        matches!(self, PixelFormat::Depth | PixelFormat::DepthStencil)
    }
}

/// Linear RGBA clear color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const OPAQUE_BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

#[derive(Debug, Copy, Clone)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub contents: &'a [u8],
}

/// Source text and entry point for one shader stage.
#[derive(Debug, Copy, Clone)]
pub struct ShaderStage<'a> {
    pub source: &'a str,
    pub entry: &'a str,
}

#[derive(Debug, Copy, Clone)]
pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub vertex: ShaderStage<'a>,
    pub fragment: ShaderStage<'a>,
}

/// Pipeline description. Topology is always a triangle list.
#[derive(Debug, Copy, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub shader: ShaderId,
    pub layout: VertexLayout<'a>,
    pub color_format: PixelFormat,
    pub depth_format: Option<PixelFormat>,
}

impl PipelineDesc<'_> {
    /// Checks that the color attachment is a color format and the depth
    /// attachment, if any, a depth format.
    pub fn check_formats(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.color_format.is_depth(),
            "{:?} is not a color format",
            self.color_format
        );
        if let Some(depth) = self.depth_format {
            anyhow::ensure!(depth.is_depth(), "{depth:?} is not a depth format");
        }
        Ok(())
    }
}

/// Parameters for one render pass against the swapchain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassDesc {
    pub clear_color: ClearColor,
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
    pub color_format: PixelFormat,
    pub depth_format: Option<PixelFormat>,
}

/// Resources bound for subsequent draws. Index = vertex buffer slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pub vertex_buffers: Vec<BufferId>,
}

/// Black-box GPU API.
///
/// Resource creation never fails loudly: a backend that cannot honor a request
/// returns a handle anyway and reports `is_valid() == false` afterwards.
/// Frame methods must follow `begin_pass → (apply_* | draw)* → end_pass → commit`;
/// implementations are not required to detect misuse.
pub trait Gfx {
    /// Global setup against the current graphics context.
    fn setup(&mut self) -> anyhow::Result<()>;

    /// Releases every resource and the device. Only valid after `setup`.
    fn shutdown(&mut self);

    fn is_valid(&self) -> bool;

    fn make_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId;

    fn make_shader(&mut self, desc: &ShaderDesc<'_>) -> ShaderId;

    fn make_pipeline(&mut self, desc: &PipelineDesc<'_>) -> PipelineId;

    fn begin_pass(&mut self, pass: &PassDesc);

    fn apply_pipeline(&mut self, pipeline: PipelineId);

    fn apply_bindings(&mut self, bindings: &Bindings);

    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32);

    fn end_pass(&mut self);

    /// Submits all work recorded since the last commit.
    fn commit(&mut self);
}
