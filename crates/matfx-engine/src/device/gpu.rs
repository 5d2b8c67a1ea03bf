use std::rc::Rc;

use anyhow::Context;
use wgpu::util::DeviceExt;

use super::frame::{EncodedFrame, OpenPass, PassCommand, PassSlot};
use super::{surface, GpuInit, GraphicsContext, SurfaceErrorAction};
use crate::render::{
    Bindings, BufferDesc, BufferId, Gfx, PassDesc, PipelineDesc, PipelineId, PixelFormat,
    ShaderDesc, ShaderId, VertexFormat,
};

/// Handle value returned when a resource could not be created.
const INVALID_HANDLE: u32 = u32::MAX;

/// wgpu implementation of [`Gfx`].
///
/// Owns the adapter/device/queue created in `setup` and every resource made
/// through it. The surface belongs to the shared [`GraphicsContext`]; finished
/// frames are handed back to it for presentation in `commit`.
pub struct WgpuGfx {
    context: Rc<GraphicsContext>,
    init: GpuInit,
    state: Option<DeviceState>,
    valid: bool,
}

struct DeviceState {
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration; width/height track the last pass size.
    config: wgpu::SurfaceConfiguration,

    buffers: Vec<wgpu::Buffer>,
    shaders: Vec<ShaderModules>,
    pipelines: Vec<wgpu::RenderPipeline>,

    depth: Option<DepthTarget>,
    pass: PassSlot,
    encoded: Option<EncodedFrame>,
}

struct ShaderModules {
    vertex: wgpu::ShaderModule,
    vertex_entry: String,
    fragment: wgpu::ShaderModule,
    fragment_entry: String,
}

struct DepthTarget {
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    view: wgpu::TextureView,
}

impl WgpuGfx {
    pub fn new(context: Rc<GraphicsContext>, init: GpuInit) -> Self {
        Self {
            context,
            init,
            state: None,
            valid: false,
        }
    }

    fn invalidate(&mut self, what: &str) {
        log::error!("GPU backend invalid: {what}");
        self.valid = false;
    }
}

impl DeviceState {
    /// Adapter/device acquisition is asynchronous under wgpu.
    async fn new(context: &GraphicsContext, init: &GpuInit) -> anyhow::Result<Self> {
        let (width, height) = context.framebuffer_size();

        let adapter = context
            .instance()
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(context.surface()),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!(
            "using adapter {} ({:?}, driver {} {})",
            info.name,
            info.backend,
            info.driver,
            info.driver_info
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("matfx device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone().using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = context.surface().get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        context.surface().configure(&device, &config);
        log::debug!("surface configured: {format:?} {}x{}", config.width, config.height);

        Ok(Self {
            device,
            queue,
            config,
            buffers: Vec::new(),
            shaders: Vec::new(),
            pipelines: Vec::new(),
            depth: None,
            pass: PassSlot::Closed,
            encoded: None,
        })
    }

    fn color_format(&self, format: PixelFormat) -> Option<wgpu::TextureFormat> {
        match format {
            PixelFormat::Swapchain => Some(self.config.format),
            PixelFormat::Rgba8 => Some(wgpu::TextureFormat::Rgba8Unorm),
            PixelFormat::Bgra8 => Some(wgpu::TextureFormat::Bgra8Unorm),
            PixelFormat::Depth | PixelFormat::DepthStencil => None,
        }
    }

    fn ensure_depth(&mut self, format: wgpu::TextureFormat) {
        let (width, height) = (self.config.width, self.config.height);
        if let Some(d) = &self.depth {
            if d.format == format && d.width == width && d.height == height {
                return;
            }
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("matfx depth target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.depth = Some(DepthTarget {
            format,
            width,
            height,
            view,
        });
    }

    /// Encodes the recorded commands into a real render pass.
    fn encode(&self, pass: OpenPass) -> EncodedFrame {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("matfx frame encoder"),
            });

        {
            let depth_attachment = self.depth.as_ref().filter(|_| pass.depth).map(|d| {
                wgpu::RenderPassDepthStencilAttachment {
                    view: &d.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: d.format.has_stencil_aspect().then_some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Discard,
                    }),
                }
            });

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("matfx main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &pass.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(pass.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: depth_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for cmd in &pass.commands {
                match cmd {
                    PassCommand::Pipeline(id) => match self.pipelines.get(id.0 as usize) {
                        Some(p) => rpass.set_pipeline(p),
                        None => log::error!("apply_pipeline: unknown pipeline {id:?}"),
                    },
                    PassCommand::Bindings(bindings) => {
                        for (slot, id) in bindings.vertex_buffers.iter().enumerate() {
                            match self.buffers.get(id.0 as usize) {
                                Some(b) => rpass.set_vertex_buffer(slot as u32, b.slice(..)),
                                None => log::error!("apply_bindings: unknown buffer {id:?}"),
                            }
                        }
                    }
                    PassCommand::Draw {
                        base_element,
                        num_elements,
                        num_instances,
                    } => rpass.draw(
                        *base_element..base_element + num_elements,
                        0..*num_instances,
                    ),
                }
            }
        }

        EncodedFrame {
            surface_texture: pass.surface_texture,
            encoder,
        }
    }
}

impl Gfx for WgpuGfx {
    fn setup(&mut self) -> anyhow::Result<()> {
        anyhow::ensure!(self.state.is_none(), "GPU backend is already set up");

        let state = pollster::block_on(DeviceState::new(&self.context, &self.init))?;
        self.state = Some(state);
        self.valid = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.state.take().is_some() {
            self.context.discard_pending();
            log::debug!("GPU device released");
        }
        self.valid = false;
    }

    fn is_valid(&self) -> bool {
        self.valid && self.state.is_some()
    }

    fn make_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        let Some(state) = self.state.as_mut() else {
            self.invalidate("make_buffer before setup");
            return BufferId(INVALID_HANDLE);
        };

        let buffer = state
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: desc.contents,
                usage: wgpu::BufferUsages::VERTEX,
            });

        state.buffers.push(buffer);
        BufferId(state.buffers.len() as u32 - 1)
    }

    fn make_shader(&mut self, desc: &ShaderDesc<'_>) -> ShaderId {
        let Some(state) = self.state.as_mut() else {
            self.invalidate("make_shader before setup");
            return ShaderId(INVALID_HANDLE);
        };

        let module = |stage: &str, source: &str| {
            state
                .device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&format!("{} ({stage})", desc.label)),
                    source: wgpu::ShaderSource::Wgsl(source.into()),
                })
        };

        let modules = ShaderModules {
            vertex: module("vertex", desc.vertex.source),
            vertex_entry: desc.vertex.entry.to_owned(),
            fragment: module("fragment", desc.fragment.source),
            fragment_entry: desc.fragment.entry.to_owned(),
        };

        state.shaders.push(modules);
        ShaderId(state.shaders.len() as u32 - 1)
    }

    fn make_pipeline(&mut self, desc: &PipelineDesc<'_>) -> PipelineId {
        let Some(state) = self.state.as_mut() else {
            self.invalidate("make_pipeline before setup");
            return PipelineId(INVALID_HANDLE);
        };

        let Some(shader) = state.shaders.get(desc.shader.0 as usize) else {
            self.invalidate(&format!("make_pipeline: unknown shader {:?}", desc.shader));
            return PipelineId(INVALID_HANDLE);
        };

        if let Err(e) = desc.check_formats() {
            self.invalidate(&format!("make_pipeline {}: {e}", desc.label));
            return PipelineId(INVALID_HANDLE);
        }

        let Some(color_format) = state.color_format(desc.color_format) else {
            self.invalidate(&format!("{:?} is not a color format", desc.color_format));
            return PipelineId(INVALID_HANDLE);
        };

        let depth_stencil = desc.depth_format.map(|f| wgpu::DepthStencilState {
            format: depth_format(f, &self.init),
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let attributes: Vec<wgpu::VertexAttribute> = desc
            .layout
            .attrs
            .iter()
            .zip(desc.layout.offsets())
            .enumerate()
            .map(|(location, (attr, offset))| wgpu::VertexAttribute {
                format: vertex_format(*attr),
                offset,
                shader_location: location as u32,
            })
            .collect();

        let buffers = [wgpu::VertexBufferLayout {
            array_stride: desc.layout.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let pipeline = state
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: None,

                vertex: wgpu::VertexState {
                    module: &shader.vertex,
                    entry_point: Some(shader.vertex_entry.as_str()),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader.fragment,
                    entry_point: Some(shader.fragment_entry.as_str()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        state.pipelines.push(pipeline);
        PipelineId(state.pipelines.len() as u32 - 1)
    }

    fn begin_pass(&mut self, pass: &PassDesc) {
        let Some(state) = self.state.as_mut() else {
            log::error!("begin_pass before setup");
            return;
        };

        if !matches!(state.pass, PassSlot::Closed) {
            log::error!("begin_pass while another pass is open; ignored");
            return;
        }

        if pass.sample_count != 1 {
            log::warn!("sample count {} unsupported; rendering single-sampled", pass.sample_count);
        }

        let surface = self.context.surface();
        if !surface::ensure_size(surface, &state.device, &mut state.config, pass.width, pass.height)
        {
            log::debug!("zero-sized drawable; skipping frame");
            state.pass = PassSlot::Skipped;
            return;
        }

        let surface_texture = match surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                let reason = err.to_string();
                let action = surface::map_surface_error(surface, &state.device, &state.config, err);
                state.pass = PassSlot::Skipped;
                if action == SurfaceErrorAction::Fatal {
                    self.invalidate(&format!("surface texture acquisition failed: {reason}"));
                } else {
                    log::warn!("surface texture unavailable ({reason}); {action:?}");
                }
                return;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(f) = pass.depth_format {
            state.ensure_depth(depth_format(f, &self.init));
        }

        state.pass = PassSlot::Open(OpenPass {
            surface_texture,
            view,
            clear: surface::to_wgpu_color(pass.clear_color),
            depth: pass.depth_format.is_some(),
            commands: Vec::new(),
        });
    }

    fn apply_pipeline(&mut self, pipeline: PipelineId) {
        record(&mut self.state, "apply_pipeline", PassCommand::Pipeline(pipeline));
    }

    fn apply_bindings(&mut self, bindings: &Bindings) {
        record(&mut self.state, "apply_bindings", PassCommand::Bindings(bindings.clone()));
    }

    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        record(
            &mut self.state,
            "draw",
            PassCommand::Draw {
                base_element,
                num_elements,
                num_instances,
            },
        );
    }

    fn end_pass(&mut self) {
        let Some(state) = self.state.as_mut() else {
            log::error!("end_pass before setup");
            return;
        };

        match std::mem::take(&mut state.pass) {
            PassSlot::Open(pass) => {
                let frame = state.encode(pass);
                state.encoded = Some(frame);
            }
            PassSlot::Skipped => {}
            PassSlot::Closed => log::error!("end_pass without an open pass"),
        }
    }

    fn commit(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if !matches!(state.pass, PassSlot::Closed) {
            log::error!("commit with an open pass; pass left open");
        }

        if let Some(frame) = state.encoded.take() {
            state.queue.submit(std::iter::once(frame.encoder.finish()));
            self.context.queue_present(frame.surface_texture);
        }
    }
}

impl Drop for WgpuGfx {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn record(state: &mut Option<DeviceState>, op: &str, cmd: PassCommand) {
    match state.as_mut().map(|s| &mut s.pass) {
        Some(PassSlot::Open(pass)) => pass.commands.push(cmd),
        Some(PassSlot::Skipped) => {}
        Some(PassSlot::Closed) => log::error!("{op} outside a render pass; ignored"),
        None => log::error!("{op} before setup"),
    }
}

fn vertex_format(f: VertexFormat) -> wgpu::VertexFormat {
    match f {
        VertexFormat::Float2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float3 => wgpu::VertexFormat::Float32x3,
        VertexFormat::Float4 => wgpu::VertexFormat::Float32x4,
    }
}

fn depth_format(f: PixelFormat, init: &GpuInit) -> wgpu::TextureFormat {
    match f {
        PixelFormat::DepthStencil => wgpu::TextureFormat::Depth24PlusStencil8,
        _ => init.depth_format,
    }
}
