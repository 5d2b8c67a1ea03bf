use anyhow::anyhow;

use super::gfx::{
    Bindings, BufferDesc, BufferId, ClearColor, Gfx, PassDesc, PipelineDesc, PipelineId,
    PixelFormat, VertexLayout,
};
use super::triangle;
use crate::error::{EngineError, EngineResult};

const COLOR_FORMAT: PixelFormat = PixelFormat::Swapchain;
const DEPTH_FORMAT: PixelFormat = PixelFormat::Depth;

/// Lifecycle of a [`Renderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    Uninitialized,
    /// Initialized, no pass open.
    Idle,
    PassOpen,
    ShutDown,
}

#[derive(Debug, Copy, Clone)]
struct Resources {
    pipeline: PipelineId,
    vertex_buffer: BufferId,
}

enum Phase {
    Uninitialized,
    Idle(Resources),
    PassOpen(Resources),
    ShutDown,
}

/// Draws the fixed triangle once per frame.
///
/// Frame protocol: `begin_frame → render* → end_frame`, repeated, between a
/// successful `init` and `shutdown`. Breaking the protocol (rendering outside a
/// pass, nesting `begin_frame`, any frame call before `init`) is a programming
/// error and panics; the GPU backend does not guard against it.
pub struct Renderer<G: Gfx> {
    gfx: G,
    phase: Phase,
}

impl<G: Gfx> Renderer<G> {
    pub fn new(gfx: G) -> Self {
        Self {
            gfx,
            phase: Phase::Uninitialized,
        }
    }

    /// Sets up the backend and creates the triangle's buffer and pipeline.
    ///
    /// Requires the graphics context of an initialized window. Calling it on an
    /// initialized renderer does nothing.
    pub fn init(&mut self) -> EngineResult<()> {
        if matches!(self.phase, Phase::Idle(_) | Phase::PassOpen(_)) {
            log::warn!("renderer already initialized; init ignored");
            return Ok(());
        }

        self.gfx.setup().map_err(EngineError::GpuInit)?;

        if !self.gfx.is_valid() {
            self.gfx.shutdown();
            return Err(EngineError::GpuInit(anyhow!(
                "backend reported an invalid state after setup"
            )));
        }

        let resources = self.create_resources();

        if !self.gfx.is_valid() {
            self.gfx.shutdown();
            return Err(EngineError::GpuInit(anyhow!(
                "backend became invalid while creating triangle resources"
            )));
        }

        self.phase = Phase::Idle(resources);
        log::info!("renderer initialized");
        Ok(())
    }

    /// Releases GPU resources. Idempotent; a no-op unless initialized.
    pub fn shutdown(&mut self) {
        match self.phase {
            Phase::Idle(_) | Phase::PassOpen(_) => {
                if matches!(self.phase, Phase::PassOpen(_)) {
                    log::warn!("renderer shut down with a render pass still open");
                }
                self.gfx.shutdown();
                self.phase = Phase::ShutDown;
                log::info!("renderer shut down");
            }
            Phase::Uninitialized | Phase::ShutDown => {}
        }
    }

    /// Opens the frame's render pass over a `width`×`height` drawable,
    /// cleared to opaque black.
    pub fn begin_frame(&mut self, width: u32, height: u32) {
        let res = match self.phase {
            Phase::Idle(res) => res,
            Phase::PassOpen(_) => panic!("begin_frame called while a render pass is open"),
            Phase::Uninitialized | Phase::ShutDown => {
                panic!("begin_frame called on a renderer that is not initialized")
            }
        };

        self.gfx.begin_pass(&PassDesc {
            clear_color: ClearColor::OPAQUE_BLACK,
            width,
            height,
            sample_count: 1,
            color_format: COLOR_FORMAT,
            depth_format: Some(DEPTH_FORMAT),
        });

        self.phase = Phase::PassOpen(res);
    }

    /// Draws the triangle into the open pass.
    pub fn render(&mut self) {
        let Phase::PassOpen(res) = self.phase else {
            panic!("render called outside of begin_frame/end_frame");
        };

        self.gfx.apply_pipeline(res.pipeline);
        self.gfx.apply_bindings(&Bindings {
            vertex_buffers: vec![res.vertex_buffer],
        });
        self.gfx.draw(0, triangle::VERTEX_COUNT, 1);
    }

    /// Closes the pass and submits the frame's work.
    pub fn end_frame(&mut self) {
        let Phase::PassOpen(res) = self.phase else {
            panic!("end_frame called without a matching begin_frame");
        };

        self.gfx.end_pass();
        self.gfx.commit();
        self.phase = Phase::Idle(res);
    }

    /// Initialized and the backend still reports a valid state.
    pub fn is_valid(&self) -> bool {
        matches!(self.phase, Phase::Idle(_) | Phase::PassOpen(_)) && self.gfx.is_valid()
    }

    pub fn state(&self) -> RendererState {
        match self.phase {
            Phase::Uninitialized => RendererState::Uninitialized,
            Phase::Idle(_) => RendererState::Idle,
            Phase::PassOpen(_) => RendererState::PassOpen,
            Phase::ShutDown => RendererState::ShutDown,
        }
    }

    pub fn pipeline(&self) -> Option<PipelineId> {
        self.resources().map(|r| r.pipeline)
    }

    pub fn vertex_buffer(&self) -> Option<BufferId> {
        self.resources().map(|r| r.vertex_buffer)
    }

    pub fn gfx(&self) -> &G {
        &self.gfx
    }

    fn resources(&self) -> Option<&Resources> {
        match &self.phase {
            Phase::Idle(res) | Phase::PassOpen(res) => Some(res),
            Phase::Uninitialized | Phase::ShutDown => None,
        }
    }

    fn create_resources(&mut self) -> Resources {
        let vertex_buffer = self.gfx.make_buffer(&BufferDesc {
            label: "triangle-vertices",
            contents: bytemuck::cast_slice(&triangle::VERTICES),
        });

        let shader = self.gfx.make_shader(&triangle::shader_desc());

        let pipeline = self.gfx.make_pipeline(&PipelineDesc {
            label: "triangle-pipeline",
            shader,
            layout: VertexLayout {
                attrs: &triangle::VERTEX_ATTRS,
            },
            color_format: COLOR_FORMAT,
            depth_format: Some(DEPTH_FORMAT),
        });

        log::debug!(
            "triangle resources created (buffer {vertex_buffer:?}, shader {shader:?}, \
             pipeline {pipeline:?})"
        );

        Resources {
            pipeline,
            vertex_buffer,
        }
    }
}

impl<G: Gfx> Drop for Renderer<G> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
