use std::cell::RefCell;
use std::sync::Arc;

use anyhow::Context;
use winit::window::Window;

use super::ContextRequest;

/// Graphics context bound to one window.
///
/// Created by the window system together with the window; the GPU backend
/// borrows it (through `Rc`) to build its device and acquire frames, and the
/// window presents through it in `swap_buffers`.
pub struct GraphicsContext {
    /// Keeps the native window alive for as long as the surface exists.
    window: Arc<Window>,

    /// wgpu instance restricted to the requested backends.
    instance: wgpu::Instance,

    /// Presentation surface for `window`.
    surface: wgpu::Surface<'static>,

    /// Frame committed by the GPU backend and waiting for `present`.
    pending: RefCell<Option<wgpu::SurfaceTexture>>,
}

impl GraphicsContext {
    pub fn new(window: Arc<Window>, request: &ContextRequest) -> anyhow::Result<Self> {
        request.validate()?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: request.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        log::debug!(
            "graphics context created (backends: {:?}, GL {}.{} {:?})",
            request.backends,
            request.gl_major,
            request.gl_minor,
            request.gl_profile
        );

        Ok(Self {
            window,
            instance,
            surface,
            pending: RefCell::new(None),
        })
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn surface(&self) -> &wgpu::Surface<'static> {
        &self.surface
    }

    /// Live drawable size in physical pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Stores a submitted frame until the next `present`.
    ///
    /// A frame that was never presented is dropped (and thereby discarded).
    pub(crate) fn queue_present(&self, frame: wgpu::SurfaceTexture) {
        if self.pending.replace(Some(frame)).is_some() {
            log::warn!("previous frame was never presented; discarding it");
        }
    }

    /// Drops a committed-but-unpresented frame.
    pub(crate) fn discard_pending(&self) {
        self.pending.borrow_mut().take();
    }

    /// Presents the pending frame, if any. Returns whether one was presented.
    pub fn present(&self) -> bool {
        let Some(frame) = self.pending.borrow_mut().take() else {
            return false;
        };
        self.window.pre_present_notify();
        frame.present();
        true
    }
}
