use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use super::system::{WindowConfig, WindowSystem};
use crate::device::GraphicsContext;
use crate::input::InputSink;
use crate::input::platform::winit::translate_window_event;

/// Upper bound on pumps spent waiting for the platform to allow window creation.
const BOOTSTRAP_PUMPS: usize = 64;

/// `WindowSystem` backed by winit, driven in pump mode so the caller keeps
/// ownership of the frame loop.
#[derive(Default)]
pub struct WinitSystem {
    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<WinitWindow>>,
    context: Option<Rc<GraphicsContext>>,
    should_close: bool,
}

impl WinitSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graphics_context(&self) -> Option<Rc<GraphicsContext>> {
        self.context.clone()
    }
}

impl WindowSystem for WinitSystem {
    fn init(&mut self) -> Result<()> {
        if self.event_loop.is_some() {
            return Ok(());
        }

        // winit allows one event loop per process; a second `new` fails.
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        self.event_loop = Some(event_loop);
        log::debug!("windowing system initialized");
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<()> {
        let event_loop = self
            .event_loop
            .as_mut()
            .context("windowing system is not initialized")?;

        let attrs = WinitWindow::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let mut bootstrap = Bootstrap {
            attrs: Some(attrs),
            created: None,
        };

        for _ in 0..BOOTSTRAP_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut bootstrap);
            if bootstrap.created.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {code} before the window was created");
            }
        }

        let window = match bootstrap.created {
            Some(created) => Arc::new(created?),
            None => bail!("platform never resumed the event loop; no window was created"),
        };

        let context = GraphicsContext::new(Arc::clone(&window), &config.context)
            .context("failed to bind a graphics context to the window")?;

        let size = window.inner_size();
        log::debug!(
            "winit window created (framebuffer {}x{}, scale {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        self.window = Some(window);
        self.context = Some(Rc::new(context));
        self.should_close = false;
        Ok(())
    }

    fn destroy_window(&mut self) {
        // The surface goes first; it references the window.
        self.context = None;
        if self.window.take().is_some() {
            log::debug!("winit window destroyed");
        }
    }

    fn terminate(&mut self) {
        self.destroy_window();
        if self.event_loop.take().is_some() {
            log::debug!("windowing system terminated");
        }
    }

    fn should_close(&self) -> bool {
        self.window.is_none() || self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn swap_buffers(&mut self) {
        if let Some(context) = &self.context
            && !context.present()
        {
            log::trace!("swap_buffers: no committed frame to present");
        }
    }

    fn poll_events(&mut self, sink: &mut dyn InputSink) {
        let (Some(event_loop), Some(window)) = (self.event_loop.as_mut(), self.window.as_deref())
        else {
            return;
        };

        let mut pump = EventPump {
            window,
            sink,
            close_requested: false,
        };
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut pump);

        if pump.close_requested || matches!(status, PumpStatus::Exit(_)) {
            self.should_close = true;
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.window.as_ref().map_or((0, 0), |w| {
            let size = w.inner_size();
            (size.width, size.height)
        })
    }
}

/// Creates the window on the first `resumed`.
struct Bootstrap {
    attrs: Option<WindowAttributes>,
    created: Option<Result<WinitWindow>>,
}

impl ApplicationHandler for Bootstrap {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attrs) = self.attrs.take() {
            self.created = Some(
                event_loop
                    .create_window(attrs)
                    .context("failed to create window"),
            );
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Forwards one pump's worth of window events to an input sink.
struct EventPump<'a> {
    window: &'a WinitWindow,
    sink: &'a mut dyn InputSink,
    close_requested: bool,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window.id() {
            return;
        }

        if let WindowEvent::CloseRequested = event {
            self.close_requested = true;
            return;
        }

        // Resizes need no handling here: the GPU backend reconfigures the
        // surface from the live framebuffer size every frame.
        if let Some(ev) = translate_window_event(self.window, &event) {
            self.sink.dispatch(ev);
        }
    }
}
