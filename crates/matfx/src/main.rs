use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::Context;
use matfx_engine::device::GpuInit;
use matfx_engine::device::WgpuGfx;
use matfx_engine::logging::{LoggingConfig, init_logging};
use matfx_engine::render::Renderer;
use matfx_engine::window::{Window, WindowConfig};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const TITLE: &str = "MatFX";

/// Process exit code for any failure (255 on Unix).
const FAILURE: i32 = -1;

fn main() {
    init_logging(LoggingConfig::default());
    log::info!("starting {TITLE}");

    let code = match panic::catch_unwind(AssertUnwindSafe(run_engine)) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            log::error!("{e:#}");
            FAILURE
        }
        Err(payload) => {
            log::error!("engine panicked: {}", panic_message(payload.as_ref()));
            FAILURE
        }
    };

    log::info!("exiting with code {code}");
    std::process::exit(code);
}

fn run_engine() -> anyhow::Result<()> {
    let mut window = Window::new(WindowConfig {
        title: TITLE.to_string(),
        width: WIDTH,
        height: HEIGHT,
        ..WindowConfig::default()
    });
    window.init().context("window initialization failed")?;
    log::info!("window initialized");

    let context = window
        .graphics_context()
        .context("window has no graphics context")?;

    let mut renderer = Renderer::new(WgpuGfx::new(context, GpuInit::default()));
    renderer.init().context("renderer initialization failed")?;

    let result = matfx_engine::core::run(&mut window, &mut renderer);

    // Renderer first: it holds the window's graphics context.
    renderer.shutdown();
    drop(renderer);
    window.shutdown();

    let stats = result.context("frame loop aborted")?;
    log::info!(
        "rendered {} frames in {:.2}s",
        stats.frames,
        stats.elapsed.as_secs_f64()
    );
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
