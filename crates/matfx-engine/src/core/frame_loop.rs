use std::time::{Duration, Instant};

use crate::error::{EngineError, EngineResult};
use crate::render::{Gfx, Renderer};
use crate::window::{Window, WindowSystem};

const THROUGHPUT_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Summary of a finished frame loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub elapsed: Duration,
}

impl FrameStats {
    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

/// Rolling frame counter for periodic throughput logs.
struct Throughput {
    since: Instant,
    frames: u64,
}

impl Throughput {
    fn new(now: Instant) -> Self {
        Self {
            since: now,
            frames: 0,
        }
    }

    fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let span = now.saturating_duration_since(self.since);
        if span >= THROUGHPUT_LOG_INTERVAL {
            log::debug!(
                "{:.1} fps ({} frames in {:.2}s)",
                self.frames as f64 / span.as_secs_f64(),
                self.frames,
                span.as_secs_f64()
            );
            *self = Self::new(now);
        }
    }
}

/// Runs frames until the window asks to close.
///
/// Each frame: framebuffer size, `begin_frame`, `render`, `end_frame`,
/// `swap_buffers`, `poll_events`. Returns `DeviceLost` as soon as the
/// renderer's backend stops reporting a valid state.
pub fn run<S, G>(window: &mut Window<S>, renderer: &mut Renderer<G>) -> EngineResult<FrameStats>
where
    S: WindowSystem,
    G: Gfx,
{
    let started = Instant::now();
    let mut throughput = Throughput::new(started);
    let mut frames: u64 = 0;

    log::info!("entering frame loop");

    while !window.should_close() {
        let (width, height) = window.framebuffer_size();

        renderer.begin_frame(width, height);
        renderer.render();
        renderer.end_frame();

        window.swap_buffers();
        window.poll_events();

        frames += 1;

        if !renderer.is_valid() {
            log::error!("GPU device lost after {frames} frames");
            return Err(EngineError::DeviceLost);
        }

        throughput.tick(Instant::now());
    }

    let stats = FrameStats {
        frames,
        elapsed: started.elapsed(),
    };
    log::info!(
        "frame loop ended after {} frames ({:.1} fps average)",
        stats.frames,
        stats.average_fps()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::{ButtonAction, InputEvent, Key};
    use crate::testing::{GfxCall, RecordingGfx, ScriptedSystem, Timeline};
    use crate::window::WindowConfig;

    fn setup(
        system: ScriptedSystem,
        gfx: RecordingGfx,
    ) -> (Window<ScriptedSystem>, Renderer<RecordingGfx>) {
        let mut window = Window::with_system(WindowConfig::default(), system);
        window.init().expect("window init");
        let mut renderer = Renderer::new(gfx);
        renderer.init().expect("renderer init");
        renderer.gfx().clear_calls();
        (window, renderer)
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn frames_follow_protocol_order() {
        let timeline: Timeline = Rc::new(RefCell::new(Vec::new()));
        let system = ScriptedSystem {
            close_after_polls: Some(3),
            timeline: Some(Rc::clone(&timeline)),
            ..ScriptedSystem::with_batches(vec![])
        };
        let gfx = RecordingGfx {
            timeline: Some(Rc::clone(&timeline)),
            ..RecordingGfx::default()
        };
        let (mut window, mut renderer) = setup(system, gfx);

        let stats = run(&mut window, &mut renderer).expect("loop");
        assert_eq!(stats.frames, 3);

        let frame = ["begin_pass", "draw", "end_pass", "commit", "swap_buffers", "poll_events"];
        let recorded = timeline.borrow();
        assert_eq!(recorded.len(), frame.len() * 3);
        for chunk in recorded.chunks(frame.len()) {
            assert_eq!(chunk, frame);
        }
    }

    #[test]
    fn pass_uses_live_framebuffer_size() {
        let system = ScriptedSystem {
            close_after_polls: Some(1),
            framebuffer: (1600, 1200),
            ..ScriptedSystem::with_batches(vec![])
        };
        let (mut window, mut renderer) = setup(system, RecordingGfx::default());

        run(&mut window, &mut renderer).expect("loop");

        let pass = renderer.gfx().calls().into_iter().find_map(|c| match c {
            GfxCall::BeginPass(p) => Some(p),
            _ => None,
        });
        let pass = pass.expect("a pass was opened");
        assert_eq!((pass.width, pass.height), (1600, 1200));
    }

    // ── termination ───────────────────────────────────────────────────────

    #[test]
    fn closed_window_renders_nothing() {
        let (mut window, mut renderer) =
            setup(ScriptedSystem::with_batches(vec![]), RecordingGfx::default());
        window.request_close();

        let stats = run(&mut window, &mut renderer).expect("loop");
        assert_eq!(stats.frames, 0);
        assert!(renderer.gfx().calls().is_empty());
    }

    #[test]
    fn escape_ends_loop() {
        let escape = InputEvent::Key {
            key: Key::Escape,
            action: ButtonAction::Press,
        };
        let system = ScriptedSystem::with_batches(vec![vec![], vec![escape]]);
        let (mut window, mut renderer) = setup(system, RecordingGfx::default());

        let stats = run(&mut window, &mut renderer).expect("loop");
        assert_eq!(stats.frames, 2);
        assert_eq!(renderer.gfx().count(|c| *c == GfxCall::Commit), 2);
    }

    #[test]
    fn device_loss_stops_loop() {
        let system = ScriptedSystem::with_batches(vec![]);
        let counters = system.counters();
        let gfx = RecordingGfx {
            invalid_after_commits: Some(2),
            ..RecordingGfx::default()
        };
        let (mut window, mut renderer) = setup(system, gfx);

        let err = run(&mut window, &mut renderer).unwrap_err();
        assert!(matches!(err, EngineError::DeviceLost));
        assert_eq!(counters.borrow().polls, 2);
        assert!(!window.should_close());
    }

    // ── stats ─────────────────────────────────────────────────────────────

    #[test]
    fn average_fps_handles_zero_elapsed() {
        let stats = FrameStats {
            frames: 10,
            elapsed: Duration::ZERO,
        };
        assert_eq!(stats.average_fps(), 0.0);

        let stats = FrameStats {
            frames: 120,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(stats.average_fps(), 60.0);
    }
}
