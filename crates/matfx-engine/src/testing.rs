//! Test doubles for the window system and GPU backend.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::bail;

use crate::input::{InputEvent, InputSink};
use crate::render::{
    Bindings, BufferDesc, BufferId, Gfx, PassDesc, PipelineDesc, PipelineId, PixelFormat,
    ShaderDesc, ShaderId,
};
use crate::window::{WindowConfig, WindowSystem};

/// Cross-component call order, shared by both doubles.
pub(crate) type Timeline = Rc<RefCell<Vec<&'static str>>>;

fn mark(timeline: &Option<Timeline>, what: &'static str) {
    if let Some(t) = timeline {
        t.borrow_mut().push(what);
    }
}

// ── GPU backend ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GfxCall {
    Setup,
    Shutdown,
    MakeBuffer { label: String, len: usize },
    MakeShader { label: String },
    MakePipeline {
        label: String,
        stride: u64,
        color: PixelFormat,
        depth: Option<PixelFormat>,
    },
    BeginPass(PassDesc),
    ApplyPipeline(PipelineId),
    ApplyBindings(Bindings),
    Draw { base: u32, count: u32, instances: u32 },
    EndPass,
    Commit,
}

#[derive(Default)]
pub(crate) struct RecordingGfx {
    pub calls: Rc<RefCell<Vec<GfxCall>>>,
    pub fail_setup: bool,
    pub invalid_after_setup: bool,
    pub invalid_after_pipeline: bool,
    /// Backend turns invalid after this many commits.
    pub invalid_after_commits: Option<usize>,
    pub timeline: Option<Timeline>,
    pub valid: bool,
    pub next_id: u32,
    pub commits: usize,
}

impl RecordingGfx {
    pub fn calls(&self) -> Vec<GfxCall> {
        self.calls.borrow().clone()
    }

    pub fn journal(&self) -> Rc<RefCell<Vec<GfxCall>>> {
        Rc::clone(&self.calls)
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&GfxCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: GfxCall) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl Gfx for RecordingGfx {
    fn setup(&mut self) -> anyhow::Result<()> {
        if self.fail_setup {
            bail!("no adapter");
        }
        self.push(GfxCall::Setup);
        self.valid = !self.invalid_after_setup;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.push(GfxCall::Shutdown);
        self.valid = false;
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn make_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        self.push(GfxCall::MakeBuffer {
            label: desc.label.to_owned(),
            len: desc.contents.len(),
        });
        BufferId(self.next())
    }

    fn make_shader(&mut self, desc: &ShaderDesc<'_>) -> ShaderId {
        self.push(GfxCall::MakeShader {
            label: desc.label.to_owned(),
        });
        ShaderId(self.next())
    }

    fn make_pipeline(&mut self, desc: &PipelineDesc<'_>) -> PipelineId {
        self.push(GfxCall::MakePipeline {
            label: desc.label.to_owned(),
            stride: desc.layout.stride(),
            color: desc.color_format,
            depth: desc.depth_format,
        });
        if self.invalid_after_pipeline {
            self.valid = false;
        }
        PipelineId(self.next())
    }

    fn begin_pass(&mut self, pass: &PassDesc) {
        mark(&self.timeline, "begin_pass");
        self.push(GfxCall::BeginPass(*pass));
    }

    fn apply_pipeline(&mut self, pipeline: PipelineId) {
        self.push(GfxCall::ApplyPipeline(pipeline));
    }

    fn apply_bindings(&mut self, bindings: &Bindings) {
        self.push(GfxCall::ApplyBindings(bindings.clone()));
    }

    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        mark(&self.timeline, "draw");
        self.push(GfxCall::Draw {
            base: base_element,
            count: num_elements,
            instances: num_instances,
        });
    }

    fn end_pass(&mut self) {
        mark(&self.timeline, "end_pass");
        self.push(GfxCall::EndPass);
    }

    fn commit(&mut self) {
        mark(&self.timeline, "commit");
        self.push(GfxCall::Commit);
        self.commits += 1;
        if self.invalid_after_commits.is_some_and(|n| self.commits >= n) {
            self.valid = false;
        }
    }
}

// ── window system ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct SystemCounters {
    pub init: usize,
    pub create: usize,
    pub destroy: usize,
    pub terminate: usize,
    pub swaps: usize,
    pub polls: usize,
}

/// Replays one batch of events per `poll_events`.
#[derive(Default)]
pub(crate) struct ScriptedSystem {
    pub fail_init: bool,
    pub fail_create: bool,
    pub batches: VecDeque<Vec<InputEvent>>,
    /// Requests close from the OS side once this many polls have run.
    pub close_after_polls: Option<usize>,
    pub framebuffer: (u32, u32),
    pub counters: Rc<RefCell<SystemCounters>>,
    pub timeline: Option<Timeline>,
    pub has_window: bool,
    pub close_flag: bool,
}

impl ScriptedSystem {
    pub fn with_batches(batches: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
            framebuffer: (800, 600),
            ..Self::default()
        }
    }

    pub fn counters(&self) -> Rc<RefCell<SystemCounters>> {
        Rc::clone(&self.counters)
    }
}

impl WindowSystem for ScriptedSystem {
    fn init(&mut self) -> anyhow::Result<()> {
        self.counters.borrow_mut().init += 1;
        if self.fail_init {
            bail!("no display");
        }
        Ok(())
    }

    fn create_window(&mut self, _config: &WindowConfig) -> anyhow::Result<()> {
        self.counters.borrow_mut().create += 1;
        if self.fail_create {
            bail!("context creation refused");
        }
        self.has_window = true;
        Ok(())
    }

    fn destroy_window(&mut self) {
        if self.has_window {
            self.counters.borrow_mut().destroy += 1;
            self.has_window = false;
        }
    }

    fn terminate(&mut self) {
        self.counters.borrow_mut().terminate += 1;
    }

    fn should_close(&self) -> bool {
        !self.has_window || self.close_flag
    }

    fn set_should_close(&mut self, value: bool) {
        self.close_flag = value;
    }

    fn swap_buffers(&mut self) {
        mark(&self.timeline, "swap_buffers");
        self.counters.borrow_mut().swaps += 1;
    }

    fn poll_events(&mut self, sink: &mut dyn InputSink) {
        mark(&self.timeline, "poll_events");
        let polls = {
            let mut counters = self.counters.borrow_mut();
            counters.polls += 1;
            counters.polls
        };

        for ev in self.batches.pop_front().unwrap_or_default() {
            sink.dispatch(ev);
        }

        if self.close_after_polls.is_some_and(|n| polls >= n) {
            self.close_flag = true;
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        if self.has_window {
            self.framebuffer
        } else {
            (0, 0)
        }
    }
}
