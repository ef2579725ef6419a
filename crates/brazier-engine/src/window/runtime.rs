use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, InitCtx, TickCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::time::{TickTimer, DEFAULT_TICK_PERIOD};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// When set, ticks start at this period right after `App::on_init`.
    pub tick_period: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "brazier".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            tick_period: Some(DEFAULT_TICK_PERIOD),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    /// Schedules one `on_frame`. Multiple requests before the frame coalesce.
    pub fn request_redraw(&mut self) {
        self.commands.push(Command::RequestRedraw);
    }

    /// (Re)starts the tick cadence; the first tick is due one `period` from now.
    pub fn start_ticks(&mut self, period: Duration) {
        self.commands.push(Command::StartTicks(period));
    }

    pub fn stop_ticks(&mut self) {
        self.commands.push(Command::StopTicks);
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Command {
    Exit,
    RequestRedraw,
    StartTicks(Duration),
    StopTicks,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` in one window until it exits or the window closes.
    ///
    /// Setup failures (window, GPU, `App::on_init`) end the loop and are returned.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    ticks: TickTimer,
    tick_index: u64,

    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App + 'static> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            ticks: TickTimer::default(),
            tick_index: 0,
            exit_requested: false,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            input_state: InputState::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    /// Creates the window, runs `on_init` and the first `on_resize`.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let entry = self.create_window_entry(event_loop)?;
        let mut runtime = RuntimeCtx::default();

        let app = &mut self.app;
        let size = entry.with(|fields| {
            let mut ctx = InitCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                runtime: &mut runtime,
            };
            app.on_init(&mut ctx)
                .map(|()| fields.gpu.size())
        })
        .context("application setup failed")?;

        self.app.on_resize(size.width, size.height);
        self.entry = Some(entry);

        if let Some(period) = self.config.tick_period {
            runtime.start_ticks(period);
        }
        runtime.request_redraw();
        self.apply_commands(event_loop, runtime);
        Ok(())
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::Exit => self.exit_requested = true,
                Command::RequestRedraw => {
                    if let Some(entry) = &self.entry {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::StartTicks(period) => {
                    log::debug!("ticks started every {period:?}");
                    self.ticks.restart_with(period, Instant::now());
                    self.tick_index = 0;
                }
                Command::StopTicks => {
                    log::debug!("ticks stopped");
                    self.ticks.stop();
                }
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn run_tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = &self.entry else { return };
        let mut runtime = RuntimeCtx::default();

        let control = entry.with_input_state(|input| {
            let mut ctx = TickCtx {
                input,
                period: self.ticks.period(),
                index: self.tick_index,
                runtime: &mut runtime,
            };
            self.app.on_tick(&mut ctx)
        });
        self.tick_index += 1;

        if control == AppControl::Exit {
            runtime.exit();
        }
        self.apply_commands(event_loop, runtime);
    }

    fn resize(&mut self) {
        let Some(entry) = self.entry.as_mut() else { return };
        let size = entry.with_window(|w| w.inner_size());
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        entry.with_window(|w| w.request_redraw());
        self.app.on_resize(size.width, size.height);
    }
}

impl<A: App + 'static> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.ticks.poll(Instant::now()) {
            self.run_tick(event_loop);
        }

        match self.ticks.deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, self.entry.as_mut());
        let Some(entry) = entry else { return };

        if let Some(ev) = translate_window_event(&event) {
            control = entry.with_input_state_mut(|input| {
                input.apply_event(&ev);
                app.on_input(&ev, input)
            });
        }

        match &event {
            WindowEvent::CloseRequested => runtime.exit(),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),

            WindowEvent::RedrawRequested => {
                control = entry.with_mut(|fields| {
                    let mut ctx = FrameCtx {
                        window: WindowCtx {
                            id: fields.window.id(),
                            window: fields.window,
                        },
                        gpu: fields.gpu,
                        input: fields.input_state,
                        runtime: &mut runtime,
                    };
                    app.on_frame(&mut ctx)
                });
            }

            _ => {}
        }

        if control == AppControl::Exit {
            runtime.exit();
        }
        self.apply_commands(event_loop, runtime);
    }
}
