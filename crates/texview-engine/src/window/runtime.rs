use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, AppCtx};
use crate::device::GpuInit;
use crate::render::DrawOutcome;
use crate::surface::{DisplaySurface, SurfaceConfig};
use crate::time::Timer;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "texview".to_string(),
            initial_size: LogicalSize::new(390.0, 844.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Arms the single app timer; [`App::on_timer`] runs once `delay` has
    /// elapsed. Replaces any pending timer.
    pub fn schedule_after(&mut self, delay: Duration) {
        self.commands.push(Command::ScheduleAfter(delay));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ScheduleAfter(Duration),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window showing `surface.image` and runs until the window
    /// closes or the app exits.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, surface: SurfaceConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, surface, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    surface_config: SurfaceConfig,
    app: A,

    surface: Option<DisplaySurface>,
    timer: Timer,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, surface_config: SurfaceConfig, app: A) -> Self {
        Self {
            config,
            gpu_init,
            surface_config,
            app,
            surface: None,
            timer: Timer::new(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<DisplaySurface> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_transparent(!self.gpu_init.opaque);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        DisplaySurface::new(window, self.gpu_init.clone(), &self.surface_config)
    }

    /// Runs one app callback with a fresh context, then applies its commands.
    fn dispatch<F>(&mut self, event_loop: &ActiveEventLoop, f: F)
    where
        F: FnOnce(&mut A, &mut AppCtx<'_>) -> AppControl,
    {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let mut runtime = RuntimeCtx::default();
        let control = {
            let mut ctx = AppCtx {
                surface,
                runtime: &mut runtime,
            };
            f(&mut self.app, &mut ctx)
        };

        let lost = self.surface.as_ref().is_some_and(|s| s.is_lost());
        if control == AppControl::Exit || lost {
            runtime.exit();
        }

        self.apply_commands(event_loop, runtime);
    }

    fn exit_on_fatal(&mut self, event_loop: &ActiveEventLoop, outcome: DrawOutcome) {
        if outcome == DrawOutcome::Fatal {
            self.request_exit();
            event_loop.exit();
        }
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::ScheduleAfter(delay) => self.timer.arm(Instant::now(), delay),
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }

        let started = Instant::now();
        match self.create_surface(event_loop) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                log::error!("failed to create display surface: {e:#}");
                self.request_exit();
                event_loop.exit();
                return;
            }
        }
        log::debug!("display surface up in {:?}", started.elapsed());

        self.dispatch(event_loop, |app, ctx| app.on_ready(ctx));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.timer.fire(Instant::now()) {
            self.dispatch(event_loop, |app, ctx| app.on_timer(ctx));
        }

        match self.timer.deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.surface.as_ref().map(|s| s.id()) != Some(window_id) {
            return;
        }

        self.dispatch(event_loop, |app, ctx| app.on_window_event(ctx, &event));
        if self.exit_requested {
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        // Runtime-managed lifecycle / resize / redraw handling.
        match event {
            WindowEvent::CloseRequested => {
                self.surface = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                let outcome = surface.resize(new_size);
                self.exit_on_fatal(event_loop, outcome);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = surface.window().inner_size();
                let outcome = surface.resize(new_size);
                self.exit_on_fatal(event_loop, outcome);
            }

            WindowEvent::RedrawRequested => {
                let outcome = surface.redraw_requested();
                self.exit_on_fatal(event_loop, outcome);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_buffered_in_order() {
        let mut ctx = RuntimeCtx::default();
        ctx.schedule_after(Duration::from_secs(5));
        ctx.schedule_after(Duration::from_secs(1));
        ctx.exit();

        assert_eq!(
            ctx.commands,
            vec![
                Command::ScheduleAfter(Duration::from_secs(5)),
                Command::ScheduleAfter(Duration::from_secs(1)),
                Command::Exit,
            ]
        );
    }
}
