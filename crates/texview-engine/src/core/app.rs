use winit::event::WindowEvent;

use super::ctx::AppCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by hosts of a [`DisplaySurface`].
///
/// All callbacks run on the event-loop thread. Drawing is handled by the
/// runtime; apps only change what is shown.
///
/// [`DisplaySurface`]: crate::surface::DisplaySurface
pub trait App {
    /// Called once, after the surface exists and before the first frame.
    fn on_ready(&mut self, ctx: &mut AppCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called for every window event, before the runtime handles it.
    fn on_window_event(&mut self, ctx: &mut AppCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called when a timer armed with [`RuntimeCtx::schedule_after`] expires.
    ///
    /// [`RuntimeCtx::schedule_after`]: crate::window::RuntimeCtx::schedule_after
    fn on_timer(&mut self, ctx: &mut AppCtx<'_>) -> AppControl;
}
