use std::time::Duration;

use texview_engine::assets::Bundle;
use texview_engine::core::{App, AppControl, AppCtx};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Cycles a fixed list of images on a timer.
///
/// The first image is the one the surface starts with, so the first tick
/// moves to the second.
pub struct Slideshow {
    images: Vec<String>,
    bundle: Bundle,
    period: Duration,
    next: usize,
}

impl Slideshow {
    pub fn new(images: Vec<String>, bundle: Bundle, period: Duration) -> Self {
        let next = if images.is_empty() { 0 } else { 1 % images.len() };
        Self {
            images,
            bundle,
            period,
            next,
        }
    }

    /// Index of the image to show next; advances, wrapping around.
    fn advance(&mut self) -> Option<usize> {
        if self.images.is_empty() {
            return None;
        }

        let idx = self.next;
        self.next = (self.next + 1) % self.images.len();
        Some(idx)
    }
}

impl App for Slideshow {
    fn on_ready(&mut self, ctx: &mut AppCtx<'_>) -> AppControl {
        ctx.runtime.schedule_after(self.period);
        AppControl::Continue
    }

    fn on_window_event(&mut self, _ctx: &mut AppCtx<'_>, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_timer(&mut self, ctx: &mut AppCtx<'_>) -> AppControl {
        if let Some(idx) = self.advance() {
            let name = &self.images[idx];
            log::info!("showing `{name}`");
            ctx.surface.set_image(name, &self.bundle);
        }

        ctx.runtime.schedule_after(self.period);
        AppControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(names: &[&str]) -> Slideshow {
        Slideshow::new(
            names.iter().map(|s| s.to_string()).collect(),
            Bundle::in_memory(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn first_tick_moves_past_the_initial_image() {
        let mut s = show(&["a", "b", "c"]);
        let seen: Vec<&str> = (0..7)
            .filter_map(|_| s.advance())
            .map(|i| ["a", "b", "c"][i])
            .collect();
        assert_eq!(seen, ["b", "c", "a", "b", "c", "a", "b"]);
    }

    #[test]
    fn single_image_repeats() {
        let mut s = show(&["only"]);
        assert_eq!(s.advance(), Some(0));
        assert_eq!(s.advance(), Some(0));
    }

    #[test]
    fn empty_list_shows_nothing() {
        let mut s = show(&[]);
        assert_eq!(s.advance(), None);
    }
}
