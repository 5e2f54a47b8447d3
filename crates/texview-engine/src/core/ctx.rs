use crate::surface::DisplaySurface;
use crate::window::RuntimeCtx;

/// Context passed to every [`App`](super::App) callback.
pub struct AppCtx<'a> {
    pub surface: &'a mut DisplaySurface,
    pub runtime: &'a mut RuntimeCtx,
}
