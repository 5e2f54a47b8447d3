//! Geometry types shared by the renderer and the surface.
//!
//! Two spaces are in play:
//! - view space: drawable size in pixels, used only for its aspect ratio
//! - normalized device coordinates: [-1, 1] on both axes, +Y up

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
