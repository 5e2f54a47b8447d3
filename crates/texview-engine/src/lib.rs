//! texview engine crate.
//!
//! Shows a single image, aspect-fitted, in a window's GPU surface and lets the
//! host swap that image at runtime.
//!
//! Layering, bottom up:
//! - `device`: wgpu adapter/device/queue and the window surface
//! - `assets`: image lookup and decoding
//! - `render`: the textured-quad renderer
//! - `surface`: a window + renderer pair driven by the runtime
//! - `window` / `core`: the event loop and the app contract

pub mod assets;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod surface;
pub mod time;
pub mod window;
