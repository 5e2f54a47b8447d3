//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window's [`DisplaySurface`](crate::surface::DisplaySurface).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
