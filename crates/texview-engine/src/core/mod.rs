//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application that decides what the surface displays.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::AppCtx;
