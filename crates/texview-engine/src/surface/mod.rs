//! Display surface: a window with an image renderer attached.

mod display;
mod redraw;

pub use display::{DisplaySurface, SurfaceConfig};
pub use redraw::{Invalidation, RedrawPolicy, RedrawState, MAX_SKIP_RETRIES};
