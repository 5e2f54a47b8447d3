//! Textured-quad rendering.
//!
//! One pipeline, one sampler, one texture, four vertices. Geometry is produced
//! on the CPU every frame from the current texture and drawable sizes.

pub mod fit;
mod pipeline;
mod renderer;
mod texture;
mod vertex;

pub use fit::aspect_fit_quad;
pub use pipeline::{QuadPipeline, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use renderer::{DrawOutcome, Renderer};
pub use texture::QuadTexture;
pub use vertex::Vertex;
