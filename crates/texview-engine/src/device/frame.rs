/// A single acquired drawable.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// one. Finish it with [`Gpu::present`](super::Gpu::present).
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
