/// Initialization parameters for the GPU layer.
///
/// Defaults describe a layer-backed view: 8-bit BGRA without sRGB encoding,
/// non-opaque compositing and at most two drawables in flight.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Preferred surface color format.
    ///
    /// Falls back to a supported format when the surface cannot present it.
    pub color_format: wgpu::TextureFormat,

    /// Whether the surface is composited as opaque.
    ///
    /// A non-opaque surface lets the transparent clear color show whatever is
    /// behind the view.
    pub opaque: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            color_format: wgpu::TextureFormat::Bgra8Unorm,
            opaque: false,
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::default(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
