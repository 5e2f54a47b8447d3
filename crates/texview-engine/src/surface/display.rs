use anyhow::Result;
use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::assets::Bundle;
use crate::device::{Gpu, GpuInit};
use crate::render::{DrawOutcome, Renderer};

use super::{RedrawPolicy, RedrawState};

/// What a [`DisplaySurface`] shows when it is created.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    pub image: String,
    pub bundle: Bundle,
    pub redraw: RedrawPolicy,
}

impl SurfaceConfig {
    pub fn new(image: impl Into<String>, bundle: Bundle) -> Self {
        Self {
            image: image.into(),
            bundle,
            redraw: RedrawPolicy::default(),
        }
    }

    pub fn redraw(mut self, policy: RedrawPolicy) -> Self {
        self.redraw = policy;
        self
    }
}

#[self_referencing]
struct SurfaceHost {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// A window whose whole content is one aspect-fitted image.
///
/// Owns the window, its GPU surface and the [`Renderer`]. A renderer that
/// failed to build is kept as `None`: the window stays up and image requests
/// become logged no-ops.
pub struct DisplaySurface {
    host: SurfaceHost,
    renderer: Option<Renderer>,
    redraw: RedrawState,
}

impl DisplaySurface {
    /// Binds a GPU surface to `window` and tries to build the renderer.
    ///
    /// Errors only when the GPU context itself cannot be created.
    pub fn new(window: Window, gpu_init: GpuInit, config: &SurfaceConfig) -> Result<Self> {
        let host = SurfaceHostTryBuilder {
            window,
            gpu_builder: |window: &Window| pollster::block_on(Gpu::new(window, gpu_init)),
        }
        .try_build()?;

        let renderer = host.with_gpu(|gpu| Renderer::new(gpu, &config.image, &config.bundle));
        let renderer = match renderer {
            Ok(r) => Some(r),
            Err(e) => {
                log::error!("no renderer for this surface: {e:#}");
                None
            }
        };

        let mut surface = Self {
            host,
            renderer,
            redraw: RedrawState::new(config.redraw),
        };
        surface.invalidate();

        Ok(surface)
    }

    pub fn id(&self) -> WindowId {
        self.host.borrow_window().id()
    }

    pub fn window(&self) -> &Window {
        self.host.borrow_window()
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.host.with_gpu(|gpu| gpu.size())
    }

    /// Whether a frame came back fatal; the host should shut down.
    pub fn is_lost(&self) -> bool {
        self.redraw.is_lost()
    }

    /// Swaps the displayed image and draws it immediately.
    ///
    /// Returns `false` (and keeps the current image) if the image could not
    /// be loaded or the surface has no renderer.
    pub fn set_image(&mut self, name: &str, bundle: &Bundle) -> bool {
        if !swap_image(self.renderer.as_mut(), name, bundle) {
            return false;
        }

        self.draw_now();
        true
    }

    /// Reconfigures the drawable and redraws at the new size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) -> DrawOutcome {
        self.host.with_gpu_mut(|gpu| gpu.resize(new_size));
        self.draw_now()
    }

    /// Marks the content dirty and asks the window for a redraw callback.
    pub fn invalidate(&mut self) {
        self.redraw.invalidate();
        self.window().request_redraw();
    }

    /// Per-cycle draw callback from the host.
    ///
    /// Draws only if the policy is continuous or an invalidation is pending.
    pub fn redraw_requested(&mut self) -> DrawOutcome {
        if self.redraw.is_lost() {
            return DrawOutcome::Fatal;
        }
        if !self.redraw.should_draw() {
            return DrawOutcome::Skipped;
        }

        self.draw_now()
    }

    /// Draws one frame right away, regardless of policy.
    pub fn draw_now(&mut self) -> DrawOutcome {
        if self.redraw.is_lost() {
            return DrawOutcome::Fatal;
        }
        let Some(renderer) = self.renderer.as_ref() else {
            return DrawOutcome::Skipped;
        };

        let outcome = self.host.with_gpu_mut(|gpu| renderer.render(gpu));
        if outcome == DrawOutcome::Fatal {
            log::error!("surface lost beyond recovery");
        }

        let size = self.size();
        if self.redraw.record(outcome, size.width > 0 && size.height > 0) {
            self.window().request_redraw();
        }

        outcome
    }
}

/// Hands `name` to the renderer, if there is one.
fn swap_image(renderer: Option<&mut Renderer>, name: &str, bundle: &Bundle) -> bool {
    match renderer {
        Some(renderer) => renderer.set_image(name, bundle),
        None => {
            log::warn!("ignoring image `{name}`: surface has no renderer");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn set_image_without_renderer_is_refused() {
        let bundle = Bundle::in_memory().with_entry("barca", png(4, 4));
        assert!(!swap_image(None, "barca", &bundle));
    }

    #[test]
    fn set_image_goes_to_the_renderer() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let Ok(adapter) =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
        else {
            return;
        };
        let Ok((device, queue)) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
        else {
            return;
        };

        let bundle = Bundle::in_memory()
            .with_entry("cover", png(4, 8))
            .with_entry("barca", png(8, 4));
        let mut renderer = Renderer::from_device(
            device,
            queue,
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::CompositeAlphaMode::Opaque,
            "cover",
            &bundle,
        )
        .unwrap();

        assert!(swap_image(Some(&mut renderer), "barca", &bundle));
        assert_eq!(renderer.image_name(), "barca");
        assert!(!swap_image(Some(&mut renderer), "missing", &bundle));
        assert_eq!(renderer.image_name(), "barca");
    }
}
