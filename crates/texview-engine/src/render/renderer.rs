use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::assets::{load_image, Bundle};
use crate::coords::Viewport;
use crate::device::{capture_errors, Gpu, SurfaceErrorAction};

use super::fit::aspect_fit_quad;
use super::{QuadPipeline, QuadTexture};

/// Result of one [`Renderer::render`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawOutcome {
    /// A frame was submitted and presented.
    Presented,
    /// Nothing was drawn; the previous frame stays on screen.
    Skipped,
    /// The surface is unusable (commonly OOM); the host should shut down.
    Fatal,
}

/// Draws one image, aspect-fitted, into a window's surface.
///
/// Pipeline and sampler are fixed at construction. The texture is the only
/// thing that changes, through [`set_image`](Self::set_image).
///
/// The renderer keeps no reference to the surface it draws into; the owner
/// passes its [`Gpu`] to every [`render`](Self::render) call.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    texels: TexelEncoding,

    pipeline: QuadPipeline,

    texture: QuadTexture,
    bind_group: wgpu::BindGroup,
    image_name: String,
}

impl Renderer {
    /// Builds the pipeline for `gpu`'s surface and loads `image_name` from
    /// `bundle` as the initial texture.
    ///
    /// The device and queue are shared with `gpu`; wgpu handles are
    /// reference counted.
    ///
    /// Fails if the initial image cannot be resolved, decoded or uploaded, or
    /// if the GPU rejects the pipeline.
    pub fn new(gpu: &Gpu<'_>, image_name: &str, bundle: &Bundle) -> Result<Self> {
        Self::from_device(
            gpu.device().clone(),
            gpu.queue().clone(),
            gpu.surface_format(),
            gpu.alpha_mode(),
            image_name,
            bundle,
        )
    }

    /// Like [`new`](Self::new) for a device that is not tied to a window yet.
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        alpha_mode: wgpu::CompositeAlphaMode,
        image_name: &str,
        bundle: &Bundle,
    ) -> Result<Self> {
        let texels = TexelEncoding {
            format: QuadTexture::texel_format(surface_format),
            premultiplied: QuadTexture::premultiplied_for(alpha_mode),
        };

        let texture = capture_errors(&device, "initial texture upload", || {
            load_texture(&device, &queue, texels, image_name, bundle)
        })
        .with_context(|| format!("failed to load initial image `{image_name}`"))?;

        let (pipeline, bind_group) = capture_errors(&device, "pipeline creation", || {
            let pipeline = QuadPipeline::new(&device, surface_format);
            let bind_group = pipeline.bind(&device, &texture);
            Ok((pipeline, bind_group))
        })?;

        log::info!(
            "renderer ready: `{image_name}` {}x{} on {surface_format:?}",
            texture.size().0,
            texture.size().1
        );

        Ok(Self {
            device,
            queue,
            texels,
            pipeline,
            texture,
            bind_group,
            image_name: image_name.to_string(),
        })
    }

    /// Name of the image currently bound.
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// Pixel size of the image currently bound.
    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.size()
    }

    /// Replaces the bound texture with `name` from `bundle`.
    ///
    /// Returns `true` when the texture was swapped; the caller is expected to
    /// redraw. On failure (including a GPU-side upload error) the current
    /// texture stays bound and a warning is logged.
    pub fn set_image(&mut self, name: &str, bundle: &Bundle) -> bool {
        let swapped = capture_errors(&self.device, "texture upload", || {
            let texture = load_texture(&self.device, &self.queue, self.texels, name, bundle)?;
            let bind_group = self.pipeline.bind(&self.device, &texture);
            Ok((texture, bind_group))
        });

        let (texture, bind_group) = match swapped {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("keeping `{}`: {err:#}", self.image_name);
                return false;
            }
        };

        self.bind_group = bind_group;
        self.texture = texture;
        self.image_name = name.to_string();

        log::debug!(
            "image set to `{name}` ({}x{})",
            self.texture.size().0,
            self.texture.size().1
        );
        true
    }

    /// Draws one frame: clear to transparent, one aspect-fitted quad, present.
    ///
    /// Frames that cannot be acquired or have no drawable area are skipped.
    pub fn render(&self, gpu: &mut Gpu<'_>) -> DrawOutcome {
        let Some(vertices) = aspect_fit_quad(self.texture.size(), Viewport::from(gpu.size())) else {
            return DrawOutcome::Skipped;
        };

        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("frame skipped: {err}");
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => DrawOutcome::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        DrawOutcome::Skipped
                    }
                };
            }
        };

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("texview quad vbo"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        // Pass is dropped before the encoder is moved into present().
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("texview quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(self.pipeline.pipeline());
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
            rpass.draw(0..vertices.len() as u32, 0..1);
        }

        gpu.present(frame);
        DrawOutcome::Presented
    }
}

/// How decoded pixels are stored for the drawable they end up in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct TexelEncoding {
    format: wgpu::TextureFormat,
    premultiplied: bool,
}

fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texels: TexelEncoding,
    name: &str,
    bundle: &Bundle,
) -> Result<QuadTexture> {
    let mut image = load_image(name, bundle)?;
    if texels.premultiplied {
        image.premultiply_alpha();
    }
    QuadTexture::upload(device, queue, &image, texels.format, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    /// Any adapter will do; machines without one skip the GPU-backed tests.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()
    }

    fn renderer(device: wgpu::Device, queue: wgpu::Queue, bundle: &Bundle) -> Renderer {
        Renderer::from_device(
            device,
            queue,
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::CompositeAlphaMode::PreMultiplied,
            "square",
            bundle,
        )
        .unwrap()
    }

    fn bundle() -> Bundle {
        Bundle::in_memory()
            .with_entry("square", png(16, 16))
            .with_entry("wide", png(32, 8))
            .with_entry("broken", b"not an image".to_vec())
    }

    #[test]
    fn unresolvable_initial_image_yields_no_renderer() {
        let Some((device, queue)) = headless_device() else { return };
        let result = Renderer::from_device(
            device,
            queue,
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::CompositeAlphaMode::PreMultiplied,
            "missing",
            &bundle(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn set_image_swaps_texture() {
        let Some((device, queue)) = headless_device() else { return };
        let bundle = bundle();
        let mut r = renderer(device, queue, &bundle);
        assert_eq!(r.texture_size(), (16, 16));

        assert!(r.set_image("wide", &bundle));
        assert_eq!(r.image_name(), "wide");
        assert_eq!(r.texture_size(), (32, 8));
    }

    #[test]
    fn failed_set_image_keeps_previous_texture() {
        let Some((device, queue)) = headless_device() else { return };
        let bundle = bundle();
        let mut r = renderer(device, queue, &bundle);

        assert!(!r.set_image("missing", &bundle));
        assert!(!r.set_image("broken", &bundle));
        assert!(!r.set_image("", &bundle));

        assert_eq!(r.image_name(), "square");
        assert_eq!(r.texture_size(), (16, 16));
    }

    #[test]
    fn rejected_pipeline_yields_no_renderer() {
        let Some((device, queue)) = headless_device() else { return };
        // A depth format cannot be a color target, so pipeline creation fails
        // validation; that must surface as an error, not a panic.
        let result = Renderer::from_device(
            device,
            queue,
            wgpu::TextureFormat::Depth32Float,
            wgpu::CompositeAlphaMode::Opaque,
            "square",
            &bundle(),
        );
        assert!(result.is_err());
    }
}
