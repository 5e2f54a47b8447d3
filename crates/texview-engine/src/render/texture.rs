use anyhow::Result;

use crate::assets::ImageData;

/// GPU copy of one decoded image, held through its view.
///
/// Immutable once uploaded; swapping images means building a new one and
/// dropping the old, which releases the GPU allocation.
pub struct QuadTexture {
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl QuadTexture {
    /// Texel format matching the drawable's encoding, so texels pass through
    /// the shader unchanged.
    pub fn texel_format(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
        if surface_format.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    /// Whether texels must be premultiplied before upload for a drawable
    /// composited with `alpha_mode`.
    ///
    /// The pipeline writes texels unblended, so the drawable gets exactly
    /// what the texture holds.
    pub fn premultiplied_for(alpha_mode: wgpu::CompositeAlphaMode) -> bool {
        alpha_mode == wgpu::CompositeAlphaMode::PreMultiplied
    }

    /// Creates a single-mip texture and uploads `image` into it.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &ImageData,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Result<Self> {
        let (width, height) = image.size();
        let max = device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max && height <= max,
            "image is {width}x{height}, device limit is {max}x{max}"
        );

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            view,
            size: (width, height),
        })
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_premultiplied_compositing_needs_premultiplied_texels() {
        use wgpu::CompositeAlphaMode as Alpha;

        assert!(QuadTexture::premultiplied_for(Alpha::PreMultiplied));
        assert!(!QuadTexture::premultiplied_for(Alpha::PostMultiplied));
        assert!(!QuadTexture::premultiplied_for(Alpha::Opaque));
        assert!(!QuadTexture::premultiplied_for(Alpha::Inherit));
    }

    #[test]
    fn texel_format_follows_surface_encoding() {
        assert_eq!(
            QuadTexture::texel_format(wgpu::TextureFormat::Bgra8Unorm),
            wgpu::TextureFormat::Rgba8Unorm
        );
        assert_eq!(
            QuadTexture::texel_format(wgpu::TextureFormat::Bgra8UnormSrgb),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
    }
}
