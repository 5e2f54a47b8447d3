use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the surface format: the preferred one when supported, otherwise the
/// first non-sRGB format, otherwise whatever the surface lists first.
///
/// Non-sRGB is favored because image texels are uploaded without conversion
/// and sampled straight through to the drawable.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    preferred: wgpu::TextureFormat,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.contains(&preferred) {
        return Some(preferred);
    }

    caps.formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    opaque: bool,
) -> wgpu::CompositeAlphaMode {
    let preferred: &[wgpu::CompositeAlphaMode] = if opaque {
        &[wgpu::CompositeAlphaMode::Opaque]
    } else {
        &[
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::Inherit,
        ]
    };

    preferred
        .iter()
        .copied()
        .find(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// wgpu does not support configuring a surface with a 0x0 size; in that case
/// only the tracked size changes and configuration is deferred.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::{CompositeAlphaMode as Alpha, TextureFormat as Format};

    fn caps(formats: Vec<Format>, alpha_modes: Vec<Alpha>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes,
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn preferred_format_wins_when_supported() {
        let c = caps(vec![Format::Bgra8UnormSrgb, Format::Bgra8Unorm], vec![]);
        assert_eq!(choose_surface_format(&c, Format::Bgra8Unorm), Some(Format::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_linear_format() {
        let c = caps(vec![Format::Rgba8UnormSrgb, Format::Rgba8Unorm], vec![]);
        assert_eq!(choose_surface_format(&c, Format::Bgra8Unorm), Some(Format::Rgba8Unorm));
    }

    #[test]
    fn srgb_only_surface_still_yields_a_format() {
        let c = caps(vec![Format::Bgra8UnormSrgb], vec![]);
        assert_eq!(choose_surface_format(&c, Format::Bgra8Unorm), Some(Format::Bgra8UnormSrgb));
    }

    #[test]
    fn no_formats_means_no_surface() {
        let c = caps(vec![], vec![]);
        assert_eq!(choose_surface_format(&c, Format::Bgra8Unorm), None);
    }

    // ── alpha ─────────────────────────────────────────────────────────────

    #[test]
    fn transparent_surface_prefers_premultiplied() {
        let c = caps(vec![], vec![Alpha::Opaque, Alpha::PostMultiplied, Alpha::PreMultiplied]);
        assert_eq!(choose_alpha_mode(&c, false), Alpha::PreMultiplied);
    }

    #[test]
    fn transparent_surface_falls_back_to_listed_mode() {
        let c = caps(vec![], vec![Alpha::Opaque]);
        assert_eq!(choose_alpha_mode(&c, false), Alpha::Opaque);
    }

    #[test]
    fn opaque_surface_picks_opaque() {
        let c = caps(vec![], vec![Alpha::PreMultiplied, Alpha::Opaque]);
        assert_eq!(choose_alpha_mode(&c, true), Alpha::Opaque);
    }

    #[test]
    fn empty_alpha_list_is_auto() {
        let c = caps(vec![], vec![]);
        assert_eq!(choose_alpha_mode(&c, false), Alpha::Auto);
    }
}
