use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the first format matching the sRGB preference, else the surface's first format.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    caps.formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Size to configure a fresh surface with. wgpu rejects zero extents, so each side is at least 1.
pub(crate) fn configurable_extent(size: PhysicalSize<u32>) -> (u32, u32) {
    (size.width.max(1), size.height.max(1))
}

/// Updates the stored size and reconfigures the surface.
///
/// wgpu rejects 0×0 configurations (minimized window); those only update `size`.
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

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    fn caps(formats: &[F]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn linear_preference_skips_srgb_formats() {
        let c = caps(&[F::Bgra8UnormSrgb, F::Bgra8Unorm]);
        assert_eq!(choose_surface_format(&c, false), Some(F::Bgra8Unorm));
        assert_eq!(choose_surface_format(&c, true), Some(F::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        let c = caps(&[F::Rgba8UnormSrgb]);
        assert_eq!(choose_surface_format(&c, false), Some(F::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let c = wgpu::SurfaceCapabilities {
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        };
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&caps(&[]), None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn unsized_window_still_configures() {
        assert_eq!(configurable_extent(PhysicalSize::new(0, 0)), (1, 1));
        assert_eq!(configurable_extent(PhysicalSize::new(0, 480)), (1, 480));
        assert_eq!(configurable_extent(PhysicalSize::new(640, 480)), (640, 480));
    }
}
