//! Framework-agnostic render-target texture abstraction.

use crate::error::VistaError;

/// A render-target texture and its default view.
///
/// Used for the camera's offscreen color/depth buffers and for the
/// multiframe accumulation target. Creation validates the requested size
/// against the device limits so allocation failures surface as
/// [`VistaError::TargetCreation`] instead of a device validation panic.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Texel format.
    pub format: wgpu::TextureFormat,
}

impl RenderTarget {
    /// Color target usage: renderable, sampleable and copyable.
    pub const COLOR_USAGE: wgpu::TextureUsages =
        wgpu::TextureUsages::RENDER_ATTACHMENT
            .union(wgpu::TextureUsages::TEXTURE_BINDING)
            .union(wgpu::TextureUsages::COPY_SRC);

    /// Create a new render-target texture with the given dimensions, format
    /// and usage.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::TargetCreation`] when either dimension is zero
    /// or exceeds `max_texture_dimension_2d`, or when the format does not
    /// support the requested usage on this device.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Result<Self, VistaError> {
        let fail = |reason: String| VistaError::TargetCreation {
            width,
            height,
            reason,
        };
        if width == 0 || height == 0 {
            return Err(fail("zero-sized target".into()));
        }
        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(fail(format!("exceeds device limit of {max}")));
        }
        let supported = format
            .guaranteed_format_features(device.features())
            .allowed_usages;
        if !supported.contains(usage) {
            return Err(fail(format!("{format:?} does not support {usage:?}")));
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("created {label} target {width}x{height} ({format:?})");
        Ok(Self {
            texture,
            view,
            format,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}

/// Pick the highest-precision color format the device can render to and
/// blend into: `Rgba16Float`, then `Rgba32Float`, then `Rgba8Unorm`.
#[must_use]
pub fn choose_accumulation_format(
    features: wgpu::Features,
) -> wgpu::TextureFormat {
    let blendable = |format: wgpu::TextureFormat| {
        let caps = format.guaranteed_format_features(features);
        caps.allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
            && caps
                .flags
                .contains(wgpu::TextureFormatFeatureFlags::BLENDABLE)
    };
    [
        wgpu::TextureFormat::Rgba16Float,
        wgpu::TextureFormat::Rgba32Float,
    ]
    .into_iter()
    .find(|&format| blendable(format))
    .unwrap_or(wgpu::TextureFormat::Rgba8Unorm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_float_preferred_when_blendable() {
        assert_eq!(
            choose_accumulation_format(wgpu::Features::empty()),
            wgpu::TextureFormat::Rgba16Float
        );
    }
}
