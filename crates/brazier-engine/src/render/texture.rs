//! CPU images and their GPU counterparts.

use anyhow::{ensure, Result};

use crate::render::quad::QuadLayouts;

/// Tightly packed 8-bit RGBA pixels, row-major from the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "image must not be empty ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        ensure!(
            pixels.len() == expected,
            "{width}x{height} image needs {expected} bytes, got {}",
            pixels.len()
        );
        Ok(Self { width, height, pixels })
    }

    /// Image filled with one color. Zero dimensions are bumped to 1.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let pixels = rgba.repeat(width as usize * height as usize);
        Self { width, height, pixels }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether both sides are within `max_dim` (a device's `max_texture_dimension_2d`).
    pub fn fits(&self, max_dim: u32) -> bool {
        self.width <= max_dim && self.height <= max_dim
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Overwrites one pixel. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Opaque reference to a texture in a [`TextureStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Builds a handle from a raw slot index. Only meaningful for the store that issued it.
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

struct Slot {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// GPU textures bound through the quad texture layout.
///
/// All textures share one linear sampler with repeat addressing.
pub struct TextureStore {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    slots: Vec<Option<Slot>>,
    fallback: Slot,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, layouts: &QuadLayouts) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("brazier linear repeat sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = RgbaImage::solid(1, 1, [255; 4]);
        let fallback = create_slot(device, queue, &layouts.texture, &sampler, &white, "brazier white texture");

        Self {
            device: device.clone(),
            queue: queue.clone(),
            layout: layouts.texture.clone(),
            sampler,
            slots: Vec::new(),
            fallback,
        }
    }

    /// Uploads `image` into a free slot.
    ///
    /// Images larger than the device's 2D texture limit are rejected.
    pub fn upload(&mut self, label: &str, image: &RgbaImage) -> Result<TextureHandle> {
        let max_dim = self.device.limits().max_texture_dimension_2d;
        ensure!(
            image.fits(max_dim),
            "texture `{label}` is {}x{}, device limit is {max_dim}",
            image.width(),
            image.height()
        );

        let slot = create_slot(&self.device, &self.queue, &self.layout, &self.sampler, image, label);
        log::debug!("uploaded texture `{label}` ({}x{})", image.width(), image.height());
        Ok(TextureHandle(claim_slot(&mut self.slots, slot) as u32))
    }

    /// Frees the texture. Later lookups of `handle` return `None`.
    pub fn release(&mut self, handle: TextureHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index()).and_then(Option::take) {
            slot.texture.destroy();
        }
    }

    pub fn bind_group(&self, handle: TextureHandle) -> Option<&wgpu::BindGroup> {
        self.slot(handle).map(|s| &s.bind_group)
    }

    /// 1×1 white texture bound for untextured draws.
    pub fn fallback_bind_group(&self) -> &wgpu::BindGroup {
        &self.fallback.bind_group
    }

    pub fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.slot(handle).map(|s| s.size)
    }

    fn slot(&self, handle: TextureHandle) -> Option<&Slot> {
        self.slots.get(handle.index()).and_then(Option::as_ref)
    }
}

impl Drop for TextureStore {
    fn drop(&mut self) {
        for slot in self.slots.iter().flatten() {
            slot.texture.destroy();
        }
        self.fallback.texture.destroy();
    }
}

/// Stores `item` in the first free slot, growing the list when none is free.
fn claim_slot<T>(slots: &mut Vec<Option<T>>, item: T) -> usize {
    if let Some(i) = slots.iter().position(Option::is_none) {
        slots[i] = Some(item);
        return i;
    }
    slots.push(Some(item));
    slots.len() - 1
}

fn create_slot(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &RgbaImage,
    label: &str,
) -> Slot {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
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
            bytes_per_row: Some(image.width() * 4),
            rows_per_image: Some(image.height()),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    Slot {
        texture,
        bind_group,
        size: (image.width(), image.height()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── images ──────────────────────────────────────────────────────────

    #[test]
    fn new_rejects_wrong_length() {
        assert!(RgbaImage::new(2, 2, vec![0; 15]).is_err());
        assert!(RgbaImage::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn new_rejects_empty() {
        assert!(RgbaImage::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn solid_fills_every_pixel() {
        let img = RgbaImage::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.pixels().len(), 24);
        assert_eq!(img.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut img = RgbaImage::solid(2, 2, [0; 4]);
        img.put_pixel(1, 1, [9, 9, 9, 9]);
        img.put_pixel(2, 0, [7; 4]);
        assert_eq!(img.pixel(1, 1), Some([9, 9, 9, 9]));
        assert_eq!(img.pixels().iter().filter(|&&b| b == 7).count(), 0);
    }

    #[test]
    fn fits_checks_both_sides() {
        let wide = RgbaImage::solid(8193, 4, [0; 4]);
        assert!(!wide.fits(8192));
        assert!(wide.fits(8193));

        let tall = RgbaImage::solid(4, 300, [0; 4]);
        assert!(!tall.fits(256));
        assert!(RgbaImage::solid(256, 256, [0; 4]).fits(256));
    }

    // ── slots ───────────────────────────────────────────────────────────

    #[test]
    fn released_slot_is_reused_first() {
        let mut slots: Vec<Option<&str>> = Vec::new();
        assert_eq!(claim_slot(&mut slots, "ground"), 0);
        assert_eq!(claim_slot(&mut slots, "wall"), 1);
        assert_eq!(claim_slot(&mut slots, "brazier"), 2);

        slots[1].take();
        assert_eq!(claim_slot(&mut slots, "banner"), 1);
        assert_eq!(claim_slot(&mut slots, "torch"), 3);
        assert_eq!(slots[1], Some("banner"));
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        let img = RgbaImage::solid(512, 128, [0; 4]);
        assert_eq!(img.aspect_ratio(), 4.0);
    }
}
