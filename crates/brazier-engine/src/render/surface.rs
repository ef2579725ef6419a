//! World-space drawing surface: camera, projection and the per-frame quad list.
//!
//! World units: the visible height is `10 / zoom` units, +Y up. The surface only
//! records draws; [`QuadPass`](crate::render::QuadPass) turns them into GPU work.

use std::collections::HashSet;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::coords::Viewport;
use crate::render::shader::{Preset, ProgramId, ShaderBackend, ShaderRegistry};
use crate::render::texture::TextureHandle;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// World units visible vertically at zoom 1.
pub const VISIBLE_HEIGHT: f32 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    /// Always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

/// Per-draw uniform values, filled by the caller's setup callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformSet {
    pub color: Vec3,
    pub alpha: f32,
    pub tint: Vec4,
    pub texture: Option<TextureHandle>,
    pub time: f32,
    pub outline_size: f32,
}

impl Default for UniformSet {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            alpha: 1.0,
            tint: Vec4::ONE,
            texture: None,
            time: 0.0,
            outline_size: 0.0,
        }
    }
}

impl UniformSet {
    pub fn set_color(&mut self, rgb: Vec3) -> &mut Self {
        self.color = rgb;
        self
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = alpha;
        self
    }

    pub fn set_tint(&mut self, tint: Vec4) -> &mut Self {
        self.tint = tint;
        self
    }

    pub fn set_texture(&mut self, texture: TextureHandle) -> &mut Self {
        self.texture = Some(texture);
        self
    }

    pub fn set_time(&mut self, seconds: f32) -> &mut Self {
        self.time = seconds;
        self
    }

    pub fn set_outline_size(&mut self, size: f32) -> &mut Self {
        self.outline_size = size;
        self
    }
}

/// One recorded unit-quad draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadDraw {
    pub program: ProgramId,
    pub model: Mat4,
    pub uniforms: UniformSet,
}

pub struct RenderSurface {
    viewport: Viewport,
    aspect: f32,
    camera: Camera2D,

    projection: Mat4,
    view: Mat4,

    redraw_requested: bool,
    draws: Vec<QuadDraw>,
    warned_missing: HashSet<String>,
}

impl RenderSurface {
    pub fn new(viewport: Viewport) -> Self {
        let mut surface = Self {
            viewport,
            aspect: viewport.aspect_ratio(),
            camera: Camera2D::default(),
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            redraw_requested: true,
            draws: Vec::new(),
            warned_missing: HashSet::new(),
        };
        surface.update_matrices();
        surface
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.aspect = self.viewport.aspect_ratio();
        self.update_matrices();
        self.redraw_requested = true;
    }

    pub fn set_camera(&mut self, position: Vec2) {
        self.camera.position = position;
        self.update_matrices();
        self.redraw_requested = true;
    }

    /// Sets the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN resets to 1.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.camera.zoom = if zoom.is_nan() { 1.0 } else { zoom.clamp(MIN_ZOOM, MAX_ZOOM) };
        self.update_matrices();
        self.redraw_requested = true;
    }

    #[inline]
    pub fn camera(&self) -> Camera2D {
        self.camera
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// World-space (width, height) visible through the camera.
    pub fn visible_extent(&self) -> Vec2 {
        let height = VISIBLE_HEIGHT / self.camera.zoom;
        Vec2::new(height * self.aspect, height)
    }

    /// Returns whether a redraw was requested since the last call, and clears it.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Drops last frame's draws.
    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }

    /// Draws recorded since [`begin_frame`](Self::begin_frame), back to front.
    #[inline]
    pub fn draws(&self) -> &[QuadDraw] {
        &self.draws
    }

    /// Records a unit quad drawn with program `name`.
    ///
    /// `setup` fills the per-draw uniforms. Returns `false` (and records
    /// nothing) when no program is registered under `name`; this is logged
    /// once per name.
    pub fn draw_quad<B, F>(&mut self, shaders: &ShaderRegistry<B>, name: &str, model: Mat4, setup: F) -> bool
    where
        B: ShaderBackend,
        F: FnOnce(&mut UniformSet),
    {
        let Some(program) = shaders.resolve(name) else {
            if self.warned_missing.insert(name.to_owned()) {
                log::warn!("shader `{name}` is not registered; draws using it are skipped");
            }
            return false;
        };

        let mut uniforms = UniformSet::default();
        setup(&mut uniforms);
        self.draws.push(QuadDraw { program, model, uniforms });
        true
    }

    /// Flat-colored quad with the `simple` preset.
    pub fn draw_colored_quad<B: ShaderBackend>(
        &mut self,
        shaders: &ShaderRegistry<B>,
        model: Mat4,
        rgb: Vec3,
        alpha: f32,
    ) -> bool {
        self.draw_colored_quad_with(shaders, Preset::SimpleColor.name(), model, rgb, alpha)
    }

    /// Flat-colored quad drawn with program `name` (`color` and `alpha` set).
    pub fn draw_colored_quad_with<B: ShaderBackend>(
        &mut self,
        shaders: &ShaderRegistry<B>,
        name: &str,
        model: Mat4,
        rgb: Vec3,
        alpha: f32,
    ) -> bool {
        self.draw_quad(shaders, name, model, |u| {
            u.set_color(rgb).set_alpha(alpha);
        })
    }

    /// Textured quad with the `texture` preset; `tint` multiplies the sampled texel.
    pub fn draw_textured_quad<B: ShaderBackend>(
        &mut self,
        shaders: &ShaderRegistry<B>,
        model: Mat4,
        texture: TextureHandle,
        tint: Vec4,
    ) -> bool {
        self.draw_textured_quad_with(shaders, Preset::Texture.name(), model, texture, tint)
    }

    pub fn draw_textured_quad_with<B: ShaderBackend>(
        &mut self,
        shaders: &ShaderRegistry<B>,
        name: &str,
        model: Mat4,
        texture: TextureHandle,
        tint: Vec4,
    ) -> bool {
        self.draw_quad(shaders, name, model, |u| {
            u.set_texture(texture).set_tint(tint);
        })
    }

    fn update_matrices(&mut self) {
        let extent = self.visible_extent();
        let (hw, hh) = (extent.x * 0.5, extent.y * 0.5);
        self.projection = Mat4::orthographic_rh(-hw, hw, -hh, hh, -1.0, 1.0);
        self.view = Mat4::from_translation(-self.camera.position.extend(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::ValidatingBackend;
    use approx::assert_relative_eq;

    fn surface() -> RenderSurface {
        RenderSurface::new(Viewport::new(800, 600))
    }

    fn presets() -> ShaderRegistry<ValidatingBackend> {
        let mut reg = ShaderRegistry::new(ValidatingBackend);
        reg.load_presets();
        reg
    }

    // ── camera ────────────────────────────────────────────────────────────

    #[test]
    fn zoom_is_clamped() {
        let mut s = surface();
        for z in [-5.0, 0.0, 0.05, 0.1, 1.0, 3.5, 10.0, 11.0, f32::INFINITY] {
            s.set_zoom(z);
            let zoom = s.camera().zoom;
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom), "{z} -> {zoom}");
        }
        s.set_zoom(0.01);
        assert_eq!(s.camera().zoom, MIN_ZOOM);
        s.set_zoom(100.0);
        assert_eq!(s.camera().zoom, MAX_ZOOM);
    }

    #[test]
    fn zoom_never_decreases_as_input_grows() {
        let mut s = surface();
        let mut last = f32::NEG_INFINITY;
        for i in 0..2000 {
            let z = -1.0 + i as f32 * 0.01;
            s.set_zoom(z);
            let zoom = s.camera().zoom;
            assert!(zoom >= last, "{z} -> {zoom} after {last}");
            last = zoom;
        }
        assert_eq!(last, MAX_ZOOM);
    }

    #[test]
    fn zooming_in_shrinks_visible_extent() {
        let mut s = surface();
        s.set_zoom(1.0);
        let wide = s.visible_extent();
        s.set_zoom(2.0);
        let narrow = s.visible_extent();

        assert_relative_eq!(narrow.x, wide.x / 2.0);
        assert_relative_eq!(narrow.y, wide.y / 2.0);
    }

    #[test]
    fn visible_extent_follows_aspect() {
        let s = surface();
        let e = s.visible_extent();
        assert_relative_eq!(e.y, 10.0);
        assert_relative_eq!(e.x, 10.0 * 800.0 / 600.0);
    }

    #[test]
    fn camera_position_maps_to_ndc_origin() {
        let mut s = surface();
        s.set_camera(Vec2::new(3.0, -1.5));

        let ndc = s.view_projection().project_point3(Vec3::new(3.0, -1.5, 0.0));
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn visible_corner_maps_to_ndc_corner() {
        let mut s = surface();
        s.set_camera(Vec2::new(2.0, 1.0));
        let half = s.visible_extent() * 0.5;

        let corner = Vec3::new(2.0 + half.x, 1.0 + half.y, 0.0);
        let ndc = s.view_projection().project_point3(corner);
        assert_relative_eq!(ndc.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_height_resize_is_tolerated() {
        let mut s = surface();
        s.resize(640, 0);
        assert_eq!(s.aspect_ratio(), 1.0);
        assert!(s.projection().is_finite());
    }

    // ── redraw ────────────────────────────────────────────────────────────

    #[test]
    fn camera_changes_request_redraw_once() {
        let mut s = surface();
        s.take_redraw_request();

        s.set_camera(Vec2::ONE);
        assert!(s.take_redraw_request());
        assert!(!s.take_redraw_request());

        s.set_zoom(2.0);
        assert!(s.take_redraw_request());
    }

    // ── draws ─────────────────────────────────────────────────────────────

    #[test]
    fn missing_shader_skips_draw() {
        let mut s = surface();
        let empty = ShaderRegistry::new(ValidatingBackend);

        assert!(!s.draw_colored_quad(&empty, Mat4::IDENTITY, Vec3::ONE, 1.0));
        assert!(!s.draw_quad(&empty, "glow", Mat4::IDENTITY, |_| {}));
        assert!(s.draws().is_empty());
    }

    #[test]
    fn draws_are_recorded_in_order_with_uniforms() {
        let mut s = surface();
        let reg = presets();

        s.draw_colored_quad(&reg, Mat4::IDENTITY, Vec3::new(1.0, 0.0, 0.0), 0.5);
        s.draw_textured_quad(&reg, Mat4::IDENTITY, TextureHandle::from_raw(3), Vec4::new(0.4, 0.6, 1.0, 1.0));

        let draws = s.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(Some(draws[0].program), reg.resolve("simple"));
        assert_eq!(draws[0].uniforms.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(draws[0].uniforms.alpha, 0.5);
        assert_eq!(Some(draws[1].program), reg.resolve("texture"));
        assert_eq!(draws[1].uniforms.texture, Some(TextureHandle::from_raw(3)));

        s.begin_frame();
        assert!(s.draws().is_empty());
    }

    #[test]
    fn named_variants_apply_the_same_uniforms() {
        let mut s = surface();
        let reg = presets();

        assert!(s.draw_colored_quad_with(&reg, "outline", Mat4::IDENTITY, Vec3::new(0.0, 1.0, 0.0), 0.25));
        assert!(s.draw_textured_quad_with(&reg, "particle", Mat4::IDENTITY, TextureHandle::from_raw(1), Vec4::ONE));
        assert!(!s.draw_colored_quad_with(&reg, "glow", Mat4::IDENTITY, Vec3::ONE, 1.0));

        let draws = s.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(Some(draws[0].program), reg.resolve("outline"));
        assert_eq!(draws[0].uniforms.color, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(draws[0].uniforms.alpha, 0.25);
        assert_eq!(Some(draws[1].program), reg.resolve("particle"));
        assert_eq!(draws[1].uniforms.texture, Some(TextureHandle::from_raw(1)));
    }

    #[test]
    fn effect_params_reach_the_uniform_block() {
        let mut s = surface();
        let reg = presets();

        s.draw_quad(&reg, "outline", Mat4::IDENTITY, |u| {
            u.set_time(1.5).set_outline_size(0.05);
        });

        let block = crate::render::quad::QuadUniforms::from_draw(&s.draws()[0], s.projection(), s.view());
        assert_eq!(block.params, [1.5, 0.05, 0.0, 0.0]);
    }
}
