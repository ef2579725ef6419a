use brazier_engine::render::shader::{ShaderBackend, ShaderRegistry};
use brazier_engine::render::{RenderSurface, TextureHandle};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::BattleConfig;
use crate::entity::{Character, HitboxKind, Side};
use crate::simulation::BattleSimulation;

use super::layout::SceneLayout;

const PLAYER_ATTACK_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const BOSS_ATTACK_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.0);
const HURT_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const HITBOX_ALPHA: f32 = 0.5;
const STATUS_SIZE: f32 = 0.3;
const STATUS_ALPHA: f32 = 0.7;

/// An uploaded texture plus the source image's width / height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneTexture {
    pub handle: TextureHandle,
    pub aspect: f32,
}

/// Textures the scene can use. Absent ones skip the props that need them.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SceneTextures {
    pub ground: Option<SceneTexture>,
    pub wall: Option<SceneTexture>,
    pub brazier: Option<SceneTexture>,
}

/// Records the duel scene onto a [`RenderSurface`], back to front.
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    layout: SceneLayout,
}

impl SceneRenderer {
    pub fn new(layout: SceneLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn render<B: ShaderBackend>(
        &self,
        surface: &mut RenderSurface,
        shaders: &ShaderRegistry<B>,
        sim: &BattleSimulation,
        textures: &SceneTextures,
    ) {
        let camera = surface.camera().position;
        let mut pass = Pass {
            surface,
            shaders,
            layout: &self.layout,
            config: sim.config(),
            camera,
        };

        pass.background(sim);
        pass.midground(textures.wall);
        pass.foreground(textures.brazier);
        pass.ground(textures.ground);
        pass.bones(sim.player());
        pass.bones(sim.boss());
        pass.statuses(sim.player());
        pass.statuses(sim.boss());
        if sim.is_active() {
            pass.hitboxes(sim.player());
            pass.hitboxes(sim.boss());
        }
        pass.health_bars(sim.player(), sim.boss());
    }
}

/// Borrowed state for one `render` call.
struct Pass<'a, B: ShaderBackend> {
    surface: &'a mut RenderSurface,
    shaders: &'a ShaderRegistry<B>,
    layout: &'a SceneLayout,
    config: &'a BattleConfig,
    camera: Vec2,
}

impl<B: ShaderBackend> Pass<'_, B> {
    fn colored(&mut self, model: Mat4, rgb: Vec3, alpha: f32) {
        self.surface.draw_colored_quad(self.shaders, model, rgb, alpha);
    }

    fn textured(&mut self, model: Mat4, texture: TextureHandle) {
        self.surface.draw_textured_quad(self.shaders, model, texture, Vec4::ONE);
    }

    fn background(&mut self, sim: &BattleSimulation) {
        if !self.layout.background_enabled {
            return;
        }
        let size = self.layout.layer_size;
        for (i, (offset, color)) in sim.layer_offsets().iter().zip(self.layout.layer_colors).enumerate() {
            let depth = (i + 1) as f32;
            let at = *offset + self.camera * Vec2::new(0.2 * depth, 0.1 * depth);
            self.colored(rect(at, size), color.to_vec3(), 1.0);
        }
    }

    fn midground(&mut self, wall: Option<SceneTexture>) {
        let Some(wall) = wall else { return };
        let width = self.config.ground_width * self.layout.wall_width_factor;
        let height = width / wall.aspect;
        let base_y = self.config.ground_level + height * 0.5 - 0.5;

        let at = Vec2::new(0.0, base_y) + self.camera * self.layout.wall_parallax;
        self.textured(rect(at, Vec2::new(width, height)), wall.handle);
    }

    fn foreground(&mut self, brazier: Option<SceneTexture>) {
        let Some(brazier) = brazier else { return };
        let layout = self.layout;
        let size = Vec2::new(layout.brazier_width, layout.brazier_width / brazier.aspect);
        let parallax = layout.brazier_parallax;

        for &x in &layout.brazier_xs {
            let at = Vec2::new(
                x - self.camera.x * parallax.x,
                self.config.ground_level + self.camera.y * parallax.y,
            );
            self.textured(rect(at, size), brazier.handle);
        }
    }

    fn ground(&mut self, ground: Option<SceneTexture>) {
        let Some(ground) = ground else { return };
        let thickness = self.layout.ground_thickness;
        let at = Vec2::new(self.camera.x, self.config.ground_level - thickness);
        self.textured(rect(at, Vec2::new(self.config.ground_width, thickness)), ground.handle);
    }

    fn bones(&mut self, character: &Character) {
        let color = match character.side {
            Side::Player => self.layout.player_color,
            Side::Boss => self.layout.boss_color,
        }
        .to_vec3();

        for (_, bone) in character.skeleton.iter().filter(|(_, b)| !b.is_root()) {
            let mut model = Mat4::from_translation((character.position + bone.position).extend(0.0));
            if !character.facing_right {
                model *= Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
            }
            model *= Mat4::from_rotation_z(bone.rotation);
            model *= Mat4::from_scale((bone.scale * 0.5).extend(1.0));

            self.colored(model, color, 1.0);
        }
    }

    fn statuses(&mut self, character: &Character) {
        for status in &character.statuses {
            let Some(bone) = character.skeleton.get(status.bone) else { continue };
            let model = Mat4::from_translation((character.position + bone.position).extend(0.0))
                * Mat4::from_rotation_z(bone.rotation)
                * Mat4::from_scale(Vec3::new(STATUS_SIZE, STATUS_SIZE, 1.0));
            self.colored(model, status.color, STATUS_ALPHA);
        }
    }

    fn hitboxes(&mut self, character: &Character) {
        for hitbox in &character.hitboxes {
            let color = match (character.side, hitbox.kind) {
                (Side::Player, HitboxKind::Attack) => PLAYER_ATTACK_COLOR,
                (Side::Boss, HitboxKind::Attack) => BOSS_ATTACK_COLOR,
                (Side::Boss, HitboxKind::Hurt) => HURT_COLOR,
                // Player hurtboxes are not shown.
                (Side::Player, HitboxKind::Hurt) => continue,
            };
            self.colored(rect(hitbox.center(character.position), hitbox.size()), color, HITBOX_ALPHA);
        }
    }

    fn health_bars(&mut self, player: &Character, boss: &Character) {
        let bar = &self.layout.health_bar;
        let (inset, offset_y, width) = (bar.inset_x, bar.offset_y, bar.width);
        let (back_h, fill_h, back) = (bar.back_height, bar.fill_height, bar.back_color.to_vec3());

        for (character, side_sign) in [(player, -1.0), (boss, 1.0)] {
            let center = self.camera + Vec2::new(side_sign * inset, offset_y);
            self.colored(rect(center, Vec2::new(width, back_h)), back, 1.0);

            // Fill shrinks toward the bar's left edge.
            let r = character.health_ratio();
            let fill_center = Vec2::new(center.x - width * 0.5 * (1.0 - r), center.y);
            self.colored(
                rect(fill_center, Vec2::new(width * r, fill_h)),
                health_color(r),
                1.0,
            );
        }
    }
}

/// Unit quad placed at `center` and stretched to `size`.
fn rect(center: Vec2, size: Vec2) -> Mat4 {
    Mat4::from_translation(center.extend(0.0)) * Mat4::from_scale(size.extend(1.0))
}

/// Red at empty, green at full.
pub fn health_color(ratio: f32) -> Vec3 {
    let r = ratio.clamp(0.0, 1.0);
    Vec3::new(1.0 - r, r, 0.0)
}
