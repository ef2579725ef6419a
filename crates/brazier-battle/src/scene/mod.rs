//! The boss duel as a scene the host drives.
//!
//! [`BossScene`] owns the simulation, the renderer and the [`RenderSurface`]
//! it records into. The host forwards input, calls [`tick`](BossScene::tick)
//! on its fixed cadence, [`render`](BossScene::render)s when a redraw is
//! requested and polls [`take_outcome`](BossScene::take_outcome).

mod layout;
mod renderer;

use brazier_engine::coords::Viewport;
use brazier_engine::render::shader::{ShaderBackend, ShaderRegistry};
use brazier_engine::render::RenderSurface;
use glam::Vec2;

use crate::config::BattleConfig;
use crate::simulation::{Action, BattleSimulation, Outcome};

pub use layout::{HealthBarLayout, SceneLayout};
pub use renderer::{health_color, SceneRenderer, SceneTexture, SceneTextures};

pub struct BossScene {
    sim: BattleSimulation,
    renderer: SceneRenderer,
    surface: RenderSurface,
    textures: SceneTextures,
}

impl BossScene {
    pub fn new(config: BattleConfig, layout: SceneLayout, viewport: Viewport) -> Self {
        let mut scene = Self {
            sim: BattleSimulation::new(config),
            renderer: SceneRenderer::new(layout),
            surface: RenderSurface::new(viewport),
            textures: SceneTextures::default(),
        };
        scene.surface.set_zoom(1.0);
        scene.follow_player();
        scene
    }

    /// See [`BattleSimulation::set_level`].
    pub fn set_level(&mut self, level: i32) {
        self.sim.set_level(level);
        self.surface.request_redraw();
    }

    /// Starts over at `level` with both combatants rebuilt.
    pub fn reset(&mut self, level: i32) {
        self.sim.reset(level);
        self.follow_player();
    }

    pub fn set_textures(&mut self, textures: SceneTextures) {
        self.textures = textures;
        self.surface.request_redraw();
    }

    pub fn textures(&self) -> &SceneTextures {
        &self.textures
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    pub fn on_input(&mut self, action: Action, pressed: bool) {
        self.sim.on_input(action, pressed);
        // Attack boxes appear on press, before the next tick.
        if action == Action::Attack {
            self.surface.request_redraw();
        }
    }

    pub fn release_all(&mut self) {
        self.sim.release_all();
        self.surface.request_redraw();
    }

    /// Advances one step; the camera follows the player. Returns `false` once the battle is over.
    pub fn tick(&mut self) -> bool {
        if !self.sim.tick() {
            return false;
        }
        self.follow_player();
        true
    }

    /// Re-records the frame's draws onto the surface.
    pub fn render<B: ShaderBackend>(&mut self, shaders: &ShaderRegistry<B>) -> &RenderSurface {
        self.surface.begin_frame();
        self.renderer
            .render(&mut self.surface, shaders, &self.sim, &self.textures);
        &self.surface
    }

    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.sim.take_outcome()
    }

    pub fn take_redraw_request(&mut self) -> bool {
        self.surface.take_redraw_request()
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut RenderSurface {
        &mut self.surface
    }

    pub fn simulation(&self) -> &BattleSimulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut BattleSimulation {
        &mut self.sim
    }

    fn follow_player(&mut self) {
        let p = self.sim.player().position;
        self.surface.set_camera(Vec2::new(p.x, p.y * 0.5));
    }
}
