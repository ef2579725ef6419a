use brazier_battle::scene::SceneTexture;
use brazier_battle::textures::ground_image;
use brazier_battle::{BattleConfig, BossScene, Outcome, SceneLayout, SceneTextures};
use brazier_engine::coords::Viewport;
use brazier_engine::core::{App, AppControl, FrameCtx, InitCtx, TickCtx};
use brazier_engine::input::{InputEvent, InputState, KeyState};
use brazier_engine::paint::Color;
use brazier_engine::render::shader::{Preset, WgpuShaderBackend};
use brazier_engine::render::{QuadPass, RgbaImage, ShaderRegistry, TextureStore};

use crate::assets::{self, AssetPaths};
use crate::controls::{self, Command};

const CLEAR_COLOR: Color = Color::rgb(0.1, 0.1, 0.2);
const GROUND_SEED: u64 = 0x0b1a_2e;
const INITIAL_VIEWPORT: Viewport = Viewport::new(1280, 720);

pub fn window_title(level: i32, outcome: Option<Outcome>) -> String {
    match outcome {
        None => format!("Brazier | Level {level}"),
        Some(Outcome::Won) => format!("Brazier | Level {level} | Victory! Enter for the next boss"),
        Some(Outcome::Lost) => format!("Brazier | Level {level} | Defeated. Enter to retry"),
    }
}

/// Level the next battle starts at after `outcome` at `level`.
pub fn next_level(level: i32, outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Won => level.saturating_add(1),
        Outcome::Lost => level,
    }
}

struct GpuResources {
    shaders: ShaderRegistry<WgpuShaderBackend>,
    textures: TextureStore,
    quad_pass: QuadPass,
}

/// Hosts one [`BossScene`]: maps keys to actions, ticks the fight and draws it.
pub struct BattleApp {
    level: i32,
    outcome: Option<Outcome>,
    scene: BossScene,
    assets: AssetPaths,
    gpu: Option<GpuResources>,
    pending_title: Option<String>,
}

impl BattleApp {
    pub fn new(level: i32, config: BattleConfig, assets: AssetPaths) -> Self {
        let mut scene = BossScene::new(config, SceneLayout::default(), INITIAL_VIEWPORT);
        scene.set_level(level);
        Self {
            level,
            outcome: None,
            scene,
            assets,
            gpu: None,
            pending_title: None,
        }
    }

    /// Starts the next battle once the current one is decided.
    ///
    /// Returns `false` while the fight is still running.
    pub fn restart(&mut self) -> bool {
        let Some(outcome) = self.outcome.take() else {
            return false;
        };
        self.level = next_level(self.level, outcome);
        self.scene.reset(self.level);
        self.pending_title = Some(window_title(self.level, None));
        log::info!("battle started at level {}", self.level);
        true
    }

    fn finish(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => log::info!("boss defeated at level {}; press Enter to continue", self.level),
            Outcome::Lost => log::info!("player defeated at level {}; press Enter to retry", self.level),
        }
        self.outcome = Some(outcome);
        self.pending_title = Some(window_title(self.level, Some(outcome)));
    }
}

fn upload(store: &mut TextureStore, label: &str, image: &RgbaImage) -> anyhow::Result<SceneTexture> {
    Ok(SceneTexture {
        handle: store.upload(label, image)?,
        aspect: image.aspect_ratio(),
    })
}

/// Uploads an optional prop image; a failed upload is logged and the prop skipped.
fn upload_prop(store: &mut TextureStore, label: &str, image: Option<RgbaImage>) -> Option<SceneTexture> {
    let image = image?;
    match upload(store, label, &image) {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::warn!("{err:#}; prop skipped");
            None
        }
    }
}

impl App for BattleApp {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()> {
        let gpu = ctx.gpu;
        let backend = WgpuShaderBackend::new(gpu.device(), gpu.surface_format());
        let quad_pass = QuadPass::new(gpu.device(), backend.layouts());
        let mut textures = TextureStore::new(gpu.device(), gpu.queue(), backend.layouts());

        let mut shaders = ShaderRegistry::new(backend);
        let loaded = shaders.load_presets();
        for preset in [Preset::SimpleColor, Preset::Texture] {
            anyhow::ensure!(
                shaders.contains(preset.name()),
                "built-in `{}` shader failed to compile",
                preset.name()
            );
        }
        log::info!("{loaded} shader programs ready");

        let ground = upload(&mut textures, "ground", &ground_image(GROUND_SEED))?;
        let wall = upload_prop(&mut textures, "wall", assets::load_optional(&self.assets.wall));
        let brazier = upload_prop(&mut textures, "brazier", assets::load_optional(&self.assets.brazier));

        self.scene.set_textures(SceneTextures {
            ground: Some(ground),
            wall,
            brazier,
        });

        ctx.window.set_title(&window_title(self.level, None));
        self.gpu = Some(GpuResources {
            shaders,
            textures,
            quad_pass,
        });
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.scene.on_resize(width, height);
    }

    fn on_input(&mut self, event: &InputEvent, input: &InputState) -> AppControl {
        match event {
            InputEvent::Focused(false) => self.scene.release_all(),
            InputEvent::Focused(true) => {}

            InputEvent::Key { repeat: true, .. } => {}

            InputEvent::Key { key, state, .. } => {
                if *state == KeyState::Pressed {
                    match controls::command_for(*key) {
                        Some(Command::Quit) => return AppControl::Exit,
                        Some(Command::Restart) => {
                            if !self.restart() {
                                log::debug!("restart ignored while the battle is running");
                            }
                            return AppControl::Continue;
                        }
                        None => {}
                    }
                }

                if let Some(action) = controls::action_for(*key) {
                    let held = controls::is_held(input, action);
                    if held != self.scene.simulation().is_held(action) {
                        self.scene.on_input(action, held);
                    }
                }
            }
        }
        AppControl::Continue
    }

    fn on_tick(&mut self, ctx: &mut TickCtx<'_>) -> AppControl {
        self.scene.tick();
        if let Some(outcome) = self.scene.take_outcome() {
            self.finish(outcome);
        }
        if self.scene.take_redraw_request() || self.pending_title.is_some() {
            ctx.runtime.request_redraw();
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Some(title) = self.pending_title.take() {
            ctx.window.set_title(&title);
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return AppControl::Continue;
        };
        let surface = self.scene.render(&gpu.shaders);
        let GpuResources {
            shaders,
            textures,
            quad_pass,
        } = gpu;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            quad_pass.render(rctx, target, surface, shaders, textures);
        })
    }
}
