//! Boss duel scene.
//!
//! - `entity`: characters, bone skeletons, hitboxes, status markers
//! - `simulation`: fixed-step physics, combat and outcome
//! - `animation`: sine-driven bone motion
//! - `scene`: renderer, layout and the [`BossScene`] lifecycle the host drives
//! - `textures`: procedural ground image

pub mod animation;
pub mod config;
pub mod entity;
pub mod scene;
pub mod simulation;
pub mod textures;

pub use config::BattleConfig;
pub use scene::{BossScene, SceneLayout, SceneTextures};
pub use simulation::{Action, BattleSimulation, Outcome};
