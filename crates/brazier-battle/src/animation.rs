//! Toy bone motion: the player breathes, the boss pulses.

use glam::Vec2;

use crate::entity::{Character, Side};

/// Rest height of the player's body bone.
pub const BREATH_BASE_Y: f32 = 0.5;
pub const BREATH_AMPLITUDE: f32 = 0.05;
pub const BREATH_RATE: f32 = 2.0;

pub const PULSE_AMPLITUDE: f32 = 0.1;
pub const PULSE_RATE: f32 = 1.5;

/// Advances the character's animation clock by `dt` and poses its `body` bone.
pub fn advance(character: &mut Character, dt: f32) {
    character.animation_time += dt;
    let t = character.animation_time;

    let Some(body) = character.skeleton.find("body") else { return };
    let bone = &mut character.skeleton[body];

    match character.side {
        Side::Player => bone.position.y = breath_offset(t),
        Side::Boss => bone.scale = Vec2::splat(pulse_scale(t)),
    }
}

pub fn breath_offset(t: f32) -> f32 {
    BREATH_BASE_Y + (t * BREATH_RATE).sin() * BREATH_AMPLITUDE
}

pub fn pulse_scale(t: f32) -> f32 {
    1.0 + (t * PULSE_RATE).sin() * PULSE_AMPLITUDE
}
