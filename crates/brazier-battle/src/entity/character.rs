use glam::{Vec2, Vec3};

use crate::config::BattleConfig;

use super::{BoneId, Hitbox, Skeleton};

/// Which combatant a character is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Player,
    Boss,
}

/// Visual effect marker attached to a bone.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub name: String,
    pub bone: BoneId,
    pub color: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub side: Side,

    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub facing_right: bool,

    health: f32,
    max_health: f32,

    pub skeleton: Skeleton,
    pub statuses: Vec<Status>,
    pub hitboxes: Vec<Hitbox>,

    /// Label only; nothing switches on it yet.
    pub current_animation: String,
    /// Seconds of simulated time since the character was built.
    pub animation_time: f32,
}

impl Character {
    /// Player at its start position: root → body → head, facing right.
    pub fn player(config: &BattleConfig) -> Self {
        let mut skeleton = Skeleton::new(Vec2::ONE);
        let body = skeleton.add_bone(Skeleton::ROOT, "body", Vec2::new(0.0, 0.5), Vec2::new(0.6, 1.0));
        skeleton.add_bone(body, "head", Vec2::new(0.0, 0.3), Vec2::new(0.5, 0.5));

        Self::new(
            Side::Player,
            Vec2::new(config.player_start_x, config.ground_level),
            true,
            config.player_health,
            skeleton,
        )
    }

    /// Boss at its start position, facing the player. It carries no hitboxes.
    pub fn boss(config: &BattleConfig, level: i32) -> Self {
        let mut skeleton = Skeleton::new(Vec2::splat(1.2));
        let body = skeleton.add_bone(Skeleton::ROOT, "body", Vec2::new(0.0, 0.8), Vec2::new(1.0, 1.5));
        skeleton.add_bone(body, "head", Vec2::new(0.0, 0.5), Vec2::new(0.8, 0.8));

        Self::new(
            Side::Boss,
            Vec2::new(config.boss_start_x, config.ground_level),
            false,
            config.boss_health(level),
            skeleton,
        )
    }

    fn new(side: Side, position: Vec2, facing_right: bool, health: f32, skeleton: Skeleton) -> Self {
        Self {
            side,
            position,
            velocity: Vec2::ZERO,
            grounded: true,
            facing_right,
            health,
            max_health: health,
            skeleton,
            statuses: Vec::new(),
            hitboxes: Vec::new(),
            current_animation: "idle".to_string(),
            animation_time: 0.0,
        }
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Health over max health, in `[0, 1]`.
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Subtracts `amount`, never going below zero.
    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Sets health directly, clamped to `[0, max]`.
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    /// Replaces max health and refills.
    pub fn reset_health(&mut self, max_health: f32) {
        self.max_health = max_health.max(0.0);
        self.health = self.max_health;
    }

    pub fn add_status(&mut self, name: &str, bone: BoneId, color: Vec3) {
        self.statuses.push(Status {
            name: name.to_string(),
            bone,
            color,
        });
    }

    pub fn attack_hitbox(&self) -> Option<&Hitbox> {
        self.hitboxes.iter().find(|h| h.is_attack())
    }
}
