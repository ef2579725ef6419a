//! Fixed-step duel simulation.
//!
//! One [`tick`](BattleSimulation::tick) runs, in order: gravity, player
//! movement input, integration, ground clamp, arena bounds, animation,
//! melee exchange, background drift, and the win/loss check.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation;
use crate::config::BattleConfig;
use crate::entity::{Character, Hitbox};

/// Number of drifting background layers.
pub const LAYER_COUNT: usize = 3;

/// Logical player actions the host maps keys onto.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Attack,
}

/// How a battle ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Held {
    left: bool,
    right: bool,
    jump: bool,
    attack: bool,
}

pub struct BattleSimulation {
    config: BattleConfig,
    level: i32,

    player: Character,
    boss: Character,

    held: Held,
    active: bool,
    outcome: Option<Outcome>,

    layer_offsets: [Vec2; LAYER_COUNT],
    rng: StdRng,
    ticks: u64,
}

impl BattleSimulation {
    /// Builds an active battle at level 1.
    pub fn new(config: BattleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let level = 1;
        Self {
            player: Character::player(&config),
            boss: Character::boss(&config, level),
            config,
            level,
            held: Held::default(),
            active: true,
            outcome: None,
            layer_offsets: [Vec2::ZERO; LAYER_COUNT],
            rng,
            ticks: 0,
        }
    }

    /// Sets the boss level: refills the boss to its level health and reactivates the battle.
    ///
    /// The player, positions and clocks are untouched; an untaken outcome is discarded.
    pub fn set_level(&mut self, level: i32) {
        self.level = level;
        self.boss.reset_health(self.config.boss_health(level));
        self.active = true;
        self.outcome = None;
        log::debug!("boss level {level}, health {}", self.boss.max_health());
    }

    /// Fresh battle at `level`: both combatants rebuilt at their start positions.
    pub fn reset(&mut self, level: i32) {
        self.player = Character::player(&self.config);
        self.boss = Character::boss(&self.config, level);
        self.held = Held::default();
        self.layer_offsets = [Vec2::ZERO; LAYER_COUNT];
        self.ticks = 0;
        self.set_level(level);
    }

    /// Press or release of a logical action.
    ///
    /// Pressing attack spawns (or replaces) the player's attack hitbox on the
    /// side it currently faces; releasing clears the player's hitboxes.
    pub fn on_input(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Left => self.held.left = pressed,
            Action::Right => self.held.right = pressed,
            Action::Jump => self.held.jump = pressed,
            Action::Attack => {
                self.held.attack = pressed;
                self.player.hitboxes.clear();
                if pressed {
                    self.player
                        .hitboxes
                        .push(Hitbox::player_attack(self.player.facing_right));
                }
            }
        }
    }

    /// Releases every held action (e.g. after focus loss).
    pub fn release_all(&mut self) {
        for action in [Action::Left, Action::Right, Action::Jump, Action::Attack] {
            self.on_input(action, false);
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Left => self.held.left,
            Action::Right => self.held.right,
            Action::Jump => self.held.jump,
            Action::Attack => self.held.attack,
        }
    }

    /// Advances one fixed step. Returns `false` (doing nothing) once the battle is over.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }

        let dt = self.config.tick_seconds;

        self.apply_gravity(dt);
        self.apply_player_input();
        self.integrate(dt);
        self.clamp_to_arena();

        animation::advance(&mut self.player, dt);
        animation::advance(&mut self.boss, dt);

        self.exchange_blows();

        for (i, layer) in self.layer_offsets.iter_mut().enumerate() {
            layer.x -= dt * (i + 1) as f32 * 0.1;
        }

        self.check_outcome();
        self.ticks += 1;
        true
    }

    /// Takes the pending outcome, if the battle ended since the last call.
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn boss(&self) -> &Character {
        &self.boss
    }

    pub fn player_mut(&mut self) -> &mut Character {
        &mut self.player
    }

    pub fn boss_mut(&mut self) -> &mut Character {
        &mut self.boss
    }

    /// Accumulated drift of each background layer.
    pub fn layer_offsets(&self) -> &[Vec2; LAYER_COUNT] {
        &self.layer_offsets
    }

    /// Ticks run since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn apply_gravity(&mut self, dt: f32) {
        let g = self.config.gravity * dt;
        self.player.velocity.y -= g;
        self.boss.velocity.y -= g;
    }

    fn apply_player_input(&mut self) {
        let p = &mut self.player;
        let speed = self.config.move_speed;

        if self.held.left {
            p.velocity.x = -speed;
            p.facing_right = false;
        } else if self.held.right {
            p.velocity.x = speed;
            p.facing_right = true;
        } else {
            p.velocity.x *= self.config.friction;
        }

        if self.held.jump && p.grounded {
            p.velocity.y = self.config.jump_velocity;
            p.grounded = false;
        }
    }

    fn integrate(&mut self, dt: f32) {
        for c in [&mut self.player, &mut self.boss] {
            c.position += c.velocity * dt;
        }
    }

    fn clamp_to_arena(&mut self) {
        let ground = self.config.ground_level;
        let half = self.config.half_width();

        for c in [&mut self.player, &mut self.boss] {
            if c.position.y < ground {
                c.position.y = ground;
                c.velocity.y = 0.0;
                c.grounded = true;
            }
            c.position.x = c.position.x.clamp(-half, half);
        }
    }

    fn exchange_blows(&mut self) {
        let distance = self.player.position.distance(self.boss.position);
        if distance >= self.config.melee_range {
            return;
        }

        if self.held.attack {
            self.boss.apply_damage(self.config.attack_damage_per_tick());
        }

        // The boss swings back whether or not the player is attacking.
        if self.rng.gen_range(0..100) < self.config.counter_chance_percent {
            self.player.apply_damage(self.config.counter_damage);
        }
    }

    fn check_outcome(&mut self) {
        let outcome = if self.player.is_defeated() {
            Outcome::Lost
        } else if self.boss.is_defeated() {
            Outcome::Won
        } else {
            return;
        };

        self.active = false;
        self.outcome = Some(outcome);
        log::info!("battle {outcome:?} at level {} after {} ticks", self.level, self.ticks + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> BattleConfig {
        BattleConfig {
            seed: Some(7),
            ..Default::default()
        }
    }

    /// No counter-attacks, so damage to the player is deterministic.
    fn peaceful() -> BattleSimulation {
        BattleSimulation::new(BattleConfig {
            counter_chance_percent: 0,
            ..config()
        })
    }

    /// Puts the player right next to the boss.
    fn close_in(sim: &mut BattleSimulation) {
        let boss_x = sim.boss().position.x;
        sim.player_mut().position.x = boss_x - 0.5;
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn held_attack_in_range_drains_fixed_amount() {
        let mut sim = peaceful();
        close_in(&mut sim);
        sim.on_input(Action::Attack, true);
        let start = sim.boss().health();
        assert_eq!(start, 250.0);

        for _ in 0..40 {
            assert!(sim.tick());
        }

        assert_relative_eq!(start - sim.boss().health(), 6.4, epsilon = 1e-3);
        assert_eq!(sim.player().health(), 100.0);
    }

    #[test]
    fn boss_defeat_reports_won_once() {
        let mut sim = peaceful();
        for _ in 0..5 {
            sim.tick();
        }
        sim.boss_mut().set_health(0.0);

        assert!(sim.tick());
        assert_eq!(sim.take_outcome(), Some(Outcome::Won));
        assert!(!sim.is_active());

        let frozen = sim.player().clone();
        for _ in 0..10 {
            assert!(!sim.tick());
        }
        assert_eq!(sim.take_outcome(), None);
        assert_eq!(sim.player(), &frozen);
    }

    #[test]
    fn set_level_refills_boss_and_reactivates() {
        let mut sim = peaceful();
        sim.boss_mut().set_health(0.0);
        sim.tick();
        assert!(!sim.is_active());

        sim.set_level(3);

        assert!(sim.is_active());
        assert_eq!(sim.boss().max_health(), 350.0);
        assert_eq!(sim.boss().health(), 350.0);
        assert!(sim.tick());
    }

    #[test]
    fn jump_then_gravity() {
        let mut sim = peaceful();
        sim.on_input(Action::Jump, true);
        sim.tick();

        assert_eq!(sim.player().velocity.y, 8.0);
        assert!(!sim.player().grounded);

        sim.on_input(Action::Jump, false);
        sim.tick();
        assert_relative_eq!(sim.player().velocity.y, 8.0 - 0.1568, epsilon = 1e-5);
    }

    // ── outcome ───────────────────────────────────────────────────────────

    #[test]
    fn player_defeat_wins_over_boss_defeat() {
        let mut sim = peaceful();
        sim.player_mut().set_health(0.0);
        sim.boss_mut().set_health(0.0);
        sim.tick();
        assert_eq!(sim.take_outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn counter_attacks_only_in_range() {
        let mut sim = BattleSimulation::new(BattleConfig {
            counter_chance_percent: 100,
            ..config()
        });
        sim.tick();
        assert_eq!(sim.player().health(), 100.0);

        close_in(&mut sim);
        sim.tick();
        assert_eq!(sim.player().health(), 95.0);
    }

    #[test]
    fn relentless_boss_eventually_wins() {
        let mut sim = BattleSimulation::new(BattleConfig {
            counter_chance_percent: 100,
            ..config()
        });
        close_in(&mut sim);

        let mut outcomes = Vec::new();
        for _ in 0..100 {
            sim.tick();
            outcomes.extend(sim.take_outcome());
        }
        assert_eq!(outcomes, [Outcome::Lost]);
        assert_eq!(sim.player().health(), 0.0);
    }

    // ── input ─────────────────────────────────────────────────────────────

    #[test]
    fn attack_press_spawns_hitbox_release_clears() {
        let mut sim = peaceful();
        sim.on_input(Action::Attack, true);
        sim.on_input(Action::Attack, true);
        assert_eq!(sim.player().hitboxes.len(), 1);
        assert_eq!(sim.player().attack_hitbox().unwrap().offset.x, 0.5);

        sim.on_input(Action::Attack, false);
        assert!(sim.player().hitboxes.is_empty());
    }

    #[test]
    fn attack_box_follows_facing_at_press() {
        let mut sim = peaceful();
        sim.on_input(Action::Left, true);
        sim.tick();
        sim.on_input(Action::Attack, true);
        assert_eq!(sim.player().attack_hitbox().unwrap().offset.x, -0.5);
    }

    #[test]
    fn left_wins_over_right() {
        let mut sim = peaceful();
        sim.on_input(Action::Left, true);
        sim.on_input(Action::Right, true);
        sim.tick();
        assert_eq!(sim.player().velocity.x, -5.0);
        assert!(!sim.player().facing_right);
    }

    #[test]
    fn friction_decays_velocity() {
        let mut sim = peaceful();
        sim.on_input(Action::Right, true);
        sim.tick();
        sim.on_input(Action::Right, false);
        sim.tick();
        assert_relative_eq!(sim.player().velocity.x, 4.5, epsilon = 1e-5);
    }

    #[test]
    fn release_all_drops_every_action() {
        let mut sim = peaceful();
        sim.on_input(Action::Left, true);
        sim.on_input(Action::Attack, true);
        sim.release_all();
        assert!(!sim.is_held(Action::Left));
        assert!(!sim.is_held(Action::Attack));
        assert!(sim.player().hitboxes.is_empty());
    }

    // ── invariants ────────────────────────────────────────────────────────

    #[test]
    fn random_play_keeps_invariants() {
        let mut sim = BattleSimulation::new(config());
        let mut rng = StdRng::seed_from_u64(99);
        let actions = [Action::Left, Action::Right, Action::Jump, Action::Attack];
        let half = sim.config().half_width();
        let ground = sim.config().ground_level;

        for _ in 0..5_000 {
            let action = actions[rng.gen_range(0..actions.len())];
            sim.on_input(action, rng.gen_bool(0.5));
            if !sim.tick() {
                sim.reset(1);
            }

            for c in [sim.player(), sim.boss()] {
                assert!(c.position.y >= ground);
                assert!(c.position.x.abs() <= half);
                assert!((0.0..=c.max_health()).contains(&c.health()));
            }
        }
    }

    #[test]
    fn inactive_tick_changes_nothing() {
        let mut sim = peaceful();
        sim.on_input(Action::Right, true);
        sim.player_mut().set_health(0.0);
        sim.tick();
        sim.take_outcome();

        let player = sim.player().clone();
        let boss = sim.boss().clone();
        let layers = *sim.layer_offsets();
        let ticks = sim.ticks();

        sim.tick();

        assert_eq!(sim.player(), &player);
        assert_eq!(sim.boss(), &boss);
        assert_eq!(sim.layer_offsets(), &layers);
        assert_eq!(sim.ticks(), ticks);
    }

    #[test]
    fn reset_rebuilds_both_combatants() {
        let mut sim = peaceful();
        sim.on_input(Action::Right, true);
        for _ in 0..30 {
            sim.tick();
        }
        sim.player_mut().apply_damage(40.0);

        sim.reset(2);

        assert_eq!(sim.player().position, Vec2::new(-2.0, -5.0));
        assert_eq!(sim.player().health(), 100.0);
        assert_eq!(sim.boss().max_health(), 300.0);
        assert!(!sim.is_held(Action::Right));
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.level(), 2);
    }

    #[test]
    fn background_layers_drift_left() {
        let mut sim = peaceful();
        sim.tick();
        let l = sim.layer_offsets();
        assert_relative_eq!(l[0].x, -0.0016, epsilon = 1e-6);
        assert_relative_eq!(l[2].x, -0.0048, epsilon = 1e-6);
    }
}
