/// Battle tunables. Defaults reproduce the classic duel.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleConfig {
    /// World y of the floor; characters never sink below it.
    pub ground_level: f32,
    /// Arena width; characters stay within `±ground_width / 2`.
    pub ground_width: f32,

    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    /// Horizontal velocity multiplier applied per tick without movement input.
    pub friction: f32,

    /// Simulated seconds per tick.
    pub tick_seconds: f32,

    /// Center-to-center distance below which the characters trade blows.
    pub melee_range: f32,
    /// Boss damage per second of held attack.
    pub attack_damage: f32,
    /// Fixed frame length the attack damage is scaled by, independent of `tick_seconds`.
    pub attack_frame_seconds: f32,

    /// Chance per tick in range, in percent, that the boss hits back.
    pub counter_chance_percent: u32,
    pub counter_damage: f32,

    pub player_health: f32,
    pub boss_base_health: f32,
    pub boss_health_per_level: f32,

    pub player_start_x: f32,
    pub boss_start_x: f32,

    /// Seed for the counter-attack roll; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            ground_level: -5.0,
            ground_width: 20.0,
            gravity: 9.8,
            move_speed: 5.0,
            jump_velocity: 8.0,
            friction: 0.9,
            tick_seconds: 0.016,
            melee_range: 1.0,
            attack_damage: 10.0,
            attack_frame_seconds: 0.016,
            counter_chance_percent: 10,
            counter_damage: 5.0,
            player_health: 100.0,
            boss_base_health: 200.0,
            boss_health_per_level: 50.0,
            player_start_x: -2.0,
            boss_start_x: 2.0,
            seed: None,
        }
    }
}

impl BattleConfig {
    /// Boss max health at `level`. Never below 1 so a battle cannot start already won.
    pub fn boss_health(&self, level: i32) -> f32 {
        (self.boss_base_health + level as f32 * self.boss_health_per_level).max(1.0)
    }

    /// Damage dealt to the boss per tick while attacking in range.
    pub fn attack_damage_per_tick(&self) -> f32 {
        self.attack_damage * self.attack_frame_seconds
    }

    pub fn half_width(&self) -> f32 {
        self.ground_width * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn boss_health_scales_with_level() {
        let c = BattleConfig::default();
        assert_eq!(c.boss_health(1), 250.0);
        assert_eq!(c.boss_health(3), 350.0);
        assert_eq!(c.boss_health(-10), 1.0);
    }

    #[test]
    fn attack_tick_damage_is_fixed() {
        let c = BattleConfig {
            tick_seconds: 0.5,
            ..Default::default()
        };
        assert_relative_eq!(c.attack_damage_per_tick(), 0.16, epsilon = 1e-6);
    }
}
