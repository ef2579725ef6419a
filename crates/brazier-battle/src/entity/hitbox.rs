use glam::Vec2;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HitboxKind {
    /// Deals damage.
    Attack,
    /// Receives damage.
    Hurt,
}

/// Axis-aligned box relative to its owner's position.
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    pub name: String,
    pub offset: Vec2,
    pub half_extents: Vec2,
    pub kind: HitboxKind,
    pub damage: u32,
}

impl Hitbox {
    /// Swing in front of the player, on the side it faces.
    pub fn player_attack(facing_right: bool) -> Self {
        Self {
            name: "attack".to_string(),
            offset: Vec2::new(if facing_right { 0.5 } else { -0.5 }, 0.2),
            half_extents: Vec2::new(0.4, 0.2),
            kind: HitboxKind::Attack,
            damage: 10,
        }
    }

    /// Damage-receiving box; characters start without one.
    pub fn hurtbox(name: &str, offset: Vec2, half_extents: Vec2) -> Self {
        Self {
            name: name.to_string(),
            offset,
            half_extents,
            kind: HitboxKind::Hurt,
            damage: 0,
        }
    }

    #[inline]
    pub fn is_attack(&self) -> bool {
        self.kind == HitboxKind::Attack
    }

    /// Full width and height.
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    pub fn center(&self, owner: Vec2) -> Vec2 {
        owner + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_box_faces_forward() {
        assert_eq!(Hitbox::player_attack(true).offset.x, 0.5);
        assert_eq!(Hitbox::player_attack(false).offset.x, -0.5);
        assert_eq!(Hitbox::player_attack(true).size(), Vec2::new(0.8, 0.4));
    }

    #[test]
    fn center_is_owner_relative() {
        let h = Hitbox::player_attack(true);
        assert_eq!(h.center(Vec2::new(1.0, -5.0)), Vec2::new(1.5, -4.8));
    }

    #[test]
    fn hurtbox_deals_no_damage() {
        let h = Hitbox::hurtbox("body", Vec2::new(0.0, 0.8), Vec2::new(0.4, 0.6));
        assert!(!h.is_attack());
        assert_eq!(h.damage, 0);
        assert_eq!(h.size(), Vec2::new(0.8, 1.2));
    }
}
