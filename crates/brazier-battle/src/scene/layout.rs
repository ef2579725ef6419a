use brazier_engine::paint::Color;
use glam::Vec2;

/// Static scene dressing: colors, parallax factors and prop placement.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// Draw the three colored background layers.
    pub background_enabled: bool,
    /// Far to near.
    pub layer_colors: [Color; 3],
    pub layer_size: Vec2,

    /// Wall width relative to the arena width; height follows the texture aspect.
    pub wall_width_factor: f32,
    pub wall_parallax: Vec2,

    /// X of each brazier; they stand on the ground.
    pub brazier_xs: Vec<f32>,
    pub brazier_width: f32,
    pub brazier_parallax: Vec2,

    pub ground_thickness: f32,

    pub player_color: Color,
    pub boss_color: Color,

    pub health_bar: HealthBarLayout,
}

/// Two bars pinned to the top of the view, player left and boss right.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthBarLayout {
    /// Horizontal distance of each bar's center from the camera.
    pub inset_x: f32,
    /// Height above the camera.
    pub offset_y: f32,
    pub width: f32,
    pub back_height: f32,
    pub fill_height: f32,
    pub back_color: Color,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            background_enabled: true,
            layer_colors: [
                Color::from_rgb_u8(80, 100, 140),
                Color::from_rgb_u8(100, 120, 160),
                Color::from_rgb_u8(120, 140, 180),
            ],
            layer_size: Vec2::new(20.0, 6.0),
            wall_width_factor: 1.5,
            wall_parallax: Vec2::new(0.4, 0.05),
            brazier_xs: vec![-8.0, -5.0, 5.0, 8.0],
            brazier_width: 1.2,
            brazier_parallax: Vec2::new(0.8, 0.1),
            ground_thickness: 0.5,
            player_color: Color::rgb(0.4, 0.6, 1.0),
            boss_color: Color::rgb(1.0, 0.4, 0.4),
            health_bar: HealthBarLayout::default(),
        }
    }
}

impl Default for HealthBarLayout {
    fn default() -> Self {
        Self {
            inset_x: 4.5,
            offset_y: 4.0,
            width: 4.0,
            back_height: 0.3,
            fill_height: 0.25,
            back_color: Color::rgb(0.2, 0.2, 0.2),
        }
    }
}
