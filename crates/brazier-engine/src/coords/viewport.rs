/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height. A zero-height viewport (minimized window) reports 1.0
    /// so the projection stays finite.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
