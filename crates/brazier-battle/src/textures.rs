//! Procedurally generated scene images.

use brazier_engine::render::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const GROUND_WIDTH: u32 = 512;
pub const GROUND_HEIGHT: u32 = 128;

const GROUND_TOP: [u8; 3] = [80, 60, 40];
const GROUND_BOTTOM: [u8; 3] = [120, 100, 80];
const SEAM: [u8; 3] = [100, 80, 60];
const SEAM_SPACING: u32 = 32;
const SEAM_WIDTH: u32 = 2;
const SPECK_SPACING: u32 = 4;
const SPECK_MAX: u8 = 30;

/// Packed-earth ground strip: vertical gradient, plank seams and noise specks.
///
/// The same `seed` always yields the same pixels.
pub fn ground_image(seed: u64) -> RgbaImage {
    let (w, h) = (GROUND_WIDTH, GROUND_HEIGHT);
    let mut image = RgbaImage::solid(w, h, [0, 0, 0, 255]);

    for y in 0..h {
        let t = y as f32 / (h - 1) as f32;
        let [r, g, b] = std::array::from_fn(|c| lerp_u8(GROUND_TOP[c], GROUND_BOTTOM[c], t));
        for x in 0..w {
            image.put_pixel(x, y, [r, g, b, 255]);
        }
    }

    let [r, g, b] = SEAM;
    for x0 in (0..w).step_by(SEAM_SPACING as usize) {
        for x in x0..(x0 + SEAM_WIDTH).min(w) {
            for y in 0..h {
                image.put_pixel(x, y, [r, g, b, 255]);
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for x in (0..w).step_by(SPECK_SPACING as usize) {
        for y in (0..h).step_by(SPECK_SPACING as usize) {
            let n = rng.gen_range(0..=SPECK_MAX);
            let [r, g, b] = GROUND_TOP.map(|c| c + n);
            image.put_pixel(x, y, [r, g, b, 255]);
        }
    }

    image
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_fixed_size() {
        let img = ground_image(1);
        assert_eq!((img.width(), img.height()), (512, 128));
        assert_eq!(img.aspect_ratio(), 4.0);
    }

    #[test]
    fn gradient_runs_top_to_bottom() {
        let img = ground_image(1);
        assert_eq!(img.pixel(2, 0), Some([80, 60, 40, 255]));
        assert_eq!(img.pixel(2, 127), Some([120, 100, 80, 255]));
    }

    #[test]
    fn seams_every_32_px() {
        let img = ground_image(1);
        for x in [32, 33, 480, 481] {
            assert_eq!(img.pixel(x, 1), Some([100, 80, 60, 255]), "x = {x}");
        }
        assert_ne!(img.pixel(34, 1), Some([100, 80, 60, 255]));
    }

    #[test]
    fn specks_are_offset_earth() {
        let img = ground_image(1);
        for (x, y) in [(4, 4), (100, 60), (508, 124)] {
            let [r, g, b, a] = img.pixel(x, y).unwrap();
            assert!((80..=110).contains(&r));
            assert_eq!((r - g, r - b, a), (20, 40, 255));
        }
    }

    #[test]
    fn seed_is_deterministic() {
        assert_eq!(ground_image(5), ground_image(5));
        assert_ne!(ground_image(5), ground_image(6));
    }
}
