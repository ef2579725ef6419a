//! Optional prop images read from disk.
//!
//! The scene runs without them: a missing file skips the prop, a file that
//! fails to decode is reported and skipped the same way.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brazier_engine::render::RgbaImage;

/// Environment variable overriding the asset directory.
pub const ASSETS_ENV: &str = "BRAZIER_ASSETS";

const DEFAULT_DIR: &str = "assets";
const BRAZIER_FILE: &str = "brazier.png";
const WALL_FILE: &str = "wall.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub brazier: PathBuf,
    pub wall: PathBuf,
}

impl AssetPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            brazier: dir.join(BRAZIER_FILE),
            wall: dir.join(WALL_FILE),
        }
    }

    /// `$BRAZIER_ASSETS` when set, `./assets` otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(ASSETS_ENV) {
            Some(dir) => Self::in_dir(dir),
            None => Self::in_dir(DEFAULT_DIR),
        }
    }
}

/// Decodes an encoded image (PNG or JPEG) into tightly packed RGBA8.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .context("failed to decode image from memory")?
        .to_rgba8();
    let (width, height) = img.dimensions();
    RgbaImage::new(width, height, img.into_raw())
}

pub fn load(path: &Path) -> Result<RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode(&bytes).with_context(|| format!("failed to load {}", path.display()))
}

/// Loads `path` if it exists. Failures are logged and yield `None`.
pub fn load_optional(path: &Path) -> Option<RgbaImage> {
    if !path.exists() {
        log::info!("{} not found; prop skipped", path.display());
        return None;
    }

    match load(path) {
        Ok(img) => {
            log::debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
            Some(img)
        }
        Err(err) => {
            log::warn!("{err:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let mut img = image::RgbaImage::new(width, height);
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    // ── decode ──────────────────────────────────────────────────────────

    #[test]
    fn decode_png_keeps_size_and_pixels() {
        let img = decode(&encoded_png(3, 2)).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixel(1, 0), Some([10, 20, 30, 255]));
        assert_eq!(img.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(b"definitely not an image").is_err());
    }

    // ── files ───────────────────────────────────────────────────────────

    #[test]
    fn paths_join_the_directory() {
        let paths = AssetPaths::in_dir("data");
        assert_eq!(paths.brazier, Path::new("data").join("brazier.png"));
        assert_eq!(paths.wall, Path::new("data").join("wall.jpg"));
    }

    #[test]
    fn missing_file_is_skipped() {
        let path = std::env::temp_dir().join("brazier-arena-missing-asset.png");
        assert!(load_optional(&path).is_none());
    }

    #[test]
    fn corrupt_file_is_skipped() {
        let path = std::env::temp_dir()
            .join(format!("brazier-arena-corrupt-{}.png", std::process::id()));
        std::fs::write(&path, b"\x89PNG but not really").unwrap();
        let loaded = load_optional(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn existing_file_loads() {
        let path = std::env::temp_dir()
            .join(format!("brazier-arena-valid-{}.png", std::process::id()));
        std::fs::write(&path, encoded_png(4, 4)).unwrap();
        let loaded = load_optional(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.map(|i| i.width()), Some(4));
    }
}
