//! GPU rendering subsystem.
//!
//! Scenes record unit-quad draws on a [`RenderSurface`] (world units, +Y up,
//! camera-centered orthographic projection). [`QuadPass`] replays them with the
//! programs held by a [`ShaderRegistry`] and textures from a [`TextureStore`].

mod ctx;
pub mod quad;
pub mod shader;
pub mod surface;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{QuadLayouts, QuadPass};
pub use shader::{ShaderRegistry, ShaderSource};
pub use surface::{Camera2D, QuadDraw, RenderSurface, UniformSet};
pub use texture::{RgbaImage, TextureHandle, TextureStore};
