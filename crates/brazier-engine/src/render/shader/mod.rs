//! Shader programs keyed by name.
//!
//! The [`ShaderRegistry`] is an ordinary owned value: the application builds
//! one after the GPU device exists and passes it by reference to every draw.
//! Compilation goes through a [`ShaderBackend`], which keeps the registry logic
//! independent of wgpu (tests and offline checks use [`ValidatingBackend`]).
//!
//! Sources are WGSL, one module per stage. Conventions shared by all programs:
//! - vertex entry `vs_main`, fragment entry `fs_main`
//! - `@group(0) @binding(0)` uniform block with `projection`, `view`, `model`,
//!   `color` (rgb + alpha), `tint_color`, `params` (x = time, y = outline size)
//! - textured programs sample `@group(1)` `texture_sampler` / `linear_sampler`

mod error;
mod headless;
mod presets;
mod registry;
mod validate;
mod wgpu_backend;

use std::borrow::Cow;

pub use error::{ShaderError, ShaderStage};
pub use headless::{ValidatedProgram, ValidatingBackend};
pub use presets::Preset;
pub use registry::{ProgramId, ShaderRegistry};
pub use validate::{validate_program, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use wgpu_backend::{WgpuProgram, WgpuShaderBackend};

/// Vertex + fragment source text for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<Cow<'static, str>>, fragment: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Compiles shader sources into backend programs.
pub trait ShaderBackend {
    type Program;

    /// Compiles and links both stages. Must not leave partial state behind on error.
    fn compile(&mut self, name: &str, source: &ShaderSource) -> Result<Self::Program, ShaderError>;
}
