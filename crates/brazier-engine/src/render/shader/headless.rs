use super::{validate_program, ShaderBackend, ShaderError, ShaderSource};

/// Program produced by [`ValidatingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProgram {
    pub name: String,
}

/// Device-free backend: runs the same naga validation as the wgpu backend
/// but produces no GPU objects.
///
/// Lets scene code record draws, and sources be checked, without a GPU.
#[derive(Debug, Default, Clone)]
pub struct ValidatingBackend;

impl ShaderBackend for ValidatingBackend {
    type Program = ValidatedProgram;

    fn compile(&mut self, name: &str, source: &ShaderSource) -> Result<ValidatedProgram, ShaderError> {
        validate_program(name, source)?;
        Ok(ValidatedProgram {
            name: name.to_owned(),
        })
    }
}
