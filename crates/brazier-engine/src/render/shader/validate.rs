use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderSource, ShaderStage};

/// Entry point every vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point every fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Parses and validates both stages, then checks they can be paired.
///
/// This is the "compile + link" step: naga is the WGSL front end wgpu itself
/// runs, so a source accepted here will not trip device validation when the
/// shader module is created.
pub fn validate_program(name: &str, source: &ShaderSource) -> Result<(), ShaderError> {
    let vertex = compile_stage(name, ShaderStage::Vertex, &source.vertex)?;
    let fragment = compile_stage(name, ShaderStage::Fragment, &source.fragment)?;

    require_entry(name, &vertex, naga::ShaderStage::Vertex, VERTEX_ENTRY)?;
    require_entry(name, &fragment, naga::ShaderStage::Fragment, FRAGMENT_ENTRY)?;
    Ok(())
}

fn compile_stage(name: &str, stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| ShaderError::Compile {
        name: name.to_owned(),
        stage,
        diagnostic: err.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| ShaderError::Compile {
            name: name.to_owned(),
            stage,
            diagnostic: err.into_inner().to_string(),
        })?;

    Ok(module)
}

fn require_entry(
    name: &str,
    module: &naga::Module,
    stage: naga::ShaderStage,
    entry: &str,
) -> Result<(), ShaderError> {
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage && ep.name == entry);

    if found {
        Ok(())
    } else {
        Err(ShaderError::Link {
            name: name.to_owned(),
            reason: format!("missing {stage:?} entry point `{entry}`"),
        })
    }
}
