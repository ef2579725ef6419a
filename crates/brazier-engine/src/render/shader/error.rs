use std::fmt;

/// Programmable stage a diagnostic refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to turn shader source into a usable program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    /// A stage failed to parse or validate.
    #[error("{stage} stage of shader `{name}` failed to compile:\n{diagnostic}")]
    Compile {
        name: String,
        stage: ShaderStage,
        diagnostic: String,
    },

    /// Both stages compiled but cannot form a program.
    #[error("shader `{name}` failed to link: {reason}")]
    Link { name: String, reason: String },
}

impl ShaderError {
    /// Name of the program the error belongs to.
    pub fn name(&self) -> &str {
        match self {
            ShaderError::Compile { name, .. } | ShaderError::Link { name, .. } => name,
        }
    }
}
