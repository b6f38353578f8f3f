/// Shader compiler abstraction
///
/// The cache never compiles HLSL itself: a backend compiler (fxc, dxc, a
/// cross-compiler, ...) is plugged in through the ShaderCompiler trait.

use std::fmt;
use std::path::{Path, PathBuf};
use super::stage::ShaderDefine;

/// Everything the compiler needs to produce bytecode for one purpose
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Shader source file
    pub source_path: &'a Path,
    /// Entry point function name
    pub entry_point: &'a str,
    /// Target profile, e.g. "vs_5_0"
    pub profile: &'a str,
    /// Preprocessor definitions (may be empty)
    pub defines: &'a [ShaderDefine],
    /// Compile with debug information and without optimization
    pub debug: bool,
}

/// Why a compilation produced no bytecode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileDiagnostic {
    /// The compiler rejected the source; holds the compiler's message text
    Failed(String),
    /// The source file could not be opened
    SourceNotFound(PathBuf),
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileDiagnostic::Failed(message) => write!(f, "{}", message),
            CompileDiagnostic::SourceNotFound(path) => {
                write!(f, "Shader source not found: {}", path.display())
            }
        }
    }
}

/// Source to bytecode compiler
pub trait ShaderCompiler: Send {
    /// Compile one entry point of a source file
    fn compile(&mut self, request: &CompileRequest<'_>) -> Result<Vec<u8>, CompileDiagnostic>;
}
