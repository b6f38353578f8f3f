//! Shader resolution: stages, collaborators, memory tier and the manager

pub mod stage;
pub mod device;
pub mod compiler;
pub mod registry;
pub mod memory_cache;
pub mod shader_manager;

#[cfg(test)]
pub(crate) mod mock_shader_device;

pub use stage::{FeatureLevel, ShaderDefine, ShaderProfiles, StageKind};
pub use device::{
    ComputeShader, DomainShader, GeometryShader, HullShader,
    PixelShader, ShaderDevice, StageObject, VertexShader,
};
pub use compiler::{CompileDiagnostic, CompileRequest, ShaderCompiler};
pub use registry::PurposeRegistry;
pub use memory_cache::{MemoryCache, MemoryRecord, ShaderKey};
pub use shader_manager::{ShaderManager, ShaderManagerStats};
