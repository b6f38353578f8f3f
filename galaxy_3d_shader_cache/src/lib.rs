/*!
# Galaxy 3D Shader Cache

Two-tier (memory + disk) cache of compiled shader bytecode for the Galaxy 3D engine.

A shader is requested by *purpose* (e.g. `"VertexShader"`), a stable name mapped
to one source file. The first request compiles the source, persists the bytecode
next to other purposes built from the same file, and asks the device for a stage
object. Later requests in the same process are answered from memory; requests in
a later process read the bytecode back from disk as long as the source file is
not newer than its cache file.

## Architecture

- **ShaderManager**: resolution chain memory -> disk -> compiler -> device
- **DiskCacheStore**: one length-prefixed record file per source file
- **ShaderCompiler**: backend compiler trait (source to bytecode)
- **ShaderDevice**: backend device trait (bytecode to stage object)
- **PurposeRegistry**: fixed purpose -> source path table

Backends provide the compiler and device implementations.
*/

// Internal modules
mod error;
pub mod log;
pub mod config;
pub mod disk_cache;
pub mod shader;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::ShaderCacheConfig;

    // Cache front end
    pub use crate::shader::ShaderManager;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Shader sub-module: stages, collaborators, registry, memory tier
    pub mod shader {
        pub use crate::shader::*;
    }

    // Disk cache sub-module
    pub mod disk_cache {
        pub use crate::disk_cache::*;
    }
}
