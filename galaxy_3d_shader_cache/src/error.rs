//! Error types for the Galaxy3D shader cache
//!
//! Only failures a caller can act on are represented here. Disk cache
//! misses, stale cache files and disk I/O problems never surface as errors:
//! the resolution chain recovers from them by falling through to the compiler.

use std::fmt;

/// Result type for shader cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shader cache errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The purpose has no entry in the purpose registry
    PurposeNotRegistered(String),

    /// The shader compiler rejected the source (diagnostic text included)
    CompileError(String),

    /// The device could not create a stage object from the bytecode
    DeviceCreateError(String),

    /// The purpose is already cached as a different stage kind
    StageMismatch(String),

    /// Invalid configuration value or purpose registry content
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PurposeNotRegistered(msg) => write!(f, "Purpose not registered: {}", msg),
            Error::CompileError(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::DeviceCreateError(msg) => write!(f, "Device failed to create shader: {}", msg),
            Error::StageMismatch(msg) => write!(f, "Shader stage mismatch: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
