/// Shader stage kinds, target profiles and preprocessor defines

use std::fmt;

/// Pipeline stage a shader is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Pixel,
    Geometry,
    Compute,
    Hull,
    Domain,
}

impl StageKind {
    /// All stage kinds, in profile table order
    pub const ALL: [StageKind; 6] = [
        StageKind::Vertex,
        StageKind::Pixel,
        StageKind::Geometry,
        StageKind::Compute,
        StageKind::Hull,
        StageKind::Domain,
    ];

    /// Profile prefix used by the shader compiler (e.g. "vs" for vertex)
    pub fn profile_prefix(self) -> &'static str {
        match self {
            StageKind::Vertex => "vs",
            StageKind::Pixel => "ps",
            StageKind::Geometry => "gs",
            StageKind::Compute => "cs",
            StageKind::Hull => "hs",
            StageKind::Domain => "ds",
        }
    }

    fn index(self) -> usize {
        match self {
            StageKind::Vertex => 0,
            StageKind::Pixel => 1,
            StageKind::Geometry => 2,
            StageKind::Compute => 3,
            StageKind::Hull => 4,
            StageKind::Domain => 5,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Capability level negotiated with the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureLevel {
    /// Shader model 4.0
    Level10_0,
    /// Shader model 4.1
    Level10_1,
    /// Shader model 5.0
    Level11_0,
}

impl FeatureLevel {
    /// (major, minor) shader model supported at this level
    pub fn shader_model(self) -> (u32, u32) {
        match self {
            FeatureLevel::Level10_0 => (4, 0),
            FeatureLevel::Level10_1 => (4, 1),
            FeatureLevel::Level11_0 => (5, 0),
        }
    }
}

/// Target profile string for every stage kind
///
/// Built once from the negotiated feature level and handed to the
/// ShaderManager, which never changes it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProfiles {
    profiles: [String; 6],
}

impl ShaderProfiles {
    /// Profiles for a shader model, e.g. (5, 0) gives "vs_5_0", "ps_5_0", ...
    pub fn for_shader_model(major: u32, minor: u32) -> Self {
        Self {
            profiles: StageKind::ALL.map(|kind| {
                format!("{}_{}_{}", kind.profile_prefix(), major, minor)
            }),
        }
    }

    /// Profiles matching a negotiated feature level
    pub fn for_feature_level(level: FeatureLevel) -> Self {
        let (major, minor) = level.shader_model();
        Self::for_shader_model(major, minor)
    }

    /// Override the profile of a single stage
    pub fn with_profile(mut self, kind: StageKind, profile: impl Into<String>) -> Self {
        self.profiles[kind.index()] = profile.into();
        self
    }

    /// Profile string for a stage kind
    pub fn profile(&self, kind: StageKind) -> &str {
        &self.profiles[kind.index()]
    }
}

impl Default for ShaderProfiles {
    fn default() -> Self {
        Self::for_feature_level(FeatureLevel::Level11_0)
    }
}

/// Preprocessor definition passed to the compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderDefine {
    pub name: String,
    pub value: String,
}

impl ShaderDefine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
