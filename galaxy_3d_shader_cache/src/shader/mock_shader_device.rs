/// Mock collaborators for ShaderManager unit tests (no GPU, no compiler)
///
/// Every mock shares its counters through `Arc`s so a test can keep a handle
/// after the mock itself has been moved into the manager.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::disk_cache::{CacheEntry, CacheWrite, ShaderDiskCache};
use crate::error::Result;
use crate::shader_bail;
use super::compiler::{CompileDiagnostic, CompileRequest, ShaderCompiler};
use super::device::{
    ComputeShader, DomainShader, GeometryShader, HullShader,
    PixelShader, ShaderDevice, VertexShader,
};
use super::stage::StageKind;

// ============================================================================
// Mock Stage Object
// ============================================================================

/// Stage object of any kind; counts its own release
#[derive(Debug)]
pub struct MockStageObject {
    pub kind: StageKind,
    pub bytecode: Vec<u8>,
    released: Arc<AtomicUsize>,
}

impl Drop for MockStageObject {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl VertexShader for MockStageObject {}
impl PixelShader for MockStageObject {}
impl GeometryShader for MockStageObject {}
impl ComputeShader for MockStageObject {}
impl HullShader for MockStageObject {}
impl DomainShader for MockStageObject {}

// ============================================================================
// Mock Shader Device
// ============================================================================

#[derive(Default)]
pub struct MockShaderDevice {
    pub created: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    pub fail: Arc<AtomicBool>,
}

impl MockShaderDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, kind: StageKind, bytecode: &[u8]) -> Result<Arc<MockStageObject>> {
        if self.fail.load(Ordering::SeqCst) {
            shader_bail!("galaxy3d::MockShaderDevice", DeviceCreateError,
                "Mock device refused {} bytecode", kind);
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockStageObject {
            kind,
            bytecode: bytecode.to_vec(),
            released: Arc::clone(&self.released),
        }))
    }
}

impl ShaderDevice for MockShaderDevice {
    fn create_vertex_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn VertexShader>> {
        Ok(self.create(StageKind::Vertex, bytecode)?)
    }

    fn create_pixel_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn PixelShader>> {
        Ok(self.create(StageKind::Pixel, bytecode)?)
    }

    fn create_geometry_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn GeometryShader>> {
        Ok(self.create(StageKind::Geometry, bytecode)?)
    }

    fn create_compute_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn ComputeShader>> {
        Ok(self.create(StageKind::Compute, bytecode)?)
    }

    fn create_hull_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn HullShader>> {
        Ok(self.create(StageKind::Hull, bytecode)?)
    }

    fn create_domain_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn DomainShader>> {
        Ok(self.create(StageKind::Domain, bytecode)?)
    }
}

// ============================================================================
// Mock Compiler
// ============================================================================

/// What the mock compiler saw for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCompile {
    pub source_path: String,
    pub entry_point: String,
    pub profile: String,
    pub defines: Vec<(String, String)>,
    pub debug: bool,
}

/// Compiler producing `"<entry>|<profile>"` as bytecode
#[derive(Default)]
pub struct MockCompiler {
    pub calls: Arc<AtomicUsize>,
    pub fail: Arc<AtomicBool>,
    pub requests: Arc<Mutex<Vec<RecordedCompile>>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_bytecode(entry_point: &str, profile: &str) -> Vec<u8> {
        format!("{}|{}", entry_point, profile).into_bytes()
    }
}

impl ShaderCompiler for MockCompiler {
    fn compile(&mut self, request: &CompileRequest<'_>) -> std::result::Result<Vec<u8>, CompileDiagnostic> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedCompile {
                source_path: request.source_path.to_string_lossy().into_owned(),
                entry_point: request.entry_point.to_string(),
                profile: request.profile.to_string(),
                defines: request.defines
                    .iter()
                    .map(|d| (d.name.clone(), d.value.clone()))
                    .collect(),
                debug: request.debug,
            });
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(CompileDiagnostic::Failed(format!(
                "{}(1,1): error X3000: syntax error", request.source_path.display()
            )));
        }

        Ok(Self::expected_bytecode(request.entry_point, request.profile))
    }
}

// ============================================================================
// Mock Disk Cache
// ============================================================================

/// In-memory disk cache counting searches and adds
#[derive(Default)]
pub struct MockDiskCache {
    pub entries: Arc<Mutex<FxHashMap<String, Vec<u8>>>>,
    pub searches: Arc<AtomicUsize>,
    pub adds: Arc<AtomicUsize>,
}

impl MockDiskCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShaderDiskCache for MockDiskCache {
    fn search(&mut self, purpose: &str, _source_path: &Path) -> Option<Vec<u8>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().ok()?.get(purpose).cloned()
    }

    fn add(&mut self, entry: &CacheEntry, _source_path: &Path) -> CacheWrite {
        self.adds.fetch_add(1, Ordering::SeqCst);
        let Ok(mut entries) = self.entries.lock() else {
            return CacheWrite::Failed;
        };
        if entries.contains_key(&entry.key) {
            return CacheWrite::AlreadyPresent;
        }
        entries.insert(entry.key.clone(), entry.bytecode.clone());
        CacheWrite::Appended
    }
}
