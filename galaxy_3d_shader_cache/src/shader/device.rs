/// Device-side shader objects and the device trait that creates them
///
/// Each stage has its own object trait; backends (D3D11, Vulkan, ...) provide
/// the concrete types. Objects are released when the last `Arc` is dropped.

use std::sync::Arc;
use crate::error::Result;
use super::stage::StageKind;

/// Vertex stage object
pub trait VertexShader: Send + Sync {}

/// Pixel stage object
pub trait PixelShader: Send + Sync {}

/// Geometry stage object
pub trait GeometryShader: Send + Sync {}

/// Compute stage object
pub trait ComputeShader: Send + Sync {}

/// Hull (tessellation control) stage object
pub trait HullShader: Send + Sync {}

/// Domain (tessellation evaluation) stage object
pub trait DomainShader: Send + Sync {}

/// A stage object of any kind
///
/// Closed over StageKind, so the memory cache stores every kind in one map
/// and callers recover the concrete kind with a match or an `as_*` accessor.
#[derive(Clone)]
pub enum StageObject {
    Vertex(Arc<dyn VertexShader>),
    Pixel(Arc<dyn PixelShader>),
    Geometry(Arc<dyn GeometryShader>),
    Compute(Arc<dyn ComputeShader>),
    Hull(Arc<dyn HullShader>),
    Domain(Arc<dyn DomainShader>),
}

impl StageObject {
    /// Stage kind of the wrapped object
    pub fn kind(&self) -> StageKind {
        match self {
            StageObject::Vertex(_) => StageKind::Vertex,
            StageObject::Pixel(_) => StageKind::Pixel,
            StageObject::Geometry(_) => StageKind::Geometry,
            StageObject::Compute(_) => StageKind::Compute,
            StageObject::Hull(_) => StageKind::Hull,
            StageObject::Domain(_) => StageKind::Domain,
        }
    }

    /// Whether both handles refer to the same device object
    pub fn same_object(&self, other: &StageObject) -> bool {
        match (self, other) {
            (StageObject::Vertex(a), StageObject::Vertex(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (StageObject::Pixel(a), StageObject::Pixel(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (StageObject::Geometry(a), StageObject::Geometry(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (StageObject::Compute(a), StageObject::Compute(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (StageObject::Hull(a), StageObject::Hull(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (StageObject::Domain(a), StageObject::Domain(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }

    pub fn as_vertex(&self) -> Option<&Arc<dyn VertexShader>> {
        match self {
            StageObject::Vertex(shader) => Some(shader),
            _ => None,
        }
    }

    pub fn as_pixel(&self) -> Option<&Arc<dyn PixelShader>> {
        match self {
            StageObject::Pixel(shader) => Some(shader),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Arc<dyn GeometryShader>> {
        match self {
            StageObject::Geometry(shader) => Some(shader),
            _ => None,
        }
    }

    pub fn as_compute(&self) -> Option<&Arc<dyn ComputeShader>> {
        match self {
            StageObject::Compute(shader) => Some(shader),
            _ => None,
        }
    }

    pub fn as_hull(&self) -> Option<&Arc<dyn HullShader>> {
        match self {
            StageObject::Hull(shader) => Some(shader),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<&Arc<dyn DomainShader>> {
        match self {
            StageObject::Domain(shader) => Some(shader),
            _ => None,
        }
    }
}

impl std::fmt::Debug for StageObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StageObject::{:?}", self.kind())
    }
}

/// Device able to turn bytecode into stage objects
///
/// Implemented by backend devices. Every method receives the exact bytecode
/// produced by the compiler (or read back from the disk cache).
pub trait ShaderDevice: Send + Sync {
    fn create_vertex_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn VertexShader>>;

    fn create_pixel_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn PixelShader>>;

    fn create_geometry_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn GeometryShader>>;

    fn create_compute_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn ComputeShader>>;

    fn create_hull_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn HullShader>>;

    fn create_domain_shader(&mut self, bytecode: &[u8]) -> Result<Arc<dyn DomainShader>>;

    /// Create a stage object of the requested kind
    fn create_stage_object(&mut self, kind: StageKind, bytecode: &[u8]) -> Result<StageObject> {
        Ok(match kind {
            StageKind::Vertex => StageObject::Vertex(self.create_vertex_shader(bytecode)?),
            StageKind::Pixel => StageObject::Pixel(self.create_pixel_shader(bytecode)?),
            StageKind::Geometry => StageObject::Geometry(self.create_geometry_shader(bytecode)?),
            StageKind::Compute => StageObject::Compute(self.create_compute_shader(bytecode)?),
            StageKind::Hull => StageObject::Hull(self.create_hull_shader(bytecode)?),
            StageKind::Domain => StageObject::Domain(self.create_domain_shader(bytecode)?),
        })
    }
}
