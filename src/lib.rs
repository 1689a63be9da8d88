pub mod errors;
pub mod render;
pub mod resources;
pub mod scene;
pub mod transform;

pub use errors::{PuckError, Result};
pub use render::{
    AttributeSlot, GpuBufferId, RenderBackend, ShaderLocations, Topology, TraceBackend,
    TraceCommand, UniformSlot, UsageHint,
};
pub use resources::{
    create_cylinder, BufferBinding, BufferRef, CylinderOptions, DrawMode, ElementKind,
    GeometryBuffer, Primitive,
};
pub use scene::{Eye, Light, SceneGraph, Shape, ShapeKey};
pub use transform::{MatrixStack, TransformContext};
