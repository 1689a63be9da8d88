//! Geometry resource module
//!
//! CPU-side geometry data and the drawable units built from it:
//! - `GeometryBuffer` / `BufferRef`: typed, shared flat arrays
//! - `Primitive`: buffer bindings plus topology and draw logic
//! - procedural builders (cylinder)

pub mod buffer;
pub mod primitive;
pub mod primitives;

pub use buffer::{BufferRef, ElementKind, GeometryBuffer};
pub use primitive::{BufferBinding, DrawMode, Primitive};
pub use primitives::{create_cylinder, CylinderOptions};
