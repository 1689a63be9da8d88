//! Render interface module
//!
//! The backend-facing side of the scene core:
//! - `RenderBackend`: explicit GPU context handle threaded through draws
//! - `ShaderLocations`: opaque attribute/uniform slot table
//! - `TraceBackend`: recording backend for tests and diagnostics

pub mod backend;
pub mod locations;
pub mod trace;

pub use backend::{GpuBufferId, RenderBackend, Topology, UsageHint};
pub use locations::{AttributeSlot, ShaderLocations, UniformSlot};
pub use trace::{TraceBackend, TraceCommand};
