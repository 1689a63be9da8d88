//! Render backend interface
//!
//! The seam between the scene core and whatever actually owns the GPU
//! context. The core threads an explicit `&mut dyn RenderBackend` through
//! every upload, bind and draw instead of relying on ambient global state;
//! the windowing/GL collaborator constructs one at startup.

use std::num::NonZeroU32;

use glam::{Mat4, Vec3, Vec4};

use crate::render::locations::{AttributeSlot, UniformSlot};

/// Identifier of a buffer object owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GpuBufferId(pub NonZeroU32);

/// Draw topology of a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

/// Usage hint passed along with a buffer upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UsageHint {
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

/// Everything the scene core asks of the GPU.
///
/// Slots come straight out of a [`ShaderLocations`] table and are opaque to
/// the core. Attribute data is handed over as a byte slice into the
/// CPU-side backing store; `stride` is the byte distance between
/// consecutive elements.
///
/// [`ShaderLocations`]: crate::render::locations::ShaderLocations
pub trait RenderBackend {
    fn create_buffer(&mut self, data: &[u8], hint: UsageHint) -> GpuBufferId;
    fn destroy_buffer(&mut self, id: GpuBufferId);

    fn set_uniform_mat4(&mut self, slot: UniformSlot, value: &Mat4);
    fn set_uniform_vec4(&mut self, slot: UniformSlot, value: Vec4);
    fn set_uniform_vec3(&mut self, slot: UniformSlot, value: Vec3);
    fn set_uniform_u32(&mut self, slot: UniformSlot, value: u32);

    fn enable_attribute(&mut self, slot: AttributeSlot);
    fn bind_attribute(&mut self, slot: AttributeSlot, components: u32, stride: usize, data: &[u8]);

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32);
    fn draw_indexed(&mut self, topology: Topology, indices: &[u32]);

    /// Drains a pending backend error, if the backend tracks any.
    ///
    /// Mid-frame errors are diagnostics, not flow control: the traversal
    /// logs them and keeps drawing.
    fn take_error(&mut self) -> Option<String> {
        None
    }
}
