//! Recording backend
//!
//! A [`RenderBackend`] that records every call instead of talking to a GPU.
//! Used by the test suite to assert on draw-call sequences, and handy as a
//! diagnostic tap when a scene misrenders.

use std::num::NonZeroU32;

use glam::{Mat4, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::render::backend::{GpuBufferId, RenderBackend, Topology, UsageHint};
use crate::render::locations::{AttributeSlot, UniformSlot};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceCommand {
    CreateBuffer {
        id: GpuBufferId,
        len: usize,
        hint: UsageHint,
    },
    DestroyBuffer {
        id: GpuBufferId,
    },
    UniformMat4 {
        slot: UniformSlot,
        value: Mat4,
    },
    UniformVec4 {
        slot: UniformSlot,
        value: Vec4,
    },
    UniformVec3 {
        slot: UniformSlot,
        value: Vec3,
    },
    UniformU32 {
        slot: UniformSlot,
        value: u32,
    },
    EnableAttribute {
        slot: AttributeSlot,
    },
    BindAttribute {
        slot: AttributeSlot,
        components: u32,
        stride: usize,
        data: Vec<f32>,
    },
    DrawArrays {
        topology: Topology,
        first: u32,
        count: u32,
    },
    DrawIndexed {
        topology: Topology,
        indices: Vec<u32>,
    },
}

/// Records backend calls in order.
#[derive(Default)]
pub struct TraceBackend {
    commands: Vec<TraceCommand>,
    uploads: FxHashMap<GpuBufferId, Vec<u8>>,
    next_id: u32,
}

impl TraceBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, in submission order.
    #[must_use]
    pub fn commands(&self) -> &[TraceCommand] {
        &self.commands
    }

    /// The bytes uploaded for a still-live buffer id.
    #[must_use]
    pub fn uploaded(&self, id: GpuBufferId) -> Option<&[u8]> {
        self.uploads.get(&id).map(Vec::as_slice)
    }

    /// Number of draw calls (arrays and indexed) recorded so far.
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    TraceCommand::DrawArrays { .. } | TraceCommand::DrawIndexed { .. }
                )
            })
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderBackend for TraceBackend {
    fn create_buffer(&mut self, data: &[u8], hint: UsageHint) -> GpuBufferId {
        self.next_id += 1;
        let id = GpuBufferId(NonZeroU32::new(self.next_id).unwrap());
        self.uploads.insert(id, data.to_vec());
        self.commands.push(TraceCommand::CreateBuffer {
            id,
            len: data.len(),
            hint,
        });
        id
    }

    fn destroy_buffer(&mut self, id: GpuBufferId) {
        self.uploads.remove(&id);
        self.commands.push(TraceCommand::DestroyBuffer { id });
    }

    fn set_uniform_mat4(&mut self, slot: UniformSlot, value: &Mat4) {
        self.commands.push(TraceCommand::UniformMat4 {
            slot,
            value: *value,
        });
    }

    fn set_uniform_vec4(&mut self, slot: UniformSlot, value: Vec4) {
        self.commands.push(TraceCommand::UniformVec4 { slot, value });
    }

    fn set_uniform_vec3(&mut self, slot: UniformSlot, value: Vec3) {
        self.commands.push(TraceCommand::UniformVec3 { slot, value });
    }

    fn set_uniform_u32(&mut self, slot: UniformSlot, value: u32) {
        self.commands.push(TraceCommand::UniformU32 { slot, value });
    }

    fn enable_attribute(&mut self, slot: AttributeSlot) {
        self.commands.push(TraceCommand::EnableAttribute { slot });
    }

    fn bind_attribute(&mut self, slot: AttributeSlot, components: u32, stride: usize, data: &[u8]) {
        // Copy rather than cast: the slice is only 4-byte aligned by
        // accident of the caller's storage.
        let data = bytemuck::pod_collect_to_vec::<u8, f32>(data);
        self.commands.push(TraceCommand::BindAttribute {
            slot,
            components,
            stride,
            data,
        });
    }

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) {
        self.commands.push(TraceCommand::DrawArrays {
            topology,
            first,
            count,
        });
    }

    fn draw_indexed(&mut self, topology: Topology, indices: &[u32]) {
        self.commands.push(TraceCommand::DrawIndexed {
            topology,
            indices: indices.to_vec(),
        });
    }
}
