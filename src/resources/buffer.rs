//! Geometry buffers
//!
//! Reference-counted flat arrays of typed vertex data. A buffer is created
//! with a fixed element kind and count, zero-initialized, and shared between
//! primitives through cheap [`BufferRef`] handle clones. The backing store
//! lives CPU-side until the buffer is uploaded ("grabbed") by the backend.
//!
//! The store is kept as 32-bit words: every element kind is a whole number
//! of words, which keeps the float and index views of the same bytes
//! alignment-safe.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use glam::{Vec3, Vec4};
use parking_lot::RwLock;

use crate::errors::{PuckError, Result};
use crate::render::backend::{GpuBufferId, RenderBackend, Topology, UsageHint};
use crate::render::locations::AttributeSlot;

// Global buffer id generator
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// The closed set of element shapes a buffer can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Four 32-bit floats per element (positions, colors, normals).
    Float4,
    /// Three 32-bit floats per element, stored padded to four words.
    Float3,
    /// One unsigned 32-bit index per element.
    Uint1,
}

impl ElementKind {
    /// Components handed to the attribute pipeline per element.
    #[must_use]
    pub const fn components(self) -> u32 {
        match self {
            Self::Float4 => 4,
            Self::Float3 => 3,
            Self::Uint1 => 1,
        }
    }

    /// Storage words per element, padding included.
    #[must_use]
    pub const fn words(self) -> usize {
        match self {
            Self::Float4 | Self::Float3 => 4,
            Self::Uint1 => 1,
        }
    }

    /// Storage bytes per element.
    #[must_use]
    pub const fn size(self) -> usize {
        self.words() * 4
    }

    #[must_use]
    pub const fn is_index(self) -> bool {
        matches!(self, Self::Uint1)
    }
}

/// A typed flat array of geometry data.
///
/// Always handled through a [`BufferRef`]; element kind and count are fixed
/// at creation and the store is never resized.
#[derive(Debug)]
pub struct GeometryBuffer {
    id: u64,
    kind: ElementKind,
    num: usize,
    /// CPU backing store; `None` once released after an upload.
    data: RwLock<Option<Vec<u32>>>,
    /// Backend buffer id, 0 while not uploaded.
    gpu_id: AtomicU32,
}

/// Shared-ownership handle to a [`GeometryBuffer`].
#[derive(Debug, Clone)]
pub struct BufferRef(Arc<GeometryBuffer>);

impl PartialEq for BufferRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for BufferRef {}

impl std::hash::Hash for BufferRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl std::ops::Deref for BufferRef {
    type Target = GeometryBuffer;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl BufferRef {
    /// Allocates a zero-initialized buffer of `num` elements.
    ///
    /// # Panics
    ///
    /// Panics if `num` is zero.
    #[must_use]
    pub fn new(num: usize, kind: ElementKind) -> Self {
        assert!(num > 0, "geometry buffer must hold at least one element");
        Self(Arc::new(GeometryBuffer {
            id: NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            num,
            data: RwLock::new(Some(vec![0u32; num * kind.words()])),
            gpu_id: AtomicU32::new(0),
        }))
    }

    /// Float4 buffer, the common vertex/color/normal case.
    #[must_use]
    pub fn new_v4(num: usize) -> Self {
        Self::new(num, ElementKind::Float4)
    }

    /// Index buffer.
    #[must_use]
    pub fn new_index(num: usize) -> Self {
        Self::new(num, ElementKind::Uint1)
    }

    /// Number of live handles to the underlying buffer.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl GeometryBuffer {
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Element count.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.num
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false // num > 0 is a construction invariant
    }

    /// Total store size in bytes.
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.num * self.kind.size()
    }

    /// True while the CPU-side store has not been released.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.read().is_some()
    }

    #[must_use]
    pub fn gpu_id(&self) -> Option<GpuBufferId> {
        std::num::NonZeroU32::new(self.gpu_id.load(Ordering::Relaxed)).map(GpuBufferId)
    }

    // === Typed element access ===

    /// Reads element `i` as a float4.
    #[must_use]
    pub fn read_v4(&self, i: usize) -> Vec4 {
        debug_assert!(!self.kind.is_index(), "float read from an index buffer");
        let guard = self.data.read();
        let words = guard.as_ref().expect("backing store was released");
        let at = i * self.kind.words();
        Vec4::from_slice(bytemuck::cast_slice(&words[at..at + 4]))
    }

    /// Writes element `i` as a float4.
    pub fn write_v4(&self, i: usize, value: Vec4) {
        debug_assert!(!self.kind.is_index(), "float write to an index buffer");
        let mut guard = self.data.write();
        let words = guard.as_mut().expect("backing store was released");
        let at = i * self.kind.words();
        let floats: &mut [f32] = bytemuck::cast_slice_mut(&mut words[at..at + 4]);
        floats.copy_from_slice(&value.to_array());
    }

    /// Writes the xyz of element `i`, leaving the fourth component as is.
    pub fn write_v3(&self, i: usize, value: Vec3) {
        debug_assert!(!self.kind.is_index(), "float write to an index buffer");
        let mut guard = self.data.write();
        let words = guard.as_mut().expect("backing store was released");
        let at = i * self.kind.words();
        let floats: &mut [f32] = bytemuck::cast_slice_mut(&mut words[at..at + 3]);
        floats.copy_from_slice(&value.to_array());
    }

    #[must_use]
    pub fn read_index(&self, i: usize) -> u32 {
        assert!(self.kind.is_index(), "index read from a float buffer");
        let guard = self.data.read();
        let words = guard.as_ref().expect("backing store was released");
        words[i]
    }

    /// Writes a run of indices starting at element `start`.
    pub fn write_indices(&self, start: usize, values: &[u32]) {
        assert!(self.kind.is_index(), "index write to a float buffer");
        let mut guard = self.data.write();
        let words = guard.as_mut().expect("backing store was released");
        words[start..start + values.len()].copy_from_slice(values);
    }

    // === GPU lifecycle ===

    /// Uploads the store to the backend with the given usage hint.
    ///
    /// # Panics
    ///
    /// Panics if the buffer already has a GPU id (re-upload is not
    /// supported) or if the store was released.
    pub fn upload(&self, ctx: &mut dyn RenderBackend, hint: UsageHint) {
        assert!(self.gpu_id().is_none(), "geometry buffer already uploaded");
        let guard = self.data.read();
        let words = guard.as_ref().expect("backing store was released");
        let id = ctx.create_buffer(bytemuck::cast_slice(words.as_slice()), hint);
        self.gpu_id.store(id.0.get(), Ordering::Relaxed);
    }

    /// Drops the CPU-side store. Only valid after an upload.
    pub fn release(&self) {
        *self.data.write() = None;
    }

    /// Returns the GPU buffer to the backend.
    pub fn unload(&self, ctx: &mut dyn RenderBackend) {
        if let Some(id) = self.gpu_id() {
            ctx.destroy_buffer(id);
            self.gpu_id.store(0, Ordering::Relaxed);
        }
    }

    /// Points the attribute pipeline at the store, starting at
    /// `element_offset`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer was uploaded (binding an uploaded buffer by CPU
    /// pointer is invalid) or the store was released.
    pub fn bind(&self, ctx: &mut dyn RenderBackend, slot: AttributeSlot, element_offset: usize) {
        assert!(
            self.gpu_id().is_none(),
            "cannot bind an uploaded buffer by CPU pointer"
        );
        let guard = self.data.read();
        let words = guard.as_ref().expect("backing store was released");
        let at = element_offset * self.kind.words();
        ctx.bind_attribute(
            slot,
            self.kind.components(),
            self.kind.size(),
            bytemuck::cast_slice(&words[at..]),
        );
    }

    /// Issues an indexed draw of `num` indices starting at `element_offset`.
    ///
    /// # Panics
    ///
    /// Panics if this is not an index buffer, if it was uploaded, or if the
    /// store was released.
    pub fn draw_elements(
        &self,
        ctx: &mut dyn RenderBackend,
        topology: Topology,
        num: usize,
        element_offset: usize,
    ) {
        assert!(self.kind.is_index(), "indexed draw needs an index buffer");
        assert!(num > 0, "indexed draw of zero elements");
        assert!(
            self.gpu_id().is_none(),
            "cannot draw from an uploaded buffer by CPU pointer"
        );
        let guard = self.data.read();
        let words = guard.as_ref().expect("backing store was released");
        ctx.draw_indexed(topology, &words[element_offset..element_offset + num]);
    }

    // === Derived data ===

    /// Generates flat per-triangle normals for the first `num` elements of
    /// this vertex buffer, treated as a plain triangle list.
    ///
    /// Every triangle's three vertices receive the normalized cross product
    /// of the edges `v0 - v1` and `v0 - v2`. The returned buffer parallels
    /// this one. The loop stops two short of `num` stepping by three, so a
    /// count that is not a multiple of three leaves the trailing normals at
    /// their zero initialization.
    pub fn generate_triangle_normals(&self, num: usize) -> Result<BufferRef> {
        if self.kind != ElementKind::Float4 {
            return Err(PuckError::ElementKindMismatch {
                expected: ElementKind::Float4,
                found: self.kind,
            });
        }
        assert!(num <= self.num, "normal generation past the buffer end");

        let normals = BufferRef::new_v4(self.num);

        let guard = self.data.read();
        let words = guard.as_ref().expect("backing store was released");
        let read = |i: usize| -> Vec4 {
            let at = i * self.kind.words();
            Vec4::from_slice(bytemuck::cast_slice(&words[at..at + 4]))
        };

        let mut i = 0;
        while i + 2 < num {
            let v0 = read(i);
            let a = (v0 - read(i + 1)).truncate();
            let b = (v0 - read(i + 2)).truncate();
            let n = a.cross(b).normalize_or_zero();

            // The normals store is zero-initialized, so writing the xyz
            // alone leaves a well-formed direction vector (w = 0).
            normals.write_v3(i, n);
            normals.write_v3(i + 1, n);
            normals.write_v3(i + 2, n);
            i += 3;
        }

        Ok(normals)
    }

    /// Dumps the buffer metadata and contents to the log.
    pub fn debug(&self) {
        log::debug!(
            "buffer {} kind {:?} num {} gpu {:?}",
            self.id,
            self.kind,
            self.num,
            self.gpu_id()
        );
        if !self.has_data() {
            log::debug!("buffer {} store released", self.id);
            return;
        }
        for i in 0..self.num {
            if self.kind.is_index() {
                log::debug!("buffer {} [{}] {}", self.id, i, self.read_index(i));
            } else {
                log::debug!("buffer {} [{}] {}", self.id, i, self.read_v4(i));
            }
        }
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        // The backend owns GPU storage; without a context here the most we
        // can do is flag the leak.
        if let Some(id) = self.gpu_id() {
            log::debug!("buffer {} dropped with live GPU id {:?}", self.id, id);
        }
    }
}
