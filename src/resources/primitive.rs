//! Draw primitives
//!
//! A primitive binds up to four geometry buffers (vertex, color, normal,
//! index) at per-role element offsets and knows how to issue itself to the
//! backend in one of the three draw modes. Buffers are shared: several
//! primitives may reference disjoint or overlapping regions of the same
//! buffer through different offsets.

use glam::Vec4;
use uuid::Uuid;

use crate::errors::{PuckError, Result};
use crate::render::backend::{RenderBackend, Topology};
use crate::render::locations::ShaderLocations;
use crate::resources::buffer::{BufferRef, ElementKind};
use crate::transform::TransformContext;

/// How a subtree is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Lit geometry: vertex, color and normal attributes.
    Full,
    /// Flat black outline pass over the vertex attribute alone.
    Silhouette,
    /// Debug visualization drawing every normal as a line segment.
    Normals,
}

/// A buffer reference plus the element offset it is bound at.
#[derive(Debug, Clone)]
pub struct BufferBinding {
    pub offset: usize,
    pub buffer: BufferRef,
}

/// A drawable unit of geometry.
#[derive(Debug)]
pub struct Primitive {
    pub uuid: Uuid,
    pub topology: Topology,
    /// Elements drawn: vertices for plain draws, indices for indexed ones.
    pub num: usize,

    vertex: Option<BufferBinding>,
    color: Option<BufferBinding>,
    normal: Option<BufferBinding>,
    index: Option<BufferBinding>,
}

impl Primitive {
    /// Creates an empty primitive; buffers are attached one at a time.
    #[must_use]
    pub fn new(topology: Topology) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            topology,
            num: 0,
            vertex: None,
            color: None,
            normal: None,
            index: None,
        }
    }

    /// Creates a primitive with an embedded index buffer of `index_count`
    /// elements; `num` is set to draw all of them.
    #[must_use]
    pub fn new_indexed(topology: Topology, index_count: usize) -> Self {
        let mut prim = Self::new(topology);
        prim.num = index_count;
        prim.index = Some(BufferBinding {
            offset: 0,
            buffer: BufferRef::new_index(index_count),
        });
        prim
    }

    #[must_use]
    pub fn vertex(&self) -> Option<&BufferBinding> {
        self.vertex.as_ref()
    }

    #[must_use]
    pub fn color(&self) -> Option<&BufferBinding> {
        self.color.as_ref()
    }

    #[must_use]
    pub fn normal(&self) -> Option<&BufferBinding> {
        self.normal.as_ref()
    }

    #[must_use]
    pub fn index(&self) -> Option<&BufferBinding> {
        self.index.as_ref()
    }

    // === Typed buffer setters ===
    //
    // Each swap releases the previous occupant's reference and takes one on
    // the new buffer. Kind checks are contract assertions, not errors.

    pub fn set_vertex(&mut self, offset: usize, buffer: &BufferRef) {
        assert_eq!(
            buffer.kind(),
            ElementKind::Float4,
            "vertex buffer must be Float4"
        );
        self.vertex = Some(BufferBinding {
            offset,
            buffer: buffer.clone(),
        });
    }

    pub fn set_color(&mut self, offset: usize, buffer: &BufferRef) {
        assert_eq!(
            buffer.kind(),
            ElementKind::Float4,
            "color buffer must be Float4"
        );
        self.color = Some(BufferBinding {
            offset,
            buffer: buffer.clone(),
        });
    }

    pub fn set_normal(&mut self, offset: usize, buffer: &BufferRef) {
        assert_eq!(
            buffer.kind(),
            ElementKind::Float4,
            "normal buffer must be Float4"
        );
        self.normal = Some(BufferBinding {
            offset,
            buffer: buffer.clone(),
        });
    }

    pub fn set_index(&mut self, offset: usize, buffer: &BufferRef) {
        assert!(buffer.kind().is_index(), "index buffer must be Uint1");
        self.index = Some(BufferBinding {
            offset,
            buffer: buffer.clone(),
        });
    }

    /// Generates flat triangle normals and attaches them at offset 0.
    ///
    /// Only plain triangle lists are supported; an attached index buffer or
    /// a non-Float4 vertex buffer is reported as an error.
    pub fn generate_normals(&mut self) -> Result<()> {
        let vertex = self
            .vertex
            .as_ref()
            .expect("vertex buffer must be set before normal generation");

        if self.index.is_some() {
            return Err(PuckError::IndexedNormalGeneration);
        }

        let normals = vertex.buffer.generate_triangle_normals(self.num)?;
        self.set_normal(0, &normals);
        Ok(())
    }

    /// Issues this primitive to the backend.
    ///
    /// Uniform setup always uploads the combined projection*eye*model
    /// matrix; the remaining uniforms and attribute work depend on `mode`.
    ///
    /// # Panics
    ///
    /// Panics if `num` is zero or a buffer the mode requires is missing:
    /// geometry must be fully specified before the first draw.
    pub fn draw(
        &self,
        mode: DrawMode,
        loc: &ShaderLocations,
        trans: &TransformContext,
        ctx: &mut dyn RenderBackend,
    ) {
        assert!(self.num > 0, "primitive has no elements to draw");

        self.setup_uniforms(mode, loc, trans, ctx);

        match mode {
            DrawMode::Full => {
                let vertex = self.vertex.as_ref().expect("full draw needs a vertex buffer");
                let color = self.color.as_ref().expect("full draw needs a color buffer");
                let normal = self.normal.as_ref().expect("full draw needs a normal buffer");

                ctx.enable_attribute(loc.vertex);
                ctx.enable_attribute(loc.color);
                ctx.enable_attribute(loc.normal);
                vertex.buffer.bind(ctx, loc.vertex, vertex.offset);
                normal.buffer.bind(ctx, loc.normal, normal.offset);
                color.buffer.bind(ctx, loc.color, color.offset);

                self.issue(ctx);
            }
            DrawMode::Silhouette => {
                let vertex = self
                    .vertex
                    .as_ref()
                    .expect("silhouette draw needs a vertex buffer");

                ctx.enable_attribute(loc.vertex);
                vertex.buffer.bind(ctx, loc.vertex, vertex.offset);

                self.issue(ctx);
            }
            DrawMode::Normals => {
                let vertex = self
                    .vertex
                    .as_ref()
                    .expect("normals draw needs a vertex buffer");
                let normal = self
                    .normal
                    .as_ref()
                    .expect("normals draw needs a normal buffer");

                ctx.enable_attribute(loc.vertex);

                // One segment and one draw call per vertex. This is a debug
                // path; batching is not worth the bookkeeping here.
                for i in 0..self.num {
                    let v = vertex.buffer.read_v4(vertex.offset + i);
                    let n = normal.buffer.read_v4(normal.offset + i);
                    let segment = [v, v + n];
                    ctx.bind_attribute(loc.vertex, 4, 16, bytemuck::cast_slice(segment.as_slice()));
                    ctx.draw_arrays(Topology::LineList, 0, 2);
                }
            }
        }
    }

    fn setup_uniforms(
        &self,
        mode: DrawMode,
        loc: &ShaderLocations,
        trans: &TransformContext,
        ctx: &mut dyn RenderBackend,
    ) {
        let combined = *trans.projection.tip() * *trans.eye.tip() * *trans.model.tip();
        ctx.set_uniform_mat4(loc.proj_eye_model, &combined);

        match mode {
            DrawMode::Full => {
                ctx.set_uniform_mat4(loc.model, trans.model.tip());
                ctx.set_uniform_mat4(loc.model_inv, &trans.model.tip().inverse());
            }
            DrawMode::Silhouette => {
                ctx.set_uniform_vec4(loc.flat_color, Vec4::new(0.0, 0.0, 0.0, 1.0));
            }
            DrawMode::Normals => {
                ctx.set_uniform_vec4(loc.flat_color, Vec4::new(1.0, 0.1, 0.1, 1.0));
            }
        }
    }

    /// Indexed draw when an index buffer is attached, plain draw otherwise.
    fn issue(&self, ctx: &mut dyn RenderBackend) {
        if let Some(index) = &self.index {
            index
                .buffer
                .draw_elements(ctx, self.topology, self.num, index.offset);
        } else {
            ctx.draw_arrays(self.topology, 0, self.num as u32);
        }
    }

    /// Dumps this primitive and its buffers to the log.
    pub fn debug(&self) {
        log::debug!(
            "primitive {} topology {:?} num {}",
            self.uuid,
            self.topology,
            self.num
        );
        for (role, binding) in [
            ("vertex", &self.vertex),
            ("color", &self.color),
            ("normal", &self.normal),
            ("index", &self.index),
        ] {
            match binding {
                Some(b) => {
                    log::debug!(
                        "primitive {} {} buffer {} offset {}",
                        self.uuid,
                        role,
                        b.buffer.id(),
                        b.offset
                    );
                    b.buffer.debug();
                }
                None => log::debug!("primitive {} {} unset", self.uuid, role),
            }
        }
    }
}
