//! Scene shape node
//!
//! A shape is one node of the scene tree: a local transform, at most one
//! primitive, and ownership links to child shapes. Shapes live in the
//! [`SceneGraph`] arena and reference each other by key.
//!
//! [`SceneGraph`]: crate::scene::graph::SceneGraph

use std::sync::Arc;

use glam::Mat4;
use smallvec::SmallVec;

use crate::resources::primitive::Primitive;
use crate::scene::ShapeKey;

#[derive(Debug, Clone, Default)]
pub struct Shape {
    /// Local transform, applied relative to the parent during traversal.
    pub alter: Mat4,
    pub(crate) primitive: Option<Arc<Primitive>>,
    pub(crate) parent: Option<ShapeKey>,
    pub(crate) children: SmallVec<[ShapeKey; 4]>,
}

impl Shape {
    /// Creates an empty shape: identity transform, no primitive, no
    /// children.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alter: Mat4::IDENTITY,
            primitive: None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ShapeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[ShapeKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn primitive(&self) -> Option<&Arc<Primitive>> {
        self.primitive.as_ref()
    }

    /// Swaps the owned primitive reference; the previous occupant's
    /// reference is released.
    pub fn set_primitive(&mut self, primitive: Arc<Primitive>) {
        self.primitive = Some(primitive);
    }
}
