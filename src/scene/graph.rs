//! Scene graph
//!
//! The arena that owns every shape, the linking rules that keep the
//! structure a tree, and the depth-first draw traversal that accumulates
//! world transforms on the model matrix stack.

use std::sync::Arc;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::render::backend::RenderBackend;
use crate::render::locations::ShaderLocations;
use crate::resources::primitive::{DrawMode, Primitive};
use crate::scene::shape::Shape;
use crate::scene::ShapeKey;
use crate::transform::TransformContext;

/// Work item of the iterative traversals.
enum WalkOp {
    Enter(ShapeKey),
    Leave,
}

/// Arena of [`Shape`] nodes forming a forest of trees.
///
/// Ownership is exclusive: every shape has at most one parent, and removing
/// a shape removes its whole subtree. Shared data (primitives, buffers)
/// lives behind its own handles and survives as long as anything references
/// it.
#[derive(Default)]
pub struct SceneGraph {
    shapes: SlotMap<ShapeKey, Shape>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, shape: Shape) -> ShapeKey {
        self.shapes.insert(shape)
    }

    /// Inserts a fresh empty shape.
    pub fn create_shape(&mut self) -> ShapeKey {
        self.shapes.insert(Shape::new())
    }

    #[must_use]
    pub fn get(&self, key: ShapeKey) -> Option<&Shape> {
        self.shapes.get(key)
    }

    #[must_use]
    pub fn get_mut(&mut self, key: ShapeKey) -> Option<&mut Shape> {
        self.shapes.get_mut(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Swaps the primitive owned by `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not in the graph.
    pub fn set_primitive(&mut self, key: ShapeKey, primitive: Arc<Primitive>) {
        self.shapes
            .get_mut(key)
            .expect("shape not in graph")
            .set_primitive(primitive);
    }

    /// Links `child` under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either key is stale, if `child` already has a parent, or
    /// if the link would close a cycle (i.e. `child` is an ancestor of
    /// `parent`). The tree invariant is enforced here so the traversals can
    /// trust it.
    pub fn link(&mut self, parent: ShapeKey, child: ShapeKey) {
        assert_ne!(parent, child, "cannot link a shape to itself");
        assert!(self.shapes.contains_key(parent), "parent shape not in graph");

        let child_shape = self.shapes.get(child).expect("child shape not in graph");
        assert!(
            child_shape.parent.is_none(),
            "shape is already linked to a parent"
        );

        let mut cursor = Some(parent);
        while let Some(key) = cursor {
            assert_ne!(key, child, "link would create a cycle");
            cursor = self.shapes[key].parent;
        }

        self.shapes[child].parent = Some(parent);
        self.shapes[parent].children.push(child);
    }

    /// Removes `root` and its entire subtree.
    ///
    /// Runs iteratively, so teardown depth is bounded by heap, not call
    /// stack. Dropping each shape releases its primitive reference, which
    /// in turn may release buffers.
    pub fn remove(&mut self, root: ShapeKey) {
        let Some(shape) = self.shapes.get(root) else {
            return;
        };
        if let Some(parent) = shape.parent {
            let siblings = &mut self.shapes[parent].children;
            if let Some(at) = siblings.iter().position(|&k| k == root) {
                siblings.remove(at);
            }
        }

        let mut work: SmallVec<[ShapeKey; 16]> = SmallVec::new();
        work.push(root);
        while let Some(key) = work.pop() {
            if let Some(shape) = self.shapes.remove(key) {
                work.extend(shape.children);
            }
        }
    }

    /// Draws the subtree under `root`.
    ///
    /// For every visited shape the model stack is pushed, the tip is
    /// right-multiplied by the shape's local transform, the primitive (if
    /// any) is drawn against the accumulated stacks, the children are
    /// visited, and the stack is popped, so the model stack depth after
    /// this call is exactly what it was on entry, for any tree.
    ///
    /// Children are visited most-recently-linked first; sibling order
    /// carries no meaning beyond that.
    pub fn draw(
        &self,
        root: ShapeKey,
        mode: DrawMode,
        loc: &ShaderLocations,
        trans: &mut TransformContext,
        ctx: &mut dyn RenderBackend,
    ) {
        let mut work: Vec<WalkOp> = Vec::with_capacity(64);
        work.push(WalkOp::Enter(root));

        while let Some(op) = work.pop() {
            match op {
                WalkOp::Enter(key) => {
                    let Some(shape) = self.shapes.get(key) else {
                        continue;
                    };

                    trans.model.push();
                    let tip = trans.model.tip_mut();
                    *tip = *tip * shape.alter;

                    if let Some(primitive) = &shape.primitive {
                        primitive.draw(mode, loc, trans, ctx);
                    }

                    work.push(WalkOp::Leave);
                    work.extend(shape.children.iter().map(|&c| WalkOp::Enter(c)));
                }
                WalkOp::Leave => trans.model.pop(),
            }
        }

        if let Some(error) = ctx.take_error() {
            log::warn!("backend error during draw: {error}");
        }
    }

    /// Dumps the subtree under `root` to the log.
    pub fn debug(&self, root: ShapeKey) {
        let mut work: SmallVec<[(ShapeKey, usize); 16]> = SmallVec::new();
        work.push((root, 0));
        while let Some((key, depth)) = work.pop() {
            let Some(shape) = self.shapes.get(key) else {
                continue;
            };
            log::debug!(
                "shape {key:?} depth {depth} children {}",
                shape.children.len()
            );
            if let Some(primitive) = &shape.primitive {
                primitive.debug();
            }
            work.extend(shape.children.iter().map(|&c| (c, depth + 1)));
        }
    }
}
