//! Transform stacks
//!
//! A pooled push/pop stack of 4x4 matrices, and the per-frame bundle of the
//! three stacks (model, projection, eye) the draw traversal works against.
//!
//! The scene traversal performs one push/pop pair per visited shape, every
//! frame. Popped nodes are therefore kept on a cache list and reused by the
//! next push, so a traversal of a scene that has already been drawn once
//! allocates nothing.

use glam::Mat4;

struct StackNode {
    matrix: Mat4,
    next: Option<Box<StackNode>>,
}

/// A stack of 4x4 matrices with a pooled backing store.
///
/// The stack always has a tip matrix to read or modify. `push` saves a copy
/// of the tip, `pop` restores the most recently saved copy. Popping past the
/// root is a contract violation and panics.
pub struct MatrixStack {
    tip: Mat4,
    saved: Option<Box<StackNode>>,
    cache: Option<Box<StackNode>>,
}

impl MatrixStack {
    /// Creates a stack whose tip is the identity matrix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tip: Mat4::IDENTITY,
            saved: None,
            cache: None,
        }
    }

    /// The current top-of-stack matrix.
    #[inline]
    #[must_use]
    pub fn tip(&self) -> &Mat4 {
        &self.tip
    }

    /// Mutable access to the top-of-stack matrix.
    #[inline]
    pub fn tip_mut(&mut self) -> &mut Mat4 {
        &mut self.tip
    }

    /// True iff no saved entries exist.
    ///
    /// Every well-formed traversal leaves the stack at its root; callers
    /// assert this around full-frame resets.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.saved.is_none()
    }

    /// Number of saved entries (push/pop instrumentation).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.saved.as_deref();
        while let Some(node) = cursor {
            count += 1;
            cursor = node.next.as_deref();
        }
        count
    }

    /// Number of nodes currently parked on the cache list.
    #[must_use]
    pub fn cached(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.cache.as_deref();
        while let Some(node) = cursor {
            count += 1;
            cursor = node.next.as_deref();
        }
        count
    }

    /// Saves a copy of the tip onto the stack.
    ///
    /// The node is taken from the cache list when one is available;
    /// otherwise a fresh node is allocated.
    pub fn push(&mut self) {
        let mut node = match self.cache.take() {
            Some(mut node) => {
                self.cache = node.next.take();
                node
            }
            None => Box::new(StackNode {
                matrix: Mat4::IDENTITY,
                next: None,
            }),
        };

        node.matrix = self.tip;
        node.next = self.saved.take();
        self.saved = Some(node);
    }

    /// Restores the most recently saved matrix into the tip.
    ///
    /// The unlinked node goes back onto the cache list for the next push.
    ///
    /// # Panics
    ///
    /// Panics if the stack is at its root.
    pub fn pop(&mut self) {
        let mut node = self
            .saved
            .take()
            .expect("pop past the root of a matrix stack");
        self.saved = node.next.take();
        self.tip = node.matrix;

        node.next = self.cache.take();
        self.cache = Some(node);
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MatrixStack {
    fn drop(&mut self) {
        // Unlink both chains iteratively so a deep stack cannot overflow
        // the call stack through nested Box drops.
        let mut list = self.saved.take();
        while let Some(mut node) = list {
            list = node.next.take();
        }
        let mut list = self.cache.take();
        while let Some(mut node) = list {
            list = node.next.take();
        }
    }
}

/// The three transform stacks a frame is drawn against.
///
/// The scene traversal pushes and pops only the model stack; projection and
/// eye are set once per frame and read during uniform setup.
#[derive(Default)]
pub struct TransformContext {
    pub model: MatrixStack,
    pub projection: MatrixStack,
    pub eye: MatrixStack,
}

impl TransformContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads identity into all three tips at the start of a frame.
    ///
    /// # Panics
    ///
    /// Panics if any stack still has saved entries: an unbalanced traversal
    /// must not be papered over by a reset.
    pub fn reset(&mut self) {
        assert!(self.model.is_root(), "model stack is not at its root");
        assert!(
            self.projection.is_root(),
            "projection stack is not at its root"
        );
        assert!(self.eye.is_root(), "eye stack is not at its root");

        *self.model.tip_mut() = Mat4::IDENTITY;
        *self.projection.tip_mut() = Mat4::IDENTITY;
        *self.eye.tip_mut() = Mat4::IDENTITY;
    }
}
