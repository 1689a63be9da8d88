//! Scene graph module
//!
//! The shape tree and its collaborators:
//! - `Shape`: one node (local transform + optional primitive + children)
//! - `SceneGraph`: arena owning all shapes, linking rules, draw traversal
//! - `Eye` / `Light`: view and light value objects

pub mod eye;
pub mod graph;
pub mod light;
pub mod shape;

pub use eye::Eye;
pub use graph::SceneGraph;
pub use light::Light;
pub use shape::Shape;

use slotmap::new_key_type;

new_key_type! {
    /// Stable key of a shape inside a [`SceneGraph`].
    pub struct ShapeKey;
}
