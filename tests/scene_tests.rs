//! Scene graph tests
//!
//! Tests for:
//! - shape creation, linking rules, tree invariants (double-link, cycles)
//! - subtree removal and full teardown of shared resources
//! - primitive ownership swaps

use std::sync::Arc;

use glam::Vec4;
use puck::render::Topology;
use puck::resources::BufferRef;
use puck::{Primitive, SceneGraph, Shape};

fn triangle_primitive() -> (Primitive, BufferRef) {
    let vertices = BufferRef::new_v4(3);
    vertices.write_v4(0, Vec4::new(0.0, 0.0, 0.0, 1.0));
    vertices.write_v4(1, Vec4::new(1.0, 0.0, 0.0, 1.0));
    vertices.write_v4(2, Vec4::new(0.0, 1.0, 0.0, 1.0));

    let mut prim = Primitive::new(Topology::TriangleList);
    prim.num = 3;
    prim.set_vertex(0, &vertices);
    (prim, vertices)
}

// ============================================================================
// Creation & linking
// ============================================================================

#[test]
fn create_shape_starts_empty() {
    let mut graph = SceneGraph::new();
    let key = graph.create_shape();

    let shape = graph.get(key).unwrap();
    assert_eq!(shape.alter, glam::Mat4::IDENTITY);
    assert!(shape.primitive().is_none());
    assert!(shape.children().is_empty());
    assert!(shape.parent().is_none());
}

#[test]
fn link_sets_parent_and_child() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_shape();
    let child = graph.create_shape();

    graph.link(parent, child);

    assert_eq!(graph.get(child).unwrap().parent(), Some(parent));
    assert!(graph.get(parent).unwrap().children().contains(&child));
}

#[test]
#[should_panic(expected = "already linked")]
fn double_link_is_a_contract_violation() {
    let mut graph = SceneGraph::new();
    let a = graph.create_shape();
    let b = graph.create_shape();
    let child = graph.create_shape();

    graph.link(a, child);
    graph.link(b, child);
}

#[test]
#[should_panic(expected = "cannot link a shape to itself")]
fn self_link_is_a_contract_violation() {
    let mut graph = SceneGraph::new();
    let a = graph.create_shape();
    graph.link(a, a);
}

#[test]
#[should_panic(expected = "link would create a cycle")]
fn linking_an_ancestor_is_rejected() {
    let mut graph = SceneGraph::new();
    let root = graph.create_shape();
    let mid = graph.create_shape();
    let leaf = graph.create_shape();

    graph.link(root, mid);
    graph.link(mid, leaf);

    // root is an ancestor of leaf; hanging it below leaf would close a
    // cycle.
    graph.link(leaf, root);
}

// ============================================================================
// Removal / teardown
// ============================================================================

#[test]
fn removing_root_removes_all_children() {
    let mut graph = SceneGraph::new();
    let root = graph.create_shape();
    let mut keys = vec![root];
    for _ in 0..8 {
        let child = graph.create_shape();
        graph.link(root, child);
        keys.push(child);
    }
    assert_eq!(graph.len(), 9);

    graph.remove(root);

    assert!(graph.is_empty());
    for key in keys {
        assert!(graph.get(key).is_none());
    }
}

#[test]
fn removing_subtree_detaches_from_parent() {
    let mut graph = SceneGraph::new();
    let root = graph.create_shape();
    let branch = graph.create_shape();
    let leaf = graph.create_shape();
    graph.link(root, branch);
    graph.link(branch, leaf);

    graph.remove(branch);

    assert_eq!(graph.len(), 1);
    assert!(graph.get(root).unwrap().children().is_empty());
}

#[test]
fn teardown_releases_shared_buffers() {
    let mut graph = SceneGraph::new();
    let (prim, vertices) = triangle_primitive();
    let prim = Arc::new(prim);

    let root = graph.create_shape();
    for _ in 0..3 {
        let child = graph.create_shape();
        graph.set_primitive(child, prim.clone());
        graph.link(root, child);
    }

    // Test handle + one per child shape.
    assert_eq!(Arc::strong_count(&prim), 4);
    // Test handle + the binding inside the primitive.
    assert_eq!(vertices.handle_count(), 2);

    graph.remove(root);
    assert!(graph.is_empty());
    assert_eq!(Arc::strong_count(&prim), 1);

    drop(prim);
    assert_eq!(vertices.handle_count(), 1, "buffer must outlive no primitive");
}

#[test]
fn deep_tree_teardown_does_not_recurse() {
    let mut graph = SceneGraph::new();
    let root = graph.create_shape();
    let mut tail = root;
    for _ in 0..10_000 {
        let next = graph.create_shape();
        graph.link(tail, next);
        tail = next;
    }

    graph.remove(root);
    assert!(graph.is_empty());
}

#[test]
fn remove_of_stale_key_is_a_noop() {
    let mut graph = SceneGraph::new();
    let key = graph.create_shape();
    graph.remove(key);
    graph.remove(key);
    assert!(graph.is_empty());
}

// ============================================================================
// Primitive ownership
// ============================================================================

#[test]
fn set_primitive_swaps_ownership() {
    let mut graph = SceneGraph::new();
    let key = graph.create_shape();

    let (first, _first_buf) = triangle_primitive();
    let first = Arc::new(first);
    graph.set_primitive(key, first.clone());
    assert_eq!(Arc::strong_count(&first), 2);

    let (second, _second_buf) = triangle_primitive();
    graph.set_primitive(key, Arc::new(second));

    // The swap released the shape's reference to the first primitive.
    assert_eq!(Arc::strong_count(&first), 1);
}

#[test]
fn shape_alter_is_writable_in_place() {
    let mut graph = SceneGraph::new();
    let key = graph.insert(Shape::new());
    let translation = glam::Mat4::from_translation(glam::Vec3::new(2.0, 0.0, 0.0));
    graph.get_mut(key).unwrap().alter = translation;
    assert_eq!(graph.get(key).unwrap().alter, translation);
}
