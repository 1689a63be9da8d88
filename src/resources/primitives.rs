//! Procedural shapes
//!
//! Builders that assemble multi-primitive shapes out of shared geometry
//! buffers. The cylinder is the workhorse of the air-hockey scene (paddles
//! and puck): one vertex buffer serves the bottom cap, top cap and side
//! wall through three primitives at different offsets.

use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::errors::{PuckError, Result};
use crate::render::backend::Topology;
use crate::resources::buffer::BufferRef;
use crate::resources::primitive::Primitive;
use crate::scene::graph::SceneGraph;
use crate::scene::shape::Shape;
use crate::scene::ShapeKey;

pub struct CylinderOptions {
    /// Half-extents: x/y are the ellipse radii, z the half-height.
    pub extents: Vec3,
    pub color: Vec4,
    /// Points per cap ring, center included. Clamped to at least 5.
    pub detail: usize,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            extents: Vec3::ONE,
            color: Vec4::ONE,
            detail: 10,
        }
    }
}

/// Builds a cylinder as one parent shape with three children: bottom cap,
/// top cap and side wall.
///
/// The caps are indexed triangle fans over the two rings at the front of
/// the shared vertex buffer; the bottom fan runs in reverse rim order so it
/// faces down. The side wall is a plain triangle list whose duplicated
/// vertices (with radial normals) sit past the rings and are drawn at that
/// vertex offset.
///
/// Returns the parent shape key, unlinked; callers hang it wherever it
/// belongs in their scene.
pub fn create_cylinder(graph: &mut SceneGraph, options: &CylinderOptions) -> Result<ShapeKey> {
    let extents = options.extents;
    if extents.min_element() <= 0.0 {
        return Err(PuckError::DegenerateExtents);
    }

    let detail = options.detail.max(5);
    let ring = detail; // center + (detail - 1) rim points
    let side_count = 6 * (detail - 1);
    let total = 2 * ring + side_count;

    let vertices = BufferRef::new_v4(total);
    let normals = BufferRef::new_v4(total);
    let colors = BufferRef::new_v4(total);

    // Rim angle step; the wraparound segment closes the full circle.
    let step = 2.0 * PI / (detail - 1) as f32;
    let rim = |i: usize, z: f32| -> Vec4 {
        let angle = (i - 1) as f32 * step;
        Vec4::new(
            angle.cos() * extents.x,
            angle.sin() * extents.y,
            z,
            1.0,
        )
    };

    // === Cap rings ===
    vertices.write_v4(0, Vec4::new(0.0, 0.0, -extents.z, 1.0));
    vertices.write_v4(ring, Vec4::new(0.0, 0.0, extents.z, 1.0));
    for i in 1..detail {
        vertices.write_v4(i, rim(i, -extents.z));
        vertices.write_v4(ring + i, rim(i, extents.z));
    }
    for i in 0..ring {
        normals.write_v4(i, Vec4::new(0.0, 0.0, -1.0, 0.0));
        normals.write_v4(ring + i, Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    // === Side wall ===
    //
    // Two triangles per rim segment, vertices duplicated past the rings so
    // they can carry radial normals instead of the cap normals.
    let mut at = 2 * ring;
    for seg in 0..detail - 1 {
        let b0 = 1 + seg;
        let b1 = if seg + 1 == detail - 1 { 1 } else { 2 + seg };
        let t0 = ring + b0;
        let t1 = ring + b1;

        for source in [b0, b1, t0, t1, t0, b1] {
            let position = vertices.read_v4(source);
            let rim_index = if source >= ring { source - ring } else { source };
            let angle = (rim_index - 1) as f32 * step;
            vertices.write_v4(at, position);
            normals.write_v4(at, Vec4::new(angle.cos(), angle.sin(), 0.0, 0.0));
            at += 1;
        }
    }

    for i in 0..total {
        colors.write_v4(i, options.color);
    }

    // === Bottom fan: reverse rim order so the cap faces down ===
    let mut bottom = Primitive::new_indexed(Topology::TriangleFan, detail + 1);
    let mut fan = vec![0u32];
    fan.extend((1..detail).map(|i| (detail - i) as u32));
    fan.push((detail - 1) as u32);
    bottom.index().unwrap().buffer.write_indices(0, &fan);
    bottom.set_vertex(0, &vertices);
    bottom.set_color(0, &colors);
    bottom.set_normal(0, &normals);

    // === Top fan ===
    let mut top = Primitive::new_indexed(Topology::TriangleFan, detail + 1);
    let mut fan = vec![detail as u32];
    fan.extend((1..detail).map(|i| (detail + i) as u32));
    fan.push((detail + 1) as u32);
    top.index().unwrap().buffer.write_indices(0, &fan);
    top.set_vertex(0, &vertices);
    top.set_color(0, &colors);
    top.set_normal(0, &normals);

    // === Side wall: plain draw at the duplicated-vertex offset ===
    let mut side = Primitive::new(Topology::TriangleList);
    side.num = side_count;
    side.set_vertex(2 * ring, &vertices);
    side.set_color(2 * ring, &colors);
    side.set_normal(2 * ring, &normals);

    let parent = graph.insert(Shape::new());
    for prim in [bottom, top, side] {
        let child = graph.insert(Shape::new());
        graph.set_primitive(child, Arc::new(prim));
        graph.link(parent, child);
    }

    Ok(parent)
}
