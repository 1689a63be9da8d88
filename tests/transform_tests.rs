//! Matrix stack tests
//!
//! Tests for:
//! - push/pop balance and tip save/restore
//! - node pooling across balanced traversals
//! - root invariants and full-frame reset
//! - TransformContext independence of the three axes

use glam::{Mat4, Vec3};
use puck::transform::{MatrixStack, TransformContext};

const EPSILON: f32 = 1e-5;

fn mat4_approx(a: &Mat4, b: &Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() < EPSILON)
}

// ============================================================================
// Push / Pop
// ============================================================================

#[test]
fn fresh_stack_is_root_identity() {
    let stack = MatrixStack::new();
    assert!(stack.is_root());
    assert_eq!(stack.depth(), 0);
    assert_eq!(*stack.tip(), Mat4::IDENTITY);
}

#[test]
fn push_saves_and_pop_restores() {
    let mut stack = MatrixStack::new();
    *stack.tip_mut() = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

    stack.push();
    assert_eq!(stack.depth(), 1);
    assert!(!stack.is_root());

    // Mutations after the push must not leak into the saved entry.
    *stack.tip_mut() = Mat4::from_translation(Vec3::new(9.0, 9.0, 9.0));
    stack.pop();

    assert!(stack.is_root());
    assert!(mat4_approx(
        stack.tip(),
        &Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
    ));
}

#[test]
fn nested_push_pop_restores_each_level() {
    let mut stack = MatrixStack::new();
    let levels = [
        Mat4::from_translation(Vec3::X),
        Mat4::from_translation(Vec3::Y),
        Mat4::from_translation(Vec3::Z),
    ];

    for level in &levels {
        stack.push();
        *stack.tip_mut() = *stack.tip() * *level;
    }
    assert_eq!(stack.depth(), 3);

    stack.pop();
    stack.pop();
    assert!(mat4_approx(stack.tip(), &levels[0]));
    stack.pop();
    assert!(stack.is_root());
    assert_eq!(*stack.tip(), Mat4::IDENTITY);
}

// ============================================================================
// Pooling
// ============================================================================

#[test]
fn balanced_cycles_do_not_grow_the_pool() {
    let mut stack = MatrixStack::new();

    // First round populates the cache to the maximum depth used.
    for _ in 0..4 {
        stack.push();
    }
    for _ in 0..4 {
        stack.pop();
    }
    assert_eq!(stack.cached(), 4);

    // Every later round must reuse those nodes.
    for _ in 0..10 {
        for _ in 0..4 {
            stack.push();
        }
        for _ in 0..4 {
            stack.pop();
        }
    }
    assert_eq!(stack.cached(), 4, "pool grew across balanced traversals");
}

// ============================================================================
// TransformContext
// ============================================================================

#[test]
fn context_axes_are_independent() {
    let mut trans = TransformContext::new();
    *trans.projection.tip_mut() = Mat4::from_translation(Vec3::X);
    *trans.eye.tip_mut() = Mat4::from_translation(Vec3::Y);

    trans.model.push();
    *trans.model.tip_mut() = Mat4::from_translation(Vec3::Z);
    trans.model.pop();

    assert!(mat4_approx(
        trans.projection.tip(),
        &Mat4::from_translation(Vec3::X)
    ));
    assert!(mat4_approx(trans.eye.tip(), &Mat4::from_translation(Vec3::Y)));
    assert_eq!(*trans.model.tip(), Mat4::IDENTITY);
}

#[test]
fn reset_at_root_reloads_all_tips() {
    let mut trans = TransformContext::new();
    *trans.model.tip_mut() = Mat4::from_translation(Vec3::X);
    *trans.projection.tip_mut() = Mat4::from_translation(Vec3::Y);
    *trans.eye.tip_mut() = Mat4::from_translation(Vec3::Z);

    trans.reset();

    assert_eq!(*trans.model.tip(), Mat4::IDENTITY);
    assert_eq!(*trans.projection.tip(), Mat4::IDENTITY);
    assert_eq!(*trans.eye.tip(), Mat4::IDENTITY);
}

#[test]
#[should_panic(expected = "eye stack is not at its root")]
fn reset_rejects_unbalanced_eye_stack() {
    let mut trans = TransformContext::new();
    trans.eye.push();
    trans.reset();
}
