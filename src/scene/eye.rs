//! Eye (camera view)
//!
//! A small value object holding the view matrix and the camera's world
//! position. It does not live in the shape tree: the caller applies it onto
//! the eye stack once per frame and supplies the position uniform before
//! the full draw pass.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::render::backend::RenderBackend;
use crate::render::locations::ShaderLocations;
use crate::transform::MatrixStack;

#[derive(Debug, Clone)]
pub struct Eye {
    position: Vec4,
    matrix: Mat4,
}

impl Eye {
    /// An eye at the origin looking down the default axis.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec4 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Rotates the view by `angle` radians around `axis`.
    ///
    /// Previous transforms are preserved; call [`Eye::reset`] first if that
    /// is not wanted.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        let rotation = Mat4::from_quat(Quat::from_axis_angle(axis.normalize(), angle));
        self.matrix *= rotation;
    }

    /// Places the eye at `pos` looking at `at`, replacing any previous
    /// transform.
    pub fn look_at(&mut self, pos: Vec3, at: Vec3, up: Vec3) {
        self.position = pos.extend(1.0);
        self.matrix = Mat4::look_at_rh(pos, at, up);
    }

    /// Multiplies the view matrix onto the tip of the eye stack.
    pub fn apply(&self, stack: &mut MatrixStack) {
        let tip = stack.tip_mut();
        *tip = *tip * self.matrix;
    }

    /// Uploads the camera position uniform.
    pub fn supply(&self, loc: &ShaderLocations, ctx: &mut dyn RenderBackend) {
        ctx.set_uniform_vec4(loc.camera_pos, self.position);
    }
}

impl Default for Eye {
    fn default() -> Self {
        Self::new()
    }
}
