//! Light
//!
//! Directional light described by a look-at matrix, supplying the light
//! uniform block (enable flag, color, matrix and its inverse) before a full
//! draw pass.

use std::hash::{Hash, Hasher};

use glam::{Mat4, Vec3};
use uuid::Uuid;

use crate::render::backend::RenderBackend;
use crate::render::locations::ShaderLocations;

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub id: u64,
    pub color: Vec3,
    matrix: Mat4,
}

impl Light {
    fn generate_id_from_uuid(uuid: &Uuid) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        uuid.hash(&mut hasher);
        hasher.finish()
    }

    #[must_use]
    pub fn new(color: Vec3) -> Self {
        let uuid = Uuid::new_v4();
        Self {
            uuid,
            id: Self::generate_id_from_uuid(&uuid),
            color,
            matrix: Mat4::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Aims the light from `pos` toward `at`, replacing any previous
    /// transform.
    pub fn look_at(&mut self, pos: Vec3, at: Vec3, up: Vec3) {
        self.matrix = Mat4::look_at_rh(pos, at, up);
    }

    /// Uploads the light0 uniform block.
    pub fn supply(&self, loc: &ShaderLocations, ctx: &mut dyn RenderBackend) {
        ctx.set_uniform_u32(loc.light0_enabled, 1);
        ctx.set_uniform_vec3(loc.light0_color, self.color);
        ctx.set_uniform_mat4(loc.light0_matrix, &self.matrix);
        ctx.set_uniform_mat4(loc.light0_matrix_inv, &self.matrix.inverse());
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}
