//! Shader location table
//!
//! Attribute and uniform slot identifiers handed over by the shader
//! collaborator. The scene core treats them as opaque keys: it never
//! interprets a slot beyond passing it back to the backend together with a
//! value.

/// Backend-specific identifier of a vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSlot(pub u32);

/// Backend-specific identifier of a shader uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformSlot(pub u32);

/// The complete slot table a compiled shader exposes to the scene core.
#[derive(Clone, Copy, Debug)]
pub struct ShaderLocations {
    // === Vertex attributes ===
    pub vertex: AttributeSlot,
    pub color: AttributeSlot,
    pub normal: AttributeSlot,

    // === Uniforms ===
    /// Combined projection * eye * model matrix.
    pub proj_eye_model: UniformSlot,
    /// Model matrix alone.
    pub model: UniformSlot,
    /// Inverse of the model matrix, for normal transformation.
    pub model_inv: UniformSlot,
    /// Camera position in world space.
    pub camera_pos: UniformSlot,
    /// Flat draw color used by the silhouette and normals passes.
    pub flat_color: UniformSlot,
    pub light0_enabled: UniformSlot,
    pub light0_color: UniformSlot,
    pub light0_matrix: UniformSlot,
    pub light0_matrix_inv: UniformSlot,
}

impl ShaderLocations {
    /// A placeholder table with distinct sequential ids.
    ///
    /// Useful for headless runs against a recording backend; a real shader
    /// collaborator supplies the queried locations instead.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            vertex: AttributeSlot(0),
            color: AttributeSlot(1),
            normal: AttributeSlot(2),
            proj_eye_model: UniformSlot(0),
            model: UniformSlot(1),
            model_inv: UniformSlot(2),
            camera_pos: UniformSlot(3),
            flat_color: UniformSlot(4),
            light0_enabled: UniformSlot(5),
            light0_color: UniformSlot(6),
            light0_matrix: UniformSlot(7),
            light0_matrix_inv: UniformSlot(8),
        }
    }
}
