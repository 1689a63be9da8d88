//! Error Types
//!
//! Failure modes of the geometry and scene construction APIs.
//!
//! Contract violations (drawing without a vertex buffer, popping a matrix
//! stack past its root, double-linking a shape) are programmer errors and
//! panic instead of returning a variant; see the assertions on the
//! individual operations.

use thiserror::Error;

use crate::resources::buffer::ElementKind;

/// The main error type for the puck engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuckError {
    /// A buffer with the wrong element kind was passed to a typed operation.
    #[error("element kind mismatch: expected {expected:?}, found {found:?}")]
    ElementKindMismatch {
        /// The element kind the operation requires.
        expected: ElementKind,
        /// The element kind of the buffer that was passed.
        found: ElementKind,
    },

    /// Normal generation only supports plain (non-indexed) triangle lists.
    #[error("normal generation is unsupported for indexed primitives")]
    IndexedNormalGeneration,

    /// Procedural geometry was requested with non-positive extents.
    #[error("degenerate extents: all components must be strictly positive")]
    DegenerateExtents,
}

/// Alias for `Result<T, PuckError>`.
pub type Result<T> = std::result::Result<T, PuckError>;
