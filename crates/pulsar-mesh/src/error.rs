//! Error types for pulsar-mesh.

use thiserror::Error;

/// Errors that can occur while building a mesh or topology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Radius was zero, negative, infinite or NaN.
    #[error("invalid radius: {0} (must be positive and finite)")]
    InvalidRadius(f32),

    /// Length was zero, negative, infinite or NaN.
    #[error("invalid length: {0} (must be positive and finite)")]
    InvalidLength(f32),

    /// Fewer than 3 meridians requested for a sphere.
    #[error("too few meridians: {0} (minimum 3)")]
    TooFewMeridians(u32),

    /// Fewer than 1 parallel requested for a sphere.
    #[error("too few parallels: {0} (minimum 1)")]
    TooFewParallels(u32),

    /// Fewer than 3 radial divisions requested for a cylinder.
    #[error("too few radial divisions: {0} (minimum 3)")]
    TooFewDivisions(u32),

    /// The requested resolution needs more vertices than `u32` indices
    /// can address.
    #[error("mesh needs {count} vertices, at most {max} can be indexed")]
    TooManyVertices {
        /// Vertices the parameters call for.
        count: u64,
        /// Largest addressable vertex count.
        max: u64,
    },

    /// Edge derivation did not produce the expected edge count.
    ///
    /// This is an internal defect (wrong tolerance or vertex formula),
    /// never a consequence of caller input.
    #[error("edge derivation produced {found} edges, expected {expected}")]
    EdgeCountMismatch {
        /// Number of edges accepted.
        found: usize,
        /// Number of edges the topology must have.
        expected: usize,
    },
}

/// Result type for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// Largest vertex count a mesh with `u32` indices can address.
pub const MAX_VERTICES: u64 = 1 << 32;

/// Returns true for finite values above zero.
pub(crate) fn is_positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Validates a strictly positive, finite radius.
pub(crate) fn positive_radius(radius: f32) -> MeshResult<f32> {
    if is_positive_finite(radius) {
        Ok(radius)
    } else {
        Err(MeshError::InvalidRadius(radius))
    }
}

/// Validates that `count` vertices fit in `u32` indices.
pub(crate) fn addressable(count: u64) -> MeshResult<()> {
    if count <= MAX_VERTICES {
        Ok(())
    } else {
        Err(MeshError::TooManyVertices {
            count,
            max: MAX_VERTICES,
        })
    }
}
