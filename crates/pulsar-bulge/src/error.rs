//! Bulge simulation error types.

use pulsar_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur while setting up a bulge simulation.
///
/// Every variant is raised at construction; stepping a simulator never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BulgeError {
    /// Building the underlying mesh failed.
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// A configured range has `min > max` or a NaN bound.
    #[error("invalid {name} range: [{min}, {max}]")]
    InvalidRange {
        /// Which setting the range belongs to.
        name: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// A range that must stay above zero has a lower bound at or below it.
    #[error("invalid {name} range: [{min}, {max}] (lower bound must be positive)")]
    NonPositiveRange {
        /// Which setting the range belongs to.
        name: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// The wireframe overlay scale was zero, negative, infinite or NaN.
    #[error("invalid wireframe scale: {0} (must be positive and finite)")]
    InvalidWireScale(f32),

    /// The base vertex buffer was empty.
    #[error("base geometry has no vertices")]
    EmptyBaseGeometry,

    /// The main and wireframe buffers differ in length.
    #[error("buffer length mismatch: main has {main} vertices, wireframe has {wire}")]
    MismatchedBuffers {
        /// Main buffer length.
        main: usize,
        /// Wireframe buffer length.
        wire: usize,
    },

    /// A marker is bound to a vertex index outside the base buffer.
    #[error("marker anchor {anchor} out of bounds for {len} vertices")]
    AnchorOutOfBounds {
        /// The offending anchor index.
        anchor: usize,
        /// Base buffer length.
        len: usize,
    },

    /// No vertex index is left to anchor markers on.
    #[error("no anchor candidates in [{start}, {end})")]
    NoAnchorCandidates {
        /// First candidate index.
        start: usize,
        /// One past the last candidate index.
        end: usize,
    },
}

/// Result type for bulge simulation setup.
pub type BulgeResult<T> = Result<T, BulgeError>;
