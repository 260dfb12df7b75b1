//! Procedural convex meshes for pulsar.
//!
//! Provides the static geometry that the bulge simulation deforms:
//! UV spheres, capped cylinders, and icosahedron skeletons, plus the
//! placement rule for drawing edges as stretched unit objects.

mod error;
mod icosahedron;
pub mod math;
mod mesh;
mod placement;
mod primitives;

pub use error::{MAX_VERTICES, MeshError, MeshResult};
pub use icosahedron::{
    EDGE_LENGTH_TOLERANCE, Edge, ICOSAHEDRON_EDGE_COUNT, ICOSAHEDRON_VERTEX_COUNT, Icosahedron,
    IcosahedronTopology, derive_edges, icosahedron, icosahedron_vertices, min_pairwise_distance,
};
pub use mesh::{Mesh, MeshBuilder};
pub use placement::Placement;
pub use primitives::{Cylinder, UvSphere, cylinder, uv_sphere};
