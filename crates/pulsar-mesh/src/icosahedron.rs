//! Icosahedron skeleton: vertices and edges without faces.
//!
//! Used to build node-and-edge models where every vertex and every edge is
//! drawn as its own object. Edges are not listed by hand; they are derived
//! from the vertex positions, so the same filter works for any radius.

use std::collections::HashSet;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Placement;
use crate::error::{MeshError, MeshResult, positive_radius};

/// Number of vertices of an icosahedron.
pub const ICOSAHEDRON_VERTEX_COUNT: usize = 12;

/// Number of edges of an icosahedron (12 vertices of degree 5).
pub const ICOSAHEDRON_EDGE_COUNT: usize = 30;

/// Relative tolerance when matching a vertex distance to the edge length.
pub const EDGE_LENGTH_TOLERANCE: f32 = 0.01;

/// Returns the 12 icosahedron vertices on a sphere of the given radius.
///
/// The vertices are the corners of three orthogonal golden rectangles,
/// `(±1, ±φ)` laid in the XY, YZ and XZ planes, in that order.
pub fn icosahedron_vertices(radius: f32) -> [Vec3; ICOSAHEDRON_VERTEX_COUNT] {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    [
        // XY plane
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        // YZ plane
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        // XZ plane
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .map(|v| v.normalize() * radius)
}

/// Returns the smallest distance between any two distinct vertices.
///
/// Returns `None` with fewer than two vertices.
pub fn min_pairwise_distance(vertices: &[Vec3]) -> Option<f32> {
    let mut min: Option<f32> = None;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            let d = a.distance(*b);
            min = Some(min.map_or(d, |m| m.min(d)));
        }
    }
    min
}

/// Derives the undirected edges of a regular polyhedron from its vertices.
///
/// Every ordered pair `(i, j)` is a candidate. A candidate is rejected if
/// `i == j`, if its length is not finite or differs from the shortest
/// pairwise distance by more than `tolerance` times that distance, or if
/// `(j, i)` was already accepted. Accepted pairs therefore always have
/// `i < j`.
pub fn derive_edges(vertices: &[Vec3], tolerance: f32) -> Vec<(usize, usize)> {
    let Some(edge_length) = min_pairwise_distance(vertices).filter(|d| d.is_finite()) else {
        return Vec::new();
    };
    let slack = tolerance * edge_length;

    let mut accepted = HashSet::new();
    let mut edges = Vec::new();

    for (i, a) in vertices.iter().enumerate() {
        for (j, b) in vertices.iter().enumerate() {
            if i == j {
                continue;
            }
            let distance = a.distance(*b);
            if !distance.is_finite() || (distance - edge_length).abs() > slack {
                continue;
            }
            if accepted.contains(&(j, i)) {
                continue;
            }
            accepted.insert((i, j));
            edges.push((i, j));
        }
    }

    edges
}

/// An edge between two skeleton vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Index of the first endpoint.
    pub a: usize,
    /// Index of the second endpoint.
    pub b: usize,
    /// Position of the first endpoint.
    pub start: Vec3,
    /// Position of the second endpoint.
    pub end: Vec3,
}

impl Edge {
    /// Returns the edge length.
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Returns the edge midpoint.
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Returns the placement that stretches a unit +Y object along this edge.
    pub fn placement(&self) -> Placement {
        Placement::edge(self.start, self.end)
    }
}

/// Generates an icosahedron skeleton centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Icosahedron {
    /// Circumradius (distance from the center to each vertex).
    pub radius: f32,
}

impl Default for Icosahedron {
    fn default() -> Self {
        Self { radius: 13.0 }
    }
}

impl Icosahedron {
    /// Creates a new icosahedron with the given circumradius.
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Generates the vertices and derives the edges.
    ///
    /// Fails with [`MeshError::InvalidRadius`] if the radius is not positive
    /// and finite, or so large that vertex distances overflow, and with
    /// [`MeshError::EdgeCountMismatch`] if the derivation does not yield
    /// exactly 30 edges.
    pub fn apply(&self) -> MeshResult<IcosahedronTopology> {
        let radius = positive_radius(self.radius)?;
        let vertices = icosahedron_vertices(radius);
        if !min_pairwise_distance(&vertices).is_some_and(f32::is_finite) {
            return Err(MeshError::InvalidRadius(radius));
        }

        let pairs = derive_edges(&vertices, EDGE_LENGTH_TOLERANCE);
        if pairs.len() != ICOSAHEDRON_EDGE_COUNT {
            return Err(MeshError::EdgeCountMismatch {
                found: pairs.len(),
                expected: ICOSAHEDRON_EDGE_COUNT,
            });
        }

        let edges = pairs
            .into_iter()
            .map(|(a, b)| Edge {
                a,
                b,
                start: vertices[a],
                end: vertices[b],
            })
            .collect();

        Ok(IcosahedronTopology {
            radius,
            vertices,
            edges,
        })
    }
}

/// Creates an icosahedron skeleton with the given circumradius.
pub fn icosahedron(radius: f32) -> MeshResult<IcosahedronTopology> {
    Icosahedron::new(radius).apply()
}

/// Vertices and derived edges of an icosahedron.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IcosahedronTopology {
    radius: f32,
    vertices: [Vec3; ICOSAHEDRON_VERTEX_COUNT],
    edges: Vec<Edge>,
}

impl IcosahedronTopology {
    /// Returns the circumradius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the 12 vertex positions.
    pub fn vertices(&self) -> &[Vec3; ICOSAHEDRON_VERTEX_COUNT] {
        &self.vertices
    }

    /// Returns the 30 edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the edges as `(a, b)` index pairs.
    pub fn edge_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().map(|e| (e.a, e.b))
    }

    /// Returns the common edge length.
    pub fn edge_length(&self) -> f32 {
        self.edges.first().map_or(0.0, Edge::length)
    }

    /// Returns the placement of a unit +Y object for every edge.
    pub fn edge_placements(&self) -> Vec<Placement> {
        self.edges.iter().map(Edge::placement).collect()
    }

    /// Returns a placement at every vertex, +Y pointing outward.
    pub fn node_placements(&self) -> Vec<Placement> {
        self.vertices.iter().map(|&v| Placement::node(v)).collect()
    }
}
