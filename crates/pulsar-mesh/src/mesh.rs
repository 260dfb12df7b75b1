//! Core mesh types.

use std::collections::HashSet;

use glam::Vec3;

use crate::Placement;

/// A 3D mesh with indexed triangle topology.
///
/// Vertex indices are stable: index `i` names the same logical vertex in
/// every buffer derived from this mesh (see [`Mesh::scaled`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals (per-vertex, not per-face).
    pub normals: Vec<Vec3>,
    /// Triangle indices (every 3 indices form a triangle, counter-clockwise
    /// when seen from the side the triangle faces).
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the mesh has one normal per vertex.
    pub fn has_normals(&self) -> bool {
        self.normals.len() == self.positions.len()
    }

    /// Iterates over triangles as index triples in winding order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Returns the unnormalized face normal implied by a triangle's winding.
    pub fn face_normal(&self, [i0, i1, i2]: [u32; 3]) -> Vec3 {
        let v0 = self.positions[i0 as usize];
        let v1 = self.positions[i1 as usize];
        let v2 = self.positions[i2 as usize];
        (v1 - v0).cross(v2 - v0)
    }

    /// Returns the indices of triangles whose winding disagrees with their
    /// vertex normals.
    ///
    /// A triangle faces outward when its face normal has a positive dot
    /// product with the average of its three vertex normals. An empty result
    /// means every triangle is consistently wound.
    pub fn inward_faces(&self) -> Vec<usize> {
        self.triangles()
            .enumerate()
            .filter(|&(_, tri)| {
                let average: Vec3 = tri.iter().map(|&i| self.normals[i as usize]).sum();
                self.face_normal(tri).dot(average) <= 0.0
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns a copy with every position scaled about the origin.
    ///
    /// Topology and normals are shared unchanged, so the copy stays
    /// index-paired with `self`. Used for overlays drawn slightly outside
    /// the main surface.
    pub fn scaled(&self, factor: f32) -> Mesh {
        Mesh {
            positions: self.positions.iter().map(|p| *p * factor).collect(),
            normals: self.normals.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Returns each undirected edge once, as `(low, high)` index pairs in
    /// the order they are first met while walking the triangles.
    pub fn unique_edges(&self) -> Vec<(u32, u32)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for [a, b, c] in self.triangles() {
            for (i, j) in [(a, b), (b, c), (c, a)] {
                let key = (i.min(j), i.max(j));
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }

        edges
    }

    /// Returns a placement for every unique edge, for drawing the mesh as
    /// a set of segment objects.
    pub fn edge_placements(&self) -> Vec<Placement> {
        self.unique_edges()
            .into_iter()
            .map(|(a, b)| Placement::edge(self.positions[a as usize], self.positions[b as usize]))
            .collect()
    }
}

/// Builder for constructing meshes vertex by vertex.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    /// Creates a new mesh builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with pre-allocated capacity.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            mesh: Mesh::with_capacity(vertices, triangles),
        }
    }

    /// Adds a vertex with position and normal, returning its index.
    pub fn vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.mesh.positions.len() as u32;
        self.mesh.positions.push(position);
        self.mesh.normals.push(normal);
        index
    }

    /// Adds a triangle from three vertex indices.
    pub fn triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.mesh.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Adds a quad from four vertex indices (converted to two triangles).
    ///
    /// The quad is split along the `i0`-`i2` diagonal; both halves keep the
    /// quad's winding.
    pub fn quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.triangle(i0, i1, i2);
        self.triangle(i0, i2, i3);
    }

    /// Builds the final mesh.
    pub fn build(self) -> Mesh {
        self.mesh
    }
}
