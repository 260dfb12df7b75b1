//! Mesh primitives.
//!
//! Each primitive is a plain parameter struct with an `apply` method that
//! validates the parameters and generates the mesh. Free functions are sugar
//! that delegate to these structs.
//!
//! All primitives are Y-up, centered at the origin, and wound
//! counter-clockwise as seen from outside.

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::error::{MeshError, MeshResult, addressable, is_positive_finite, positive_radius};
use crate::math::spherical_to_cartesian;
use crate::{Mesh, MeshBuilder};

// ============================================================================
// UvSphere
// ============================================================================

/// Generates a UV sphere mesh centered at the origin.
///
/// Index 0 is the north pole `(0, radius, 0)` and the last index is the
/// south pole. Between them sit `parallels` rings, top to bottom, each with
/// one vertex per meridian (plus a duplicated seam vertex when
/// `duplicate_seam` is set).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvSphere {
    /// Radius of the sphere.
    pub radius: f32,
    /// Number of meridians (longitude divisions). Minimum 3.
    pub meridians: u32,
    /// Number of parallels (latitude rings, poles excluded). Minimum 1.
    pub parallels: u32,
    /// Whether each ring repeats its first vertex at the end.
    ///
    /// The repeated column lets texture coordinates wrap without a seam,
    /// at the cost of the mesh no longer being a minimal closed manifold.
    pub duplicate_seam: bool,
}

impl Default for UvSphere {
    fn default() -> Self {
        Self {
            radius: 10.0,
            meridians: 16,
            parallels: 12,
            duplicate_seam: false,
        }
    }
}

impl UvSphere {
    /// Creates a new UV sphere with the given parameters and a closed seam.
    pub fn new(radius: f32, meridians: u32, parallels: u32) -> Self {
        Self {
            radius,
            meridians,
            parallels,
            duplicate_seam: false,
        }
    }

    /// Sets whether the seam column is duplicated.
    pub fn with_seam(mut self, duplicate_seam: bool) -> Self {
        self.duplicate_seam = duplicate_seam;
        self
    }

    /// Checks the parameters without generating anything.
    pub fn validate(&self) -> MeshResult<()> {
        positive_radius(self.radius)?;
        if self.meridians < 3 {
            return Err(MeshError::TooFewMeridians(self.meridians));
        }
        if self.parallels < 1 {
            return Err(MeshError::TooFewParallels(self.parallels));
        }
        addressable(self.required_vertices())
    }

    /// Number of vertices stored per ring.
    pub fn ring_stride(&self) -> u32 {
        self.meridians.saturating_add(u32::from(self.duplicate_seam))
    }

    /// Number of vertices the generated mesh will have.
    pub fn vertex_count(&self) -> usize {
        self.required_vertices() as usize
    }

    fn required_vertices(&self) -> u64 {
        let stride = u64::from(self.meridians) + u64::from(self.duplicate_seam);
        stride * u64::from(self.parallels) + 2
    }

    /// Number of triangles the generated mesh will have.
    pub fn triangle_count(&self) -> usize {
        2 * self.meridians as usize * self.parallels as usize
    }

    /// Index of the vertex on ring `lat` at meridian `lon`.
    ///
    /// `lon` may equal `meridians`, which wraps to the seam.
    pub fn ring_index(&self, lat: u32, lon: u32) -> u32 {
        1 + lat * self.ring_stride() + lon % self.ring_stride()
    }

    /// Generates the sphere mesh.
    pub fn apply(&self) -> MeshResult<Mesh> {
        self.validate()?;

        let UvSphere {
            radius,
            meridians,
            parallels,
            ..
        } = *self;
        let stride = self.ring_stride();
        let mut builder = MeshBuilder::with_capacity(self.vertex_count(), self.triangle_count());

        let north = builder.vertex(Vec3::Y * radius, Vec3::Y);

        for lat in 0..parallels {
            let phi = PI * (lat + 1) as f32 / (parallels + 1) as f32;

            for lon in 0..stride {
                // The duplicated seam vertex sits back at theta = 0.
                let theta = TAU * (lon % meridians) as f32 / meridians as f32;
                let normal = spherical_to_cartesian(phi, theta);
                builder.vertex(normal * radius, normal);
            }
        }

        let south = builder.vertex(Vec3::NEG_Y * radius, Vec3::NEG_Y);

        // North cap
        for lon in 0..meridians {
            builder.triangle(north, self.ring_index(0, lon + 1), self.ring_index(0, lon));
        }

        // Bands between consecutive rings
        for lat in 0..parallels - 1 {
            for lon in 0..meridians {
                builder.quad(
                    self.ring_index(lat, lon),
                    self.ring_index(lat, lon + 1),
                    self.ring_index(lat + 1, lon + 1),
                    self.ring_index(lat + 1, lon),
                );
            }
        }

        // South cap
        let last = parallels - 1;
        for lon in 0..meridians {
            builder.triangle(south, self.ring_index(last, lon), self.ring_index(last, lon + 1));
        }

        Ok(builder.build())
    }
}

/// Creates a UV sphere centered at the origin with a closed seam.
///
/// # Arguments
/// * `radius` - Radius of the sphere. Must be positive and finite.
/// * `meridians` - Longitude divisions. Minimum 3.
/// * `parallels` - Latitude rings between the poles. Minimum 1.
pub fn uv_sphere(radius: f32, meridians: u32, parallels: u32) -> MeshResult<Mesh> {
    UvSphere::new(radius, meridians, parallels).apply()
}

// ============================================================================
// Cylinder
// ============================================================================

/// Generates a capped cylinder mesh centered at the origin.
///
/// The cylinder extends from -length/2 to +length/2 on the Y axis. Each cap
/// boundary carries two coincident rings: one with the flat cap normal and
/// one with the radial wall normal.
///
/// Vertex layout: top cap center, top cap ring, top wall ring, bottom wall
/// ring, bottom cap ring, bottom cap center.
///
/// With low division counts, produces prisms (3 = triangular, 6 = hexagonal).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cylinder {
    /// Length along the Y axis.
    pub length: f32,
    /// Radius of the cylinder.
    pub radius: f32,
    /// Number of divisions around the circumference. Minimum 3.
    pub divisions: u32,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            length: 1.0,
            radius: 0.25,
            divisions: 32,
        }
    }
}

impl Cylinder {
    /// Creates a new cylinder with the given dimensions.
    pub fn new(length: f32, radius: f32, divisions: u32) -> Self {
        Self {
            length,
            radius,
            divisions,
        }
    }

    /// Checks the parameters without generating anything.
    pub fn validate(&self) -> MeshResult<()> {
        if self.divisions < 3 {
            return Err(MeshError::TooFewDivisions(self.divisions));
        }
        positive_radius(self.radius)?;
        if is_positive_finite(self.length) {
            addressable(self.required_vertices())
        } else {
            Err(MeshError::InvalidLength(self.length))
        }
    }

    /// Number of vertices the generated mesh will have.
    pub fn vertex_count(&self) -> usize {
        self.required_vertices() as usize
    }

    fn required_vertices(&self) -> u64 {
        4 * u64::from(self.divisions) + 2
    }

    /// Number of triangles the generated mesh will have.
    pub fn triangle_count(&self) -> usize {
        4 * self.divisions as usize
    }

    /// Generates the cylinder mesh.
    pub fn apply(&self) -> MeshResult<Mesh> {
        self.validate()?;

        let divisions = self.divisions;
        let half_length = self.length * 0.5;
        let mut builder = MeshBuilder::with_capacity(self.vertex_count(), self.triangle_count());

        let top_center = builder.vertex(Vec3::Y * half_length, Vec3::Y);

        // (height, Some(cap normal)) or (height, None) for the radial wall normal
        let rings = [
            (half_length, Some(Vec3::Y)),
            (half_length, None),
            (-half_length, None),
            (-half_length, Some(Vec3::NEG_Y)),
        ];
        for (height, cap_normal) in rings {
            for div in 0..divisions {
                let angle = TAU * div as f32 / divisions as f32;
                let radial = Vec3::new(angle.cos(), 0.0, angle.sin());
                let position = radial * self.radius + Vec3::Y * height;
                builder.vertex(position, cap_normal.unwrap_or(radial));
            }
        }

        let bottom_center = builder.vertex(Vec3::NEG_Y * half_length, Vec3::NEG_Y);

        let ring = |layer: u32, div: u32| 1 + layer * divisions + div % divisions;

        // Top cap
        for div in 0..divisions {
            builder.triangle(top_center, ring(0, div + 1), ring(0, div));
        }

        // Side wall
        for div in 0..divisions {
            builder.quad(ring(1, div), ring(1, div + 1), ring(2, div + 1), ring(2, div));
        }

        // Bottom cap
        for div in 0..divisions {
            builder.triangle(bottom_center, ring(3, div), ring(3, div + 1));
        }

        Ok(builder.build())
    }
}

/// Creates a capped cylinder centered at the origin.
///
/// # Arguments
/// * `length` - Length along the Y axis. Must be positive and finite.
/// * `radius` - Radius of the cylinder. Must be positive and finite.
/// * `divisions` - Divisions around the circumference. Minimum 3.
pub fn cylinder(length: f32, radius: f32, divisions: u32) -> MeshResult<Mesh> {
    Cylinder::new(length, radius, divisions).apply()
}
