//! A ready-made bulging sphere: solid mesh, wireframe overlay and markers.

use pulsar_mesh::{Mesh, UvSphere};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BulgeError, BulgeResult};
use crate::{BaseGeometry, BulgeConfig, BulgeSimulator, FloatRange, Frame, Marker};

/// Scale of the wireframe overlay relative to the solid mesh.
pub const WIRE_SCALE: f32 = 1.025;

/// Configuration for assembling a [`BulgeSphere`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BulgeSphereConfig {
    /// The sphere mesh to deform.
    pub sphere: UvSphere,
    /// Wireframe overlay scale; slightly above 1 keeps it outside the surface.
    pub wire_scale: f32,
    /// Number of markers scattered over the surface.
    pub marker_count: usize,
    /// Render scale range for markers.
    pub marker_scale: FloatRange,
    /// Rings next to each pole that markers are never anchored on.
    pub pole_rings: u32,
    /// Bulge spawning.
    pub bulges: BulgeConfig,
}

impl Default for BulgeSphereConfig {
    fn default() -> Self {
        Self {
            sphere: UvSphere::new(10.0, 64, 32),
            wire_scale: WIRE_SCALE,
            marker_count: 150,
            marker_scale: FloatRange::new(0.1, 1.0),
            pole_rings: 4,
            bulges: BulgeConfig::default(),
        }
    }
}

impl BulgeSphereConfig {
    /// Sets the sphere mesh parameters.
    pub fn with_sphere(mut self, sphere: UvSphere) -> Self {
        self.sphere = sphere;
        self
    }

    /// Sets the marker count.
    pub fn with_markers(mut self, count: usize) -> Self {
        self.marker_count = count;
        self
    }

    /// Sets the bulge configuration.
    pub fn with_bulges(mut self, bulges: BulgeConfig) -> Self {
        self.bulges = bulges;
        self
    }
}

/// A sphere mesh, its wireframe overlay and its markers, deformed together.
#[derive(Debug)]
pub struct BulgeSphere<R = StdRng> {
    sphere: UvSphere,
    mesh: Mesh,
    wire_mesh: Mesh,
    simulator: BulgeSimulator<R>,
}

impl BulgeSphere<StdRng> {
    /// Builds a sphere whose randomness comes from a seeded standard RNG.
    pub fn seeded(config: BulgeSphereConfig, seed: u64) -> BulgeResult<Self> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BulgeSphere<R> {
    /// Builds the meshes, scatters markers away from the poles and sets up
    /// the simulator.
    pub fn build(config: BulgeSphereConfig, mut rng: R) -> BulgeResult<Self> {
        let BulgeSphereConfig {
            sphere,
            wire_scale,
            marker_count,
            marker_scale,
            pole_rings,
            bulges,
        } = config;

        let scale_ok = wire_scale.is_finite() && wire_scale > 0.0;
        if !scale_ok {
            return Err(BulgeError::InvalidWireScale(wire_scale));
        }

        let mesh = sphere.apply()?;
        let wire_mesh = mesh.scaled(wire_scale);

        // Anchors run from the first vertex of ring `pole_rings` up to, but
        // excluding, the last `pole_rings` rings.
        let first = sphere.ring_index(pole_rings.min(sphere.parallels), 0) as usize;
        let last = sphere.ring_index(sphere.parallels.saturating_sub(pole_rings), 0) as usize;
        let markers = Marker::scatter(
            &mesh.positions,
            first..last,
            marker_count,
            marker_scale,
            &mut rng,
        )?;

        let base = BaseGeometry::new(mesh.positions.clone(), wire_mesh.positions.clone())
            .with_markers(markers);
        let simulator = BulgeSimulator::new(base, bulges, rng)?;

        debug!(
            meridians = sphere.meridians,
            parallels = sphere.parallels,
            markers = marker_count,
            "bulge sphere assembled"
        );

        Ok(Self {
            sphere,
            mesh,
            wire_mesh,
            simulator,
        })
    }

    /// Advances the simulation and returns the new frame.
    pub fn simulate(&mut self, dt: f32) -> Frame<'_> {
        self.simulator.simulate(dt)
    }

    /// Returns the sphere parameters.
    pub fn sphere(&self) -> &UvSphere {
        &self.sphere
    }

    /// Returns the undeformed solid mesh (normals and triangles for the
    /// renderer).
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Returns the undeformed wireframe overlay mesh.
    pub fn wire_mesh(&self) -> &Mesh {
        &self.wire_mesh
    }

    /// Returns the simulator.
    pub fn simulator(&self) -> &BulgeSimulator<R> {
        &self.simulator
    }

    /// Returns the simulator mutably, e.g. to spawn specific bulges.
    pub fn simulator_mut(&mut self) -> &mut BulgeSimulator<R> {
        &mut self.simulator
    }
}
