//! The per-frame bulge state machine.
//!
//! Every step starts from the immutable base geometry and re-applies all
//! live bulges, so displacement never accumulates from frame to frame.

use glam::Vec3;
use pulsar_mesh::Mesh;
use pulsar_mesh::math::radial_direction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::{BulgeError, BulgeResult};
use crate::event::dome_height;
use crate::{BulgeConfig, BulgeEvent, Marker};

/// Undisplaced geometry a simulator deforms.
#[derive(Debug, Clone, Default)]
pub struct BaseGeometry {
    /// Main mesh positions.
    pub main: Vec<Vec3>,
    /// Wireframe overlay positions, index-paired with `main`.
    pub wire: Vec<Vec3>,
    /// Markers riding main mesh vertices.
    pub markers: Vec<Marker>,
}

impl BaseGeometry {
    /// Creates base geometry from main and wireframe position buffers.
    pub fn new(main: Vec<Vec3>, wire: Vec<Vec3>) -> Self {
        Self {
            main,
            wire,
            markers: Vec::new(),
        }
    }

    /// Uses a mesh for the main buffer and a scaled copy of it for the
    /// wireframe buffer.
    pub fn from_mesh(mesh: &Mesh, wire_scale: f32) -> Self {
        Self::new(
            mesh.positions.clone(),
            mesh.positions.iter().map(|p| *p * wire_scale).collect(),
        )
    }

    /// Sets the markers.
    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    /// Checks buffer lengths and marker anchors.
    pub fn validate(&self) -> BulgeResult<()> {
        if self.main.is_empty() {
            return Err(BulgeError::EmptyBaseGeometry);
        }
        if self.main.len() != self.wire.len() {
            return Err(BulgeError::MismatchedBuffers {
                main: self.main.len(),
                wire: self.wire.len(),
            });
        }
        if let Some(marker) = self.markers.iter().find(|m| m.anchor() >= self.main.len()) {
            return Err(BulgeError::AnchorOutOfBounds {
                anchor: marker.anchor(),
                len: self.main.len(),
            });
        }
        Ok(())
    }
}

/// Complete output of one simulation step.
///
/// Borrows the simulator's working buffers; every slice is fully updated
/// before the frame is handed out.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Displaced main mesh positions.
    pub positions: &'a [Vec3],
    /// Displaced wireframe positions.
    pub wire_positions: &'a [Vec3],
    /// Markers at their displaced positions.
    pub markers: &'a [Marker],
}

impl<'a> Frame<'a> {
    /// Iterates over the displaced marker positions.
    pub fn marker_positions(&self) -> impl Iterator<Item = Vec3> + 'a {
        self.markers.iter().map(Marker::position)
    }
}

/// Simulates bulges over a sphere's main mesh, wireframe overlay and markers.
#[derive(Debug)]
pub struct BulgeSimulator<R = StdRng> {
    config: BulgeConfig,
    rng: R,
    base: BaseGeometry,
    /// Radial directions of the base positions, resolved once.
    main_directions: Vec<Vec3>,
    wire_directions: Vec<Vec3>,
    marker_directions: Vec<Vec3>,
    /// Working buffers, rewritten every step.
    positions: Vec<Vec3>,
    wire_positions: Vec<Vec3>,
    markers: Vec<Marker>,
    radius: f32,
    events: Vec<BulgeEvent>,
    /// Kept in `f64` so small steps still register after days of uptime.
    clock: f64,
    next_spawn: f64,
}

impl BulgeSimulator<StdRng> {
    /// Creates a simulator driven by a seeded standard RNG.
    pub fn seeded(base: BaseGeometry, config: BulgeConfig, seed: u64) -> BulgeResult<Self> {
        Self::new(base, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BulgeSimulator<R> {
    /// Creates a simulator over the given base geometry.
    ///
    /// The sphere radius is taken from the first main vertex; all base
    /// vertices are assumed to lie at the same distance from the origin.
    pub fn new(base: BaseGeometry, config: BulgeConfig, mut rng: R) -> BulgeResult<Self> {
        config.validate()?;
        base.validate()?;

        let radius = base.main[0].length();
        let next_spawn = f64::from(config.spawn_interval.sample(&mut rng));

        let main_directions = base.main.iter().map(|p| radial_direction(*p)).collect();
        let wire_directions = base.wire.iter().map(|p| radial_direction(*p)).collect();
        let marker_directions = base
            .markers
            .iter()
            .map(|m| radial_direction(m.base()))
            .collect();

        debug!(
            vertices = base.main.len(),
            markers = base.markers.len(),
            radius,
            "bulge simulator ready"
        );

        Ok(Self {
            positions: base.main.clone(),
            wire_positions: base.wire.clone(),
            markers: base.markers.clone(),
            config,
            rng,
            base,
            main_directions,
            wire_directions,
            marker_directions,
            radius,
            events: Vec::new(),
            clock: 0.0,
            next_spawn,
        })
    }

    /// Advances the simulation by `dt` seconds and returns the new frame.
    ///
    /// Negative or NaN `dt` is treated as zero.
    pub fn simulate(&mut self, dt: f32) -> Frame<'_> {
        let dt = if dt > 0.0 { dt } else { 0.0 };

        self.clock += f64::from(dt);
        if self.clock >= self.next_spawn {
            let event = BulgeEvent::random(&self.config, self.radius, &mut self.rng);
            debug!(
                center = ?event.center,
                area_of_effect = event.area_of_effect,
                duration = event.duration,
                "bulge spawned"
            );
            self.events.push(event);
            self.next_spawn += f64::from(self.config.spawn_interval.sample(&mut self.rng));
        }

        self.reset_to_base();

        for event in &mut self.events {
            if !event.advance(dt) {
                continue;
            }

            let radius = event.effective_radius();
            if radius.is_nan() || radius <= 0.0 {
                continue;
            }
            let radius_sq = radius * radius;

            // Main and wireframe vertices share the height computed from the
            // main base position so the two stay visually locked together.
            for (i, base) in self.base.main.iter().enumerate() {
                let distance_sq = base.distance_squared(event.center);
                if distance_sq >= radius_sq {
                    continue;
                }
                let height = dome_height(distance_sq, radius);
                self.positions[i] += self.main_directions[i] * height;
                self.wire_positions[i] += self.wire_directions[i] * height;
            }

            for (marker, direction) in self.markers.iter_mut().zip(&self.marker_directions) {
                let distance_sq = marker.base().distance_squared(event.center);
                if distance_sq >= radius_sq {
                    continue;
                }
                marker.displace(*direction * dome_height(distance_sq, radius));
            }
        }

        let before = self.events.len();
        self.events.retain(BulgeEvent::is_alive);
        let retired = before - self.events.len();
        if retired > 0 {
            debug!(retired, live = self.events.len(), "bulges retired");
        }
        trace!(clock = self.clock, live = self.events.len(), "bulge step");

        self.frame()
    }

    /// Returns the most recent frame without stepping.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            positions: &self.positions,
            wire_positions: &self.wire_positions,
            markers: &self.markers,
        }
    }

    /// Adds a bulge. It starts advancing on the next step.
    pub fn spawn(&mut self, event: BulgeEvent) {
        self.events.push(event);
    }

    /// Removes every live bulge and restores the base geometry.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.reset_to_base();
    }

    /// Returns the live bulges.
    pub fn events(&self) -> &[BulgeEvent] {
        &self.events
    }

    /// Returns the current main mesh positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the current wireframe positions.
    pub fn wire_positions(&self) -> &[Vec3] {
        &self.wire_positions
    }

    /// Returns the markers at their current positions.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the current marker positions.
    pub fn marker_positions(&self) -> Vec<Vec3> {
        self.markers.iter().map(Marker::position).collect()
    }

    /// Returns the undisplaced geometry.
    pub fn base(&self) -> &BaseGeometry {
        &self.base
    }

    /// Returns the undisplaced main mesh positions.
    pub fn base_positions(&self) -> &[Vec3] {
        &self.base.main
    }

    /// Returns the sphere radius new bulges are centered on.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the total simulated time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Returns the clock value at which the next bulge spawns.
    pub fn next_spawn(&self) -> f64 {
        self.next_spawn
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BulgeConfig {
        &self.config
    }

    fn reset_to_base(&mut self) {
        self.positions.copy_from_slice(&self.base.main);
        self.wire_positions.copy_from_slice(&self.base.wire);
        for marker in &mut self.markers {
            marker.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FloatRange;
    use pulsar_mesh::uv_sphere;

    const WIRE_SCALE: f32 = 1.025;

    fn sphere_base(radius: f32) -> BaseGeometry {
        let mesh = uv_sphere(radius, 16, 12).unwrap();
        BaseGeometry::from_mesh(&mesh, WIRE_SCALE)
    }

    fn dormant(base: BaseGeometry) -> BulgeSimulator {
        BulgeSimulator::seeded(base, BulgeConfig::dormant(), 1).unwrap()
    }

    #[test]
    fn test_no_events_leaves_base_untouched() {
        let base = sphere_base(10.0);
        let mut sim = dormant(base.clone());

        for _ in 0..100 {
            let frame = sim.simulate(0.016);
            assert_eq!(frame.positions, base.main.as_slice());
            assert_eq!(frame.wire_positions, base.wire.as_slice());
        }
        assert!(sim.events().is_empty());
        assert_eq!(sim.next_spawn(), f64::INFINITY);
    }

    #[test]
    fn test_intensity_ramp_and_removal() {
        let mut sim = dormant(sphere_base(10.0));
        sim.spawn(BulgeEvent::new(Vec3::Y * 10.0, 1.0, 2.0));

        let mut intensities = Vec::new();
        for _ in 0..3 {
            sim.simulate(0.5);
            assert_eq!(sim.events().len(), 1);
            intensities.push(sim.events()[0].intensity());
        }
        assert_eq!(intensities, vec![0.5, 1.0, 0.5]);

        sim.simulate(0.5);
        assert!(sim.events().is_empty());
        assert_eq!(sim.positions(), sim.base_positions());
    }

    #[test]
    fn test_peak_displacement_at_center() {
        let base = sphere_base(10.0);
        let north = base.main[0];
        let mut sim = dormant(base.clone());
        sim.spawn(BulgeEvent::new(north, 2.0, 2.0));

        sim.simulate(1.0);
        let frame = sim.frame();

        // r_eff = 2.0 at peak, so the center rises by 0.5 * 2.0.
        let lifted = frame.positions[0] - north;
        assert!((lifted.length() - 1.0).abs() < 1e-5);
        assert!(lifted.normalize().distance(Vec3::Y) < 1e-5);

        let wire_lifted = frame.wire_positions[0] - base.wire[0];
        assert!((wire_lifted.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_no_displacement_at_boundary() {
        // Both points lie on a sphere of radius 5, exactly 6 apart.
        let main = vec![Vec3::new(3.0, 4.0, 0.0), Vec3::new(-3.0, 4.0, 0.0)];
        let base = BaseGeometry::new(main.clone(), main.clone());
        let mut sim = dormant(base);

        sim.spawn(BulgeEvent::new(main[0], 6.0, 2.0));
        sim.simulate(1.0);

        assert_eq!(sim.positions()[1], main[1]);
        assert!((sim.positions()[0].length() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_overlapping_events_superpose() {
        let base = sphere_base(10.0);
        let north = base.main[0];
        let mut sim = dormant(base);

        sim.spawn(BulgeEvent::new(north, 2.0, 2.0));
        sim.spawn(BulgeEvent::new(north, 1.0, 2.0));
        sim.simulate(1.0);

        // Peaks of 1.0 and 0.5 along the same direction.
        let lifted = sim.positions()[0] - north;
        assert!((lifted.length() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_no_drift_between_steps() {
        let base = sphere_base(10.0);
        let north = base.main[0];
        let mut sim = dormant(base.clone());

        sim.spawn(BulgeEvent::new(north, 3.0, 2.0));
        sim.simulate(0.5);
        let rising: Vec<Vec3> = sim.positions().to_vec();
        sim.simulate(1.0);
        let falling: Vec<Vec3> = sim.positions().to_vec();

        // Intensity 0.5 on the way up and on the way down.
        for (a, b) in rising.iter().zip(&falling) {
            assert!(a.distance(*b) < 1e-5);
        }

        sim.simulate(10.0);
        assert_eq!(sim.positions(), base.main.as_slice());
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let config = BulgeConfig::lively();
        let mut a = BulgeSimulator::seeded(sphere_base(10.0), config.clone(), 99).unwrap();
        let mut b = BulgeSimulator::seeded(sphere_base(10.0), config, 99).unwrap();

        for step in 0..200 {
            let dt = if step % 3 == 0 { 0.02 } else { 0.016 };
            let fa = a.simulate(dt);
            let fb = b.simulate(dt);
            assert_eq!(fa.positions, fb.positions);
            assert_eq!(fa.wire_positions, fb.wire_positions);
            assert_eq!(fa.markers, fb.markers);
        }
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn test_spawn_schedule_accumulates() {
        let config = BulgeConfig::default()
            .with_spawn_interval(1.0, 1.0)
            .with_duration(100.0, 100.0);
        let mut sim = BulgeSimulator::seeded(sphere_base(10.0), config, 5).unwrap();

        assert_eq!(sim.next_spawn(), 1.0);
        sim.simulate(0.6);
        assert!(sim.events().is_empty());
        sim.simulate(0.6);
        assert_eq!(sim.events().len(), 1);
        assert_eq!(sim.next_spawn(), 2.0);
        sim.simulate(0.6);
        assert_eq!(sim.events().len(), 1);
        sim.simulate(0.6);
        assert_eq!(sim.events().len(), 2);
        assert_eq!(sim.next_spawn(), 3.0);
    }

    #[test]
    fn test_at_most_one_spawn_per_step() {
        let config = BulgeConfig::default()
            .with_spawn_interval(0.1, 0.1)
            .with_duration(100.0, 100.0);
        let mut sim = BulgeSimulator::seeded(sphere_base(10.0), config, 5).unwrap();

        sim.simulate(1.0);
        assert_eq!(sim.events().len(), 1);
    }

    #[test]
    fn test_small_steps_register_after_long_uptime() {
        // 2^19 seconds, where an f32 clock stops absorbing 1/60 s steps.
        let start = 524_288.0;
        let config = BulgeConfig::default()
            .with_spawn_interval(524_300.0, 524_300.0)
            .with_duration(100.0, 100.0);
        let mut sim = BulgeSimulator::seeded(sphere_base(10.0), config, 5).unwrap();

        sim.simulate(start);
        assert!(sim.events().is_empty());

        for _ in 0..3600 {
            sim.simulate(1.0 / 60.0);
        }

        assert!((sim.clock() - (f64::from(start) + 60.0)).abs() < 1e-2);
        assert_eq!(sim.events().len(), 1);
        assert_eq!(sim.next_spawn(), 1_048_600.0);
    }

    #[test]
    fn test_spawned_events_sit_on_sphere() {
        let config = BulgeConfig::lively().with_duration(50.0, 50.0);
        let mut sim = BulgeSimulator::seeded(sphere_base(4.0), config, 11).unwrap();

        for _ in 0..100 {
            sim.simulate(0.1);
        }
        assert!(!sim.events().is_empty());
        for event in sim.events() {
            assert!((event.center.length() - 4.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_markers_follow_anchor() {
        let base = sphere_base(10.0);
        let north = base.main[0];
        let markers = vec![Marker::new(0, north), Marker::new(40, base.main[40])];
        let mut sim = dormant(base.with_markers(markers));

        sim.spawn(BulgeEvent::new(north, 2.0, 2.0));
        let frame = sim.simulate(1.0);

        assert_eq!(frame.markers[0].position(), frame.positions[0]);
        assert_eq!(frame.markers[1].position(), frame.markers[1].base());

        let positions: Vec<Vec3> = frame.marker_positions().collect();
        assert_eq!(positions, sim.marker_positions());
    }

    #[test]
    fn test_wire_stays_outside_main() {
        let config = BulgeConfig::lively();
        let mut sim = BulgeSimulator::seeded(sphere_base(10.0), config, 2).unwrap();

        for _ in 0..120 {
            let frame = sim.simulate(0.05);
            for (main, wire) in frame.positions.iter().zip(frame.wire_positions) {
                assert!(wire.length() > main.length());
            }
        }
    }

    #[test]
    fn test_clear_events_restores_base() {
        let base = sphere_base(10.0);
        let mut sim = dormant(base.clone());
        sim.spawn(BulgeEvent::new(base.main[0], 2.0, 2.0));
        sim.simulate(0.5);
        assert_ne!(sim.positions(), base.main.as_slice());

        sim.clear_events();
        assert!(sim.events().is_empty());
        assert_eq!(sim.positions(), base.main.as_slice());
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut sim = dormant(sphere_base(10.0));
        sim.spawn(BulgeEvent::new(Vec3::Y * 10.0, 1.0, 2.0));

        sim.simulate(-1.0);
        sim.simulate(f32::NAN);
        assert_eq!(sim.clock(), 0.0);
        assert_eq!(sim.events()[0].elapsed(), 0.0);
    }

    #[test]
    fn test_backwards_clock_is_rejected_or_clamped() {
        let config = BulgeConfig::default()
            .with_speed(-1.0, -1.0)
            .with_spawn_interval(0.1, 0.1);
        assert!(matches!(
            BulgeSimulator::seeded(sphere_base(10.0), config, 0),
            Err(BulgeError::NonPositiveRange { name: "speed", .. })
        ));

        let mut sim = dormant(sphere_base(10.0));
        sim.spawn(BulgeEvent::new(Vec3::Y * 10.0, 1.0, 2.0).with_speed(-1.0));
        for _ in 0..100 {
            sim.simulate(0.1);
        }

        assert_eq!(sim.events().len(), 1);
        assert_eq!(sim.events()[0].elapsed(), 0.0);
        assert_eq!(sim.positions(), sim.base_positions());
    }

    #[test]
    fn test_construction_errors() {
        let config = BulgeConfig::default();

        assert_eq!(
            BulgeSimulator::seeded(BaseGeometry::default(), config.clone(), 0).err(),
            Some(BulgeError::EmptyBaseGeometry)
        );

        let mismatched = BaseGeometry::new(vec![Vec3::X; 3], vec![Vec3::X; 2]);
        assert_eq!(
            BulgeSimulator::seeded(mismatched, config.clone(), 0).err(),
            Some(BulgeError::MismatchedBuffers { main: 3, wire: 2 })
        );

        let bad_marker = BaseGeometry::new(vec![Vec3::X; 3], vec![Vec3::X; 3])
            .with_markers(vec![Marker::new(3, Vec3::X)]);
        assert_eq!(
            BulgeSimulator::seeded(bad_marker, config.clone(), 0).err(),
            Some(BulgeError::AnchorOutOfBounds { anchor: 3, len: 3 })
        );

        let inverted = BulgeConfig {
            area_of_effect: FloatRange::new(2.0, 1.0),
            ..config
        };
        assert!(matches!(
            BulgeSimulator::seeded(sphere_base(1.0), inverted, 0),
            Err(BulgeError::InvalidRange { name: "area of effect", .. })
        ));
    }
}
