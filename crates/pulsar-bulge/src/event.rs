//! Bulge events: time-bounded, spatially local outward pulses.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::BulgeConfig;

/// Triangle envelope over a bulge's lifetime.
///
/// Rises linearly from 0 at `elapsed = 0` to 1 at the midpoint, then falls
/// linearly back to 0 at `elapsed = duration`. Outside the lifetime, or for
/// a non-positive duration, the envelope is 0.
pub fn envelope(elapsed: f32, duration: f32) -> f32 {
    let running = duration > 0.0 && elapsed > 0.0 && elapsed < duration;
    if !running {
        return 0.0;
    }

    let half = duration * 0.5;
    let value = if elapsed <= half {
        elapsed / half
    } else {
        (duration - elapsed) / half
    };
    value.clamp(0.0, 1.0)
}

/// Height of a cosine dome of the given radius at a squared distance from
/// its center.
///
/// The dome peaks at `0.5 * radius` over the center and reaches 0 at the
/// boundary; everything at or beyond the boundary gets 0.
pub fn dome_height(distance_sq: f32, radius: f32) -> f32 {
    let inside = radius > 0.0 && distance_sq < radius * radius;
    if !inside {
        return 0.0;
    }

    let t = (distance_sq.sqrt() / radius).clamp(0.0, 1.0) * FRAC_PI_2;
    t.cos() * 0.5 * radius
}

/// A single bulge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BulgeEvent {
    /// Point the bulge is centered on.
    pub center: Vec3,
    /// Radius of influence at peak intensity.
    pub area_of_effect: f32,
    /// Lifetime in bulge-time seconds.
    pub duration: f32,
    /// Rate at which the bulge's clock runs relative to simulation time.
    pub speed: f32,
    elapsed: f32,
}

impl BulgeEvent {
    /// Creates a bulge that starts now and runs at normal speed.
    pub fn new(center: Vec3, area_of_effect: f32, duration: f32) -> Self {
        Self {
            center,
            area_of_effect,
            duration,
            speed: 1.0,
            elapsed: 0.0,
        }
    }

    /// Sets the clock speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Draws a bulge centered at a uniformly random point on a sphere of the
    /// given radius, with parameters drawn from `config`.
    pub fn random<R: Rng + ?Sized>(config: &BulgeConfig, sphere_radius: f32, rng: &mut R) -> Self {
        let center = random_unit_vector(rng) * sphere_radius;
        let duration = config.duration.sample(rng);
        let area_of_effect = config.area_of_effect.sample(rng);
        let speed = config.speed.sample(rng);

        Self::new(center, area_of_effect, duration).with_speed(speed)
    }

    /// Returns the bulge-time seconds elapsed since the bulge started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Returns true while the bulge has time left.
    pub fn is_alive(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Advances the bulge's clock by `dt` simulation seconds.
    ///
    /// The clock never runs below zero, even for a negative speed. Returns
    /// whether the bulge is still alive afterwards.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt * self.speed).max(0.0);
        self.is_alive()
    }

    /// Returns the current envelope value in `[0, 1]`.
    pub fn intensity(&self) -> f32 {
        envelope(self.elapsed, self.duration)
    }

    /// Returns the radius of influence scaled by the current intensity.
    pub fn effective_radius(&self) -> f32 {
        self.area_of_effect * self.intensity()
    }

    /// Returns the outward displacement this bulge applies at `point` right
    /// now.
    pub fn height_at(&self, point: Vec3) -> f32 {
        dome_height(point.distance_squared(self.center), self.effective_radius())
    }
}

/// Returns a uniformly distributed point on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    // Rejection sampling inside the unit ball keeps the distribution uniform.
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_envelope_shape() {
        assert_eq!(envelope(0.0, 2.0), 0.0);
        assert_eq!(envelope(0.5, 2.0), 0.5);
        assert_eq!(envelope(1.0, 2.0), 1.0);
        assert_eq!(envelope(1.5, 2.0), 0.5);
        assert_eq!(envelope(2.0, 2.0), 0.0);
        assert_eq!(envelope(3.0, 2.0), 0.0);
    }

    #[test]
    fn test_envelope_degenerate_duration() {
        assert_eq!(envelope(0.5, 0.0), 0.0);
        assert_eq!(envelope(0.5, -1.0), 0.0);
        assert_eq!(envelope(0.5, f32::NAN), 0.0);
    }

    #[test]
    fn test_dome_height() {
        assert_eq!(dome_height(0.0, 2.0), 1.0);
        assert_eq!(dome_height(4.0, 2.0), 0.0);
        assert_eq!(dome_height(9.0, 2.0), 0.0);
        assert_eq!(dome_height(0.0, 0.0), 0.0);

        // Halfway out: cos(pi/4) * 0.5 * r
        let h = dome_height(1.0, 2.0);
        assert!((h - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_dome_is_monotonic() {
        let mut previous = f32::INFINITY;
        for step in 0..=20 {
            let d = step as f32 * 0.1;
            let h = dome_height(d * d, 2.0);
            assert!(h <= previous);
            previous = h;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_event_ramp() {
        let mut event = BulgeEvent::new(Vec3::X, 1.0, 2.0);
        let mut intensities = Vec::new();

        while event.advance(0.5) {
            intensities.push(event.intensity());
        }

        assert_eq!(intensities, vec![0.5, 1.0, 0.5]);
        assert_eq!(event.elapsed(), 2.0);
        assert!(!event.is_alive());
    }

    #[test]
    fn test_speed_scales_clock() {
        let mut event = BulgeEvent::new(Vec3::X, 1.0, 2.0).with_speed(2.0);

        assert!(event.advance(0.5));
        assert_eq!(event.intensity(), 1.0);
        assert!(!event.advance(0.5));
    }

    #[test]
    fn test_elapsed_never_negative() {
        let mut event = BulgeEvent::new(Vec3::X, 1.0, 2.0).with_speed(-1.0);

        for _ in 0..10 {
            assert!(event.advance(0.5));
            assert_eq!(event.elapsed(), 0.0);
        }
        assert_eq!(event.intensity(), 0.0);

        let mut event = BulgeEvent::new(Vec3::X, 1.0, 2.0).with_speed(f32::NAN);
        event.advance(0.5);
        assert_eq!(event.elapsed(), 0.0);
    }

    #[test]
    fn test_height_at_peak() {
        let mut event = BulgeEvent::new(Vec3::new(0.0, 0.0, 5.0), 2.0, 2.0);
        event.advance(1.0);

        assert_eq!(event.effective_radius(), 2.0);
        assert_eq!(event.height_at(event.center), 1.0);
        assert_eq!(event.height_at(Vec3::new(0.0, 2.0, 5.0)), 0.0);
    }

    #[test]
    fn test_random_event_on_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = BulgeConfig::default();

        for _ in 0..100 {
            let event = BulgeEvent::random(&config, 10.0, &mut rng);

            assert!((event.center.length() - 10.0).abs() < 1e-3);
            assert!(config.duration.contains(event.duration));
            assert!(config.area_of_effect.contains(event.area_of_effect));
            assert!(config.speed.contains(event.speed));
            assert_eq!(event.elapsed(), 0.0);
        }
    }
}
