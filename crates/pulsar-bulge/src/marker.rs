//! Markers: small objects riding individual vertices of the main mesh.

use std::ops::Range;

use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::FloatRange;
use crate::error::{BulgeError, BulgeResult};

/// A point bound to one vertex of the main mesh.
///
/// The marker is displaced in lockstep with its anchor vertex, so it stays
/// on the deformed surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Marker {
    anchor: usize,
    base: Vec3,
    position: Vec3,
    scale: f32,
}

impl Marker {
    /// Creates a marker bound to vertex `anchor`, whose undisplaced position
    /// is `base`.
    pub fn new(anchor: usize, base: Vec3) -> Self {
        Self {
            anchor,
            base,
            position: base,
            scale: 1.0,
        }
    }

    /// Sets the render scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Scatters `count` markers over uniformly random vertices in
    /// `anchors`.
    ///
    /// Several markers may share an anchor. Each gets a render scale drawn
    /// from `scale`.
    pub fn scatter<R: Rng + ?Sized>(
        positions: &[Vec3],
        anchors: Range<usize>,
        count: usize,
        scale: FloatRange,
        rng: &mut R,
    ) -> BulgeResult<Vec<Marker>> {
        scale.validate("marker scale")?;
        let Range { start, end } = anchors;
        if start >= end || end > positions.len() {
            return Err(BulgeError::NoAnchorCandidates { start, end });
        }

        Ok((0..count)
            .map(|_| {
                let anchor = rng.random_range(start..end);
                Marker::new(anchor, positions[anchor]).with_scale(scale.sample(rng))
            })
            .collect())
    }

    /// Returns the index of the vertex this marker rides.
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Returns the undisplaced position.
    pub fn base(&self) -> Vec3 {
        self.base
    }

    /// Returns the current, possibly displaced, position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the render scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub(crate) fn reset(&mut self) {
        self.position = self.base;
    }

    pub(crate) fn displace(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ring(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_scatter_respects_band() {
        let positions = ring(100);
        let mut rng = StdRng::seed_from_u64(3);

        let markers =
            Marker::scatter(&positions, 20..80, 500, FloatRange::new(0.1, 1.0), &mut rng).unwrap();

        assert_eq!(markers.len(), 500);
        for marker in &markers {
            assert!((20..80).contains(&marker.anchor()));
            assert_eq!(marker.base(), positions[marker.anchor()]);
            assert_eq!(marker.position(), marker.base());
            assert!((0.1..=1.0).contains(&marker.scale()));
        }
    }

    #[test]
    fn test_scatter_rejects_empty_band() {
        let positions = ring(10);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            Marker::scatter(&positions, 5..5, 1, FloatRange::constant(1.0), &mut rng),
            Err(BulgeError::NoAnchorCandidates { start: 5, end: 5 })
        );
        assert!(
            Marker::scatter(&positions, 5..11, 1, FloatRange::constant(1.0), &mut rng)
                .is_err()
        );
    }

    #[test]
    fn test_displace_and_reset() {
        let mut marker = Marker::new(3, Vec3::Y);
        marker.displace(Vec3::Y * 0.5);
        assert_eq!(marker.position(), Vec3::new(0.0, 1.5, 0.0));

        marker.reset();
        assert_eq!(marker.position(), Vec3::Y);
    }
}
