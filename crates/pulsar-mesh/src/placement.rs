//! Placement of unit objects along edges and at nodes.
//!
//! Skeleton and wireframe renderers draw each edge as a unit-height capsule
//! or cylinder whose long axis is +Y. A [`Placement`] is the transform that
//! stretches such an object between two endpoints.

use glam::{Mat4, Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position, rotation and scale for one placed object.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Object position.
    pub position: Vec3,
    /// Object rotation as a quaternion.
    pub rotation: Quat,
    /// Object scale.
    pub scale: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Placement {
    /// Places a unit +Y object so it spans from `start` to `end`.
    ///
    /// The object sits at the midpoint, its +Y axis is rotated onto the edge
    /// direction along the shortest arc, and its Y scale equals the edge
    /// length. Coincident endpoints keep the identity rotation.
    pub fn edge(start: Vec3, end: Vec3) -> Self {
        let along = end - start;
        let rotation = along
            .try_normalize()
            .map_or(Quat::IDENTITY, |dir| Quat::from_rotation_arc(Vec3::Y, dir));

        Self {
            position: (start + end) * 0.5,
            rotation,
            scale: Vec3::new(1.0, along.length(), 1.0),
        }
    }

    /// Places an object at `position` with its +Y axis pointing away from
    /// the origin.
    pub fn node(position: Vec3) -> Self {
        let rotation = position
            .try_normalize()
            .map_or(Quat::IDENTITY, |dir| Quat::from_rotation_arc(Vec3::Y, dir));

        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Returns the transform matrix for this placement.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Transforms a point by this placement.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (point * self.scale)
    }
}
