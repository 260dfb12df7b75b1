//! Spherical coordinate helpers.
//!
//! Everything else (normalize, length, lerp, cross products) comes from glam.
//! The convention throughout the crate is Y-up: `phi` is the polar angle
//! measured from +Y, `theta` the azimuth in the XZ plane starting at +X.

use glam::Vec3;

/// A point in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f32,
    /// Polar angle from +Y, in `[0, PI]`.
    pub phi: f32,
    /// Azimuth from +X towards +Z, in `(-PI, PI]`.
    pub theta: f32,
}

/// Returns the unit vector for the given polar and azimuth angles.
pub fn spherical_to_cartesian(phi: f32, theta: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Converts a cartesian point to spherical coordinates.
///
/// The origin maps to all zeros.
pub fn cartesian_to_spherical(v: Vec3) -> Spherical {
    let radius = v.length();
    if radius == 0.0 {
        return Spherical::default();
    }

    Spherical {
        radius,
        phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        theta: v.z.atan2(v.x),
    }
}

/// Direction from the origin to `p`, or zero for the origin itself.
pub fn radial_direction(p: Vec3) -> Vec3 {
    p.normalize_or_zero()
}
