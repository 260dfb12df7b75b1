//! Bulge simulation for pulsar.
//!
//! Deforms a sphere mesh with short-lived, spatially local bulges that push
//! vertices outward along their radial direction. A wireframe overlay and a
//! set of markers riding mesh vertices are displaced in lockstep.
//!
//! Each step recomputes every position from the undeformed base geometry, so
//! the surface always returns exactly to rest once all bulges have expired.
//!
//! # Example
//!
//! ```
//! use pulsar_bulge::{BulgeSphere, BulgeSphereConfig};
//!
//! let mut sphere = BulgeSphere::seeded(BulgeSphereConfig::default(), 7)?;
//! for _ in 0..60 {
//!     let frame = sphere.simulate(1.0 / 60.0);
//!     assert_eq!(frame.positions.len(), frame.wire_positions.len());
//! }
//! # Ok::<(), pulsar_bulge::BulgeError>(())
//! ```

mod config;
mod error;
mod event;
mod marker;
mod simulator;
mod sphere;

pub use config::{BulgeConfig, FloatRange};
pub use error::{BulgeError, BulgeResult};
pub use event::{BulgeEvent, dome_height, envelope, random_unit_vector};
pub use marker::Marker;
pub use simulator::{BaseGeometry, BulgeSimulator, Frame};
pub use sphere::{BulgeSphere, BulgeSphereConfig, WIRE_SCALE};
