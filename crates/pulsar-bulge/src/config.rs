//! Bulge simulation configuration.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BulgeError, BulgeResult};

/// An inclusive `[min, max]` range that values are drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl FloatRange {
    /// A range that always yields infinity.
    ///
    /// Used as a spawn interval it means "never spawn".
    pub const NEVER: FloatRange = FloatRange::constant(f32::INFINITY);

    /// Creates a new range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Creates a range that always yields `value`.
    pub const fn constant(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Checks that neither bound is NaN and `min <= max`.
    pub fn validate(&self, name: &'static str) -> BulgeResult<()> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(BulgeError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Checks the range like [`validate`](Self::validate) and additionally
    /// requires `min > 0`.
    pub fn validate_positive(&self, name: &'static str) -> BulgeResult<()> {
        self.validate(name)?;
        if self.min > 0.0 {
            Ok(())
        } else {
            Err(BulgeError::NonPositiveRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Returns true if `value` lies within the range.
    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Draws a uniform value from the range.
    ///
    /// Degenerate ranges (including infinite ones) return `min` without
    /// consuming randomness.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min == self.max {
            return self.min;
        }
        let t: f32 = rng.random();
        (self.min + t * (self.max - self.min)).min(self.max)
    }
}

/// Configuration for spawning bulges.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BulgeConfig {
    /// Lifetime of a bulge, in seconds of bulge time.
    pub duration: FloatRange,
    /// Maximum radius a bulge can displace points within.
    pub area_of_effect: FloatRange,
    /// Seconds between consecutive spawns.
    pub spawn_interval: FloatRange,
    /// Rate at which a bulge's own clock runs relative to simulation time.
    pub speed: FloatRange,
}

impl Default for BulgeConfig {
    fn default() -> Self {
        Self {
            duration: FloatRange::new(1.0, 2.5),
            area_of_effect: FloatRange::new(0.5, 3.0),
            spawn_interval: FloatRange::new(0.25, 0.75),
            speed: FloatRange::constant(1.0),
        }
    }
}

impl BulgeConfig {
    /// Preset for slow, sparse, wide swells.
    pub fn calm() -> Self {
        Self {
            duration: FloatRange::new(2.0, 4.0),
            area_of_effect: FloatRange::new(2.0, 3.0),
            spawn_interval: FloatRange::new(1.0, 2.0),
            ..Default::default()
        }
    }

    /// Preset for frequent, fast, small pulses.
    pub fn lively() -> Self {
        Self {
            duration: FloatRange::new(0.5, 1.5),
            area_of_effect: FloatRange::new(0.5, 1.5),
            spawn_interval: FloatRange::new(0.05, 0.25),
            speed: FloatRange::new(1.0, 2.5),
        }
    }

    /// Preset that never spawns on its own.
    ///
    /// Bulges can still be added explicitly.
    pub fn dormant() -> Self {
        Self {
            spawn_interval: FloatRange::NEVER,
            ..Default::default()
        }
    }

    /// Sets the duration range.
    pub fn with_duration(mut self, min: f32, max: f32) -> Self {
        self.duration = FloatRange::new(min, max);
        self
    }

    /// Sets the area of effect range.
    pub fn with_area_of_effect(mut self, min: f32, max: f32) -> Self {
        self.area_of_effect = FloatRange::new(min, max);
        self
    }

    /// Sets the spawn interval range.
    pub fn with_spawn_interval(mut self, min: f32, max: f32) -> Self {
        self.spawn_interval = FloatRange::new(min, max);
        self
    }

    /// Sets the speed range.
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed = FloatRange::new(min, max);
        self
    }

    /// Checks every range.
    ///
    /// Durations and speeds must be positive, otherwise a bulge would never
    /// run out of time.
    pub fn validate(&self) -> BulgeResult<()> {
        self.duration.validate_positive("duration")?;
        self.area_of_effect.validate("area of effect")?;
        self.spawn_interval.validate("spawn interval")?;
        self.speed.validate_positive("speed")?;
        Ok(())
    }
}
