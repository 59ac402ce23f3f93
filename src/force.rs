use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    error::Error,
    pairs::PairTable,
    vector::{AtomicVector, Vector},
};

/// Newton's law of universal gravitation with a floor on the separation of two bodies.
///
/// The floor keeps forces finite when bodies get arbitrarily close or coincide. It is an
/// approximation: no collision is resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    /// Gravitational constant.
    pub constant: f64,
    /// Minimum separation used in the force computation.
    pub softening: f64,
}

impl Gravity {
    /// Creates a new [`Gravity`] with the given constant and softening.
    #[inline]
    pub const fn new(constant: f64, softening: f64) -> Self {
        Self {
            constant,
            softening,
        }
    }

    /// Distance between two positions, floored to the softening.
    #[inline]
    pub fn softened_distance(&self, position1: Vector, position2: Vector) -> f64 {
        let distance = (position1 - position2).length();
        if distance < self.softening {
            self.softening
        } else {
            distance
        }
    }

    /// Force exerted on a body of mass `mass1` at `position1` by a body of mass `mass2` at
    /// `position2`.
    ///
    /// The force on the second body is the exact negation of the returned value.
    #[inline]
    pub fn force(&self, position1: Vector, mass1: f64, position2: Vector, mass2: f64) -> Vector {
        let distance = self.softened_distance(position1, position2);
        (position2 - position1) * (self.constant * mass1 * mass2 / distance.powi(3))
    }

    /// Acceleration of a body at `position1` caused by a body of mass `mass2` at `position2`.
    #[inline]
    pub fn acceleration(&self, position1: Vector, position2: Vector, mass2: f64) -> Vector {
        let distance = self.softened_distance(position1, position2);
        (position2 - position1) * (self.constant * mass2 / distance.powi(3))
    }
}

#[derive(Debug, Default)]
struct ForceSlot {
    force: AtomicVector,
    // One past the last step the slot was written in, zero if never written.
    written: AtomicUsize,
}

/// Forces computed once per pair and step, read back by the other body of the pair.
///
/// Slot `(i, j)`, `i < j`, holds the force body `j` exerts on body `i`. Every slot remembers the
/// step it was last written in, so reading a slot that was not yet written in the current step is
/// detected instead of silently returning the previous step's force.
#[derive(Debug)]
pub struct ForceCache {
    slots: PairTable<ForceSlot>,
}

impl ForceCache {
    /// Creates the cache for `len` bodies.
    #[inline]
    pub fn new(len: usize) -> Result<Self, Error> {
        Ok(Self {
            slots: PairTable::new("force slots", len, ForceSlot::default)?,
        })
    }

    /// Stores the force of pair `(i, j)` computed during `step`.
    #[inline]
    pub fn store(&self, i: usize, j: usize, step: usize, force: Vector) {
        let slot = self.slots.get(i, j);
        slot.force.store(force);
        slot.written.store(step + 1, Ordering::Relaxed);
    }

    /// Loads the force of pair `(i, j)` stored during `step`.
    #[inline]
    pub fn load(&self, i: usize, j: usize, step: usize) -> Result<Vector, Error> {
        let slot = self.slots.get(i, j);
        if slot.written.load(Ordering::Relaxed) != step + 1 {
            return Err(Error::StaleForce { i, j, step });
        }

        Ok(slot.force.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SOFTENING;

    #[test]
    fn attraction_points_toward_other_body() {
        let gravity = Gravity::new(1.0, SOFTENING);
        let force = gravity.force(Vector::ZERO, 2.0, Vector::new(2.0, 0.0), 3.0);

        assert_eq!(force, Vector::new(1.5, 0.0));
        assert_eq!(
            -force,
            gravity.force(Vector::new(2.0, 0.0), 3.0, Vector::ZERO, 2.0)
        );
    }

    #[test]
    fn acceleration_matches_force_over_mass() {
        let gravity = Gravity::new(0.5, SOFTENING);
        let (position1, position2) = (Vector::new(1.0, 1.0), Vector::new(-2.0, 3.0));

        let force = gravity.force(position1, 4.0, position2, 8.0);
        let acceleration = gravity.acceleration(position1, position2, 8.0);

        assert!((force / 4.0 - acceleration).length() <= 1e-15 * acceleration.length());
    }

    #[test]
    fn coinciding_bodies_stay_finite() {
        let gravity = Gravity::new(1.0, SOFTENING);
        let position = Vector::new(3.0, -4.0);

        assert_eq!(gravity.softened_distance(position, position), SOFTENING);
        assert_eq!(gravity.force(position, 1e6, position, 1e6), Vector::ZERO);
        assert_eq!(gravity.acceleration(position, position, 1e6), Vector::ZERO);
    }

    #[test]
    fn close_bodies_use_the_floor() {
        let gravity = Gravity::new(1.0, SOFTENING);
        let offset = Vector::new(SOFTENING / 4.0, 0.0);

        let force = gravity.force(Vector::ZERO, 1.0, offset, 1.0);
        let floored = offset * (1.0 / SOFTENING.powi(3));

        assert!(force.is_finite());
        assert_eq!(force, floored);
    }

    #[test]
    fn cache_returns_force_of_current_step() {
        let cache = ForceCache::new(3).unwrap();

        cache.store(0, 2, 0, Vector::new(1.0, 2.0));
        assert_eq!(cache.load(0, 2, 0).unwrap(), Vector::new(1.0, 2.0));

        cache.store(0, 2, 1, Vector::new(3.0, 4.0));
        assert_eq!(cache.load(0, 2, 1).unwrap(), Vector::new(3.0, 4.0));
    }

    #[test]
    fn cache_detects_read_before_write() {
        let cache = ForceCache::new(3).unwrap();

        assert!(matches!(
            cache.load(1, 2, 0),
            Err(Error::StaleForce { i: 1, j: 2, step: 0 })
        ));

        cache.store(1, 2, 0, Vector::ONE);
        assert!(matches!(
            cache.load(1, 2, 1),
            Err(Error::StaleForce { step: 1, .. })
        ));
    }
}
