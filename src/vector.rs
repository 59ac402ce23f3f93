use std::sync::atomic::{AtomicU64, Ordering};

/// Two-dimensional vector used for positions, velocities, accelerations and forces.
///
/// Addition, subtraction, scaling and [`length`](glam::DVec2::length) come from [`glam`].
pub type Vector = glam::DVec2;

/// A [`Vector`] that can be shared between worker threads.
///
/// Loads and stores are relaxed: a cell is only ever written by one worker at a time and readers
/// are ordered after the writer by a gate, the step fence or program order.
#[derive(Debug, Default)]
pub struct AtomicVector {
    x: AtomicU64,
    y: AtomicU64,
}

impl AtomicVector {
    /// Creates a new cell holding `vector`.
    #[inline]
    pub fn new(vector: Vector) -> Self {
        Self {
            x: AtomicU64::new(vector.x.to_bits()),
            y: AtomicU64::new(vector.y.to_bits()),
        }
    }

    /// Returns the stored vector.
    #[inline]
    pub fn load(&self) -> Vector {
        Vector::new(
            f64::from_bits(self.x.load(Ordering::Relaxed)),
            f64::from_bits(self.y.load(Ordering::Relaxed)),
        )
    }

    /// Replaces the stored vector.
    #[inline]
    pub fn store(&self, vector: Vector) {
        self.x.store(vector.x.to_bits(), Ordering::Relaxed);
        self.y.store(vector.y.to_bits(), Ordering::Relaxed);
    }
}

impl From<Vector> for AtomicVector {
    #[inline]
    fn from(vector: Vector) -> Self {
        Self::new(vector)
    }
}
