use crate::{
    config::BodyConfig,
    error::{allocate, Error},
    vector::{AtomicVector, Vector},
};

/// Position, velocity and last computed acceleration of a body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Position.
    pub position: Vector,
    /// Velocity.
    pub velocity: Vector,
    /// Acceleration computed during the last step.
    pub acceleration: Vector,
}

/// Flat per-body arrays shared by all workers for the duration of a run.
///
/// Positions are kept twice, indexed by step parity: during step `k` every worker reads the
/// positions entering step `k` and owners write the positions entering step `k + 1` into the other
/// buffer. Velocities and accelerations are only ever touched by the body's owner.
#[derive(Debug)]
pub struct BodyStore {
    masses: Vec<f64>,
    positions: [Vec<AtomicVector>; 2],
    velocities: Vec<AtomicVector>,
    accelerations: Vec<AtomicVector>,
}

impl BodyStore {
    /// Creates the store from the initial state of the bodies.
    pub fn new(bodies: &[BodyConfig]) -> Result<Self, Error> {
        let len = bodies.len();
        let store = Self {
            masses: allocate("masses", len, |i| bodies[i].mass)?,
            positions: [
                allocate("positions", len, |i| bodies[i].position.into())?,
                allocate("positions", len, |_| AtomicVector::default())?,
            ],
            velocities: allocate("velocities", len, |i| bodies[i].velocity.into())?,
            accelerations: allocate("accelerations", len, |_| AtomicVector::default())?,
        };
        log::debug!("allocated state for {len} bodies");

        Ok(store)
    }

    /// Number of bodies.
    #[inline]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Returns `true` if there are no bodies.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Mass of body `i`.
    #[inline]
    pub fn mass(&self, i: usize) -> f64 {
        self.masses[i]
    }

    /// Position of body `i` entering step `step`.
    #[inline]
    pub fn position(&self, step: usize, i: usize) -> Vector {
        self.positions[step % 2][i].load()
    }

    /// Velocity of body `i`.
    #[inline]
    pub fn velocity(&self, i: usize) -> Vector {
        self.velocities[i].load()
    }

    /// Acceleration of body `i` computed during the last step.
    #[inline]
    pub fn acceleration(&self, i: usize) -> Vector {
        self.accelerations[i].load()
    }

    /// Stores the acceleration of body `i`.
    #[inline]
    pub fn set_acceleration(&self, i: usize, acceleration: Vector) {
        self.accelerations[i].store(acceleration);
    }

    /// Integrates body `i` over step `step` with explicit Euler.
    ///
    /// The position is advanced with the velocity entering the step, then the velocity with the
    /// acceleration computed for the step.
    #[inline]
    pub fn advance(&self, step: usize, i: usize, dt: f64) {
        let velocity = self.velocity(i);
        let position = self.position(step, i) + velocity * dt;
        self.positions[(step + 1) % 2][i].store(position);

        self.velocities[i].store(velocity + self.acceleration(i) * dt);
    }

    /// State of body `i` entering step `step`.
    #[inline]
    pub fn state(&self, step: usize, i: usize) -> BodyState {
        BodyState {
            position: self.position(step, i),
            velocity: self.velocity(i),
            acceleration: self.acceleration(i),
        }
    }
}
