use std::{
    num::NonZeroUsize,
    ops::Range,
    sync::{Mutex, PoisonError},
};

use crate::{
    body::{BodyState, BodyStore},
    config::{Parameters, SystemConfig},
    error::Error,
    force::Gravity,
    partition::Partition,
};

/// Everything the workers of a run share, owned by the driver and lent to every worker.
#[derive(Debug)]
pub struct SimulationState {
    gravity: Gravity,
    dt: f64,
    bodies: BodyStore,
    partition: Partition,
    fault: Mutex<Option<Error>>,
}

impl SimulationState {
    /// Creates the state of a run of `config` split between `workers` workers.
    pub fn new(
        config: &SystemConfig,
        parameters: &Parameters,
        workers: NonZeroUsize,
    ) -> Result<Self, Error> {
        let bodies = BodyStore::new(&config.bodies)?;
        let partition = Partition::new(bodies.len(), workers);
        log::debug!("{partition:?}");

        Ok(Self {
            gravity: Gravity::new(config.gravity, parameters.softening),
            dt: parameters.dt,
            bodies,
            partition,
            fault: Mutex::new(None),
        })
    }

    /// Gravitational law of the run.
    #[inline]
    pub const fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    /// Integration step.
    #[inline]
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Shared body arrays.
    #[inline]
    pub const fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    /// Ownership of bodies by workers.
    #[inline]
    pub const fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Advances positions, then velocities, of the bodies in `range` over step `step`.
    #[inline]
    pub fn integrate(&self, range: Range<usize>, step: usize) {
        for i in range {
            self.bodies.advance(step, i, self.dt);
        }
    }

    /// Records a defect observed by a worker. Only the first one is kept.
    pub fn report(&self, error: Error) {
        log::error!("{error}");

        let mut fault = self.fault.lock().unwrap_or_else(PoisonError::into_inner);
        fault.get_or_insert(error);
    }

    /// Returns the first defect reported during the run, if any.
    pub fn into_fault(self) -> Option<Error> {
        self.fault
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// State of every body entering step `step`.
    pub fn snapshot(&self, step: usize) -> Vec<BodyState> {
        (0..self.bodies.len())
            .map(|i| self.bodies.state(step, i))
            .collect()
    }
}
