/// Compute methods that split the bodies between worker threads.
pub mod parallel;
/// Reference integrator running on one thread.
pub mod sequential;

use crate::{error::Error, state::SimulationState};

/// Trait computing the accelerations of the bodies owned by one worker for one step.
///
/// The driver calls [`prepare`](ComputeMethod::prepare) once before spawning the workers, then
/// every worker calls [`accelerations`](ComputeMethod::accelerations) once per step, all workers
/// for the same step concurrently.
///
/// # Example
///
/// ```
/// # use nbody_relay::prelude::*;
/// # use nbody_relay::state::SimulationState;
/// /// Leaves every body drifting at constant velocity.
/// struct Drift;
///
/// impl ComputeMethod for Drift {
///     type Shared = ();
///
///     fn prepare(&self, _: &SimulationState) -> Result<(), Error> {
///         Ok(())
///     }
///
///     fn accelerations(&self, _: &(), state: &SimulationState, rank: usize, _: usize) {
///         for i in state.partition().range(rank) {
///             state.bodies().set_acceleration(i, Vector::ZERO);
///         }
///     }
/// }
/// ```
pub trait ComputeMethod: Sync {
    /// Data shared by the workers on top of the [`SimulationState`].
    type Shared: Sync;

    /// Allocates the shared data of a run.
    fn prepare(&self, state: &SimulationState) -> Result<Self::Shared, Error>;

    /// Computes and stores the acceleration of every body owned by worker `rank` entering step
    /// `step`.
    fn accelerations(
        &self,
        shared: &Self::Shared,
        state: &SimulationState,
        rank: usize,
        step: usize,
    );
}
