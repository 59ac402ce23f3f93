use crate::{
    compute_method::ComputeMethod,
    error::Error,
    force::ForceCache,
    pairs::{side, Side},
    state::SimulationState,
    sync::PairGates,
    vector::Vector,
};

/// Brute-force [`ComputeMethod`] where every worker sums, for each body it owns, the acceleration
/// caused by every other body.
///
/// Each pairwise interaction is computed twice, once for each body of the pair. Workers never wait
/// on each other while computing.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForce;

impl ComputeMethod for BruteForce {
    type Shared = ();

    #[inline]
    fn prepare(&self, _: &SimulationState) -> Result<Self::Shared, Error> {
        Ok(())
    }

    fn accelerations(&self, _: &(), state: &SimulationState, rank: usize, step: usize) {
        let bodies = state.bodies();
        let gravity = state.gravity();

        for i in state.partition().range(rank) {
            let position = bodies.position(step, i);
            let acceleration = (0..bodies.len())
                .filter(|&j| j != i)
                .fold(Vector::ZERO, |acceleration, j| {
                    acceleration
                        + gravity.acceleration(position, bodies.position(step, j), bodies.mass(j))
                });

            bodies.set_acceleration(i, acceleration);
        }
    }
}

/// Forces and gates shared by the workers of a [`BruteForcePairs`] run.
#[derive(Debug)]
pub struct PairExchange {
    forces: ForceCache,
    gates: PairGates,
}

impl PairExchange {
    /// Allocates the force cache and the gates for `len` bodies.
    #[inline]
    pub fn new(len: usize) -> Result<Self, Error> {
        Ok(Self {
            forces: ForceCache::new(len)?,
            gates: PairGates::new(len)?,
        })
    }
}

/// Brute-force [`ComputeMethod`] computing the force of every pair of bodies once per step.
///
/// The body with the lower index of a pair computes the force and stores it; the body with the
/// higher index reuses it, negated. When the two bodies belong to different workers, the computing
/// worker opens the pair's gate after storing and the reusing worker passes it before loading.
/// When they belong to the same worker, the lower index is always visited first.
///
/// A worker only ever waits for lower-ranked workers, so the first worker never waits and the
/// exchange cannot deadlock.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForcePairs;

impl ComputeMethod for BruteForcePairs {
    type Shared = PairExchange;

    #[inline]
    fn prepare(&self, state: &SimulationState) -> Result<Self::Shared, Error> {
        PairExchange::new(state.bodies().len())
    }

    fn accelerations(
        &self,
        exchange: &PairExchange,
        state: &SimulationState,
        rank: usize,
        step: usize,
    ) {
        let bodies = state.bodies();
        let gravity = state.gravity();
        let partition = state.partition();

        for i in partition.range(rank) {
            let (position, mass) = (bodies.position(step, i), bodies.mass(i));
            let mut acceleration = Vector::ZERO;

            for j in 0..bodies.len() {
                let force = match side(i, j) {
                    None => continue,
                    Some(Side::Compute) => {
                        let force =
                            gravity.force(position, mass, bodies.position(step, j), bodies.mass(j));
                        exchange.forces.store(i, j, step, force);
                        if partition.crosses(i, j) {
                            exchange.gates.get(i, j).open();
                        }

                        force
                    }
                    Some(Side::Reuse) => {
                        if partition.crosses(j, i) {
                            exchange.gates.get(j, i).pass();
                        }

                        match exchange.forces.load(j, i, step) {
                            Ok(force) => -force,
                            Err(error) => {
                                state.report(error);
                                let other = bodies.position(step, j);
                                gravity.force(position, mass, other, bodies.mass(j))
                            }
                        }
                    }
                };

                acceleration += force / mass;
            }

            bodies.set_acceleration(i, acceleration);
        }
    }
}
