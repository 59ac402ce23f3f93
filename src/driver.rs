//! Runs a [`ComputeMethod`] over a system on a fixed number of worker threads.
//!
//! Every step, each worker computes the accelerations of the bodies it owns, integrates them, then
//! waits on a fence shared by all workers so that the positions of the next step are published
//! before anyone reads them. The trace is then handed along a baton chain: the coordinator opens
//! the step, worker `0` records its bodies, then worker `1`, and so on back to the coordinator.

use std::{
    num::NonZeroUsize,
    sync::Barrier,
    thread::{self, ScopedJoinHandle},
};

use flume::Receiver;

use crate::{
    body::BodyState,
    compute_method::ComputeMethod,
    config::{Parameters, SystemConfig},
    error::Error,
    state::SimulationState,
    sync::{self, BatonLeg},
    trace::Trace,
};

/// Final state of a run and the trace it was recorded into.
#[derive(Debug)]
pub struct Outcome<T> {
    /// State of every body after the last step.
    pub bodies: Vec<BodyState>,
    /// The trace, handed back once every step has been recorded.
    pub trace: T,
}

/// Integrates `config` with `method` on `workers` threads, recording every step into `trace`.
///
/// Returns once every worker has been joined. A panicking worker is reported first, then an error
/// returned by a worker, then one met by the coordinator, then a defect reported during the run.
pub fn run<C, T>(
    method: &C,
    config: &SystemConfig,
    parameters: &Parameters,
    workers: NonZeroUsize,
    mut trace: T,
) -> Result<Outcome<T>, Error>
where
    C: ComputeMethod,
    T: Trace + Send,
{
    let state = SimulationState::new(config, parameters, workers)?;
    let shared = method.prepare(&state)?;
    let time_steps = config.time_steps;

    trace.header(state.bodies().len());
    let (coordinator, legs) = sync::baton(workers.get(), trace)?;

    let fence = Barrier::new(workers.get());
    let (start, started) = flume::bounded(workers.get());

    log::info!(
        "integrating {} bodies over {time_steps} steps on {workers} workers",
        state.bodies().len()
    );

    let relayed = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers.get());

        for leg in legs {
            let rank = leg.rank();
            let worker = Worker {
                method,
                shared: &shared,
                state: &state,
                fence: &fence,
                leg,
            };
            let started = started.clone();

            let spawned = thread::Builder::new()
                .name(format!("worker-{rank}"))
                .spawn_scoped(scope, move || worker.run(&started, time_steps));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    log::error!("failed to spawn worker {rank}: {source}");
                    // Workers already spawned see the start gate close and leave.
                    drop(start);
                    if let Err(error) = join(handles) {
                        log::debug!("{error}");
                    }
                    return Err(Error::Spawn { rank, source });
                }
            }
        }

        for _ in 0..handles.len() {
            if start.send(()).is_err() {
                break;
            }
        }

        let relayed = relay(coordinator, time_steps);
        join(handles)?;
        relayed
    });

    let trace = relayed?;
    let bodies = state.snapshot(time_steps);
    if let Some(fault) = state.into_fault() {
        return Err(fault);
    }

    log::info!("integration finished");
    Ok(Outcome { bodies, trace })
}

/// Joins every worker, returning the first panic, else the first error.
fn join(handles: Vec<ScopedJoinHandle<'_, Result<(), Error>>>) -> Result<(), Error> {
    let mut first = Ok(());

    for (rank, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                if first.is_ok() {
                    first = Err(error);
                }
            }
            Err(_) => {
                log::error!("worker {rank} panicked");
                if !matches!(first, Err(Error::WorkerPanicked { .. })) {
                    first = Err(Error::WorkerPanicked { rank });
                }
            }
        }
    }

    first
}

/// Opens every step of the trace, then takes the trace back after the last one.
fn relay<T: Trace>(leg: BatonLeg<T>, time_steps: usize) -> Result<T, Error> {
    for step in 0..time_steps {
        let mut trace = leg.hold()?;
        log::debug!("recording step {}", step + 1);
        trace.cycle(step + 1);
        leg.pass(trace)?;
    }

    leg.hold()
}

struct Worker<'a, C: ComputeMethod, T> {
    method: &'a C,
    shared: &'a C::Shared,
    state: &'a SimulationState,
    fence: &'a Barrier,
    leg: BatonLeg<T>,
}

impl<C: ComputeMethod, T: Trace> Worker<'_, C, T> {
    fn run(self, started: &Receiver<()>, time_steps: usize) -> Result<(), Error> {
        let rank = self.leg.rank();
        started.recv().map_err(|_| Error::Aborted { rank })?;

        let range = self.state.partition().range(rank);
        log::debug!("worker {rank} owns bodies {range:?}");

        for step in 0..time_steps {
            self.method
                .accelerations(self.shared, self.state, rank, step);
            self.state.integrate(range.clone(), step);
            self.fence.wait();

            let mut trace = self.leg.hold()?;
            for i in range.clone() {
                trace.body(i, &self.state.bodies().state(step + 1, i));
            }
            self.leg.pass(trace)?;
        }

        log::trace!("worker {rank} done");
        Ok(())
    }
}
