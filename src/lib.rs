//! # nbody_relay
//!
//! nbody_relay integrates a two-dimensional system of point masses under Newtonian gravity with
//! explicit Euler steps, on a fixed number of worker threads.
//!
//! Bodies are split between workers as contiguous index ranges. Every step, each worker computes
//! the accelerations of the bodies it owns with a [`ComputeMethod`](compute_method::ComputeMethod),
//! integrates them, and records them into a [`Trace`](trace::Trace) in body order.
//!
//! Three integrators are provided:
//! - [`sequential::run`](compute_method::sequential::run), a single-threaded reference.
//! - [`BruteForce`](compute_method::parallel::BruteForce), where every worker computes every
//!   interaction of its bodies.
//! - [`BruteForcePairs`](compute_method::parallel::BruteForcePairs), where the force of each pair
//!   is computed once and shared between the two workers owning its bodies.
//!
//! # Running a system
//!
//! ```
//! # use std::num::NonZeroUsize;
//! # use nbody_relay::prelude::*;
//! let config: SystemConfig = "1 2 3  1e6 0 0 0 0  1e6 1 0 0 0".parse()?;
//! let workers = NonZeroUsize::new(2).unwrap();
//!
//! let outcome = run(&BruteForcePairs, &config, &Parameters::default(), workers, Recording::new())?;
//!
//! assert_eq!(outcome.trace.frames().len(), 3);
//! assert_eq!(outcome.bodies[0].velocity, -outcome.bodies[1].velocity);
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]

/// Per-body state and the arrays shared by the workers.
pub mod body;

/// Traits for computing accelerations and the integrators implementing them.
pub mod compute_method;

pub mod config;

pub mod driver;

pub mod error;

/// Softened gravitational law and the per-pair force cache.
pub mod force;

/// Indexing of unordered body pairs.
pub mod pairs;

/// Ownership of bodies by workers.
pub mod partition;

/// State shared by the workers of a run.
pub mod state;

pub mod sync;

pub mod trace;

/// Plain and atomic two-dimensional vectors.
pub mod vector;

pub use error::Error;

/// Everything needed to use the crate.
pub mod prelude {
    pub use crate::compute_method::{
        parallel::{BruteForce, BruteForcePairs},
        sequential, ComputeMethod,
    };
    pub use crate::config::{Parameters, SystemConfig};
    pub use crate::driver::{run, Outcome};
    pub use crate::error::Error;
    pub use crate::trace::{Recording, Trace, TraceWriter};
    pub use crate::vector::Vector;
}
