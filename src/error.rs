//! Error types for loading, allocating and running a simulation.

use std::{collections::TryReserveError, io, path::PathBuf};

use thiserror::Error;

/// Everything that can make a run fail.
///
/// Numerical degeneracy (coinciding bodies) and more workers than bodies are not errors: the first
/// is absorbed by the softened distance, the second by empty partitions.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration ended before a required field.
    #[error("configuration ended before {field}")]
    Truncated {
        /// Name of the missing field.
        field: String,
    },

    /// A configuration token could not be parsed into a finite value.
    #[error("invalid {field}: `{token}`")]
    InvalidField {
        /// Name of the field being parsed.
        field: String,
        /// Offending token.
        token: String,
    },

    /// A body was given a mass that is not strictly positive.
    #[error("body {} has non-positive mass {mass}", .body + 1)]
    NonPositiveMass {
        /// Index of the body.
        body: usize,
        /// Mass read from the configuration.
        mass: f64,
    },

    /// The number of body pairs does not fit in memory addressing.
    #[error("{bodies} bodies have too many pairs to index")]
    TooManyBodies {
        /// Number of bodies requested.
        bodies: usize,
    },

    /// Memory for a shared table could not be reserved.
    #[error("could not allocate {what} for {count} entries")]
    Allocation {
        /// Which table was being allocated.
        what: &'static str,
        /// Number of entries requested.
        count: usize,
        /// Allocator failure.
        #[source]
        source: TryReserveError,
    },

    /// The OS refused to create a worker thread.
    #[error("could not spawn worker {rank}: {source}")]
    Spawn {
        /// Rank of the worker.
        rank: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A worker was told to stand down before its first step.
    #[error("worker {rank} aborted before starting")]
    Aborted {
        /// Rank of the worker.
        rank: usize,
    },

    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// Rank of the worker.
        rank: usize,
    },

    /// The output baton chain was broken.
    #[error("output baton dropped at rank {rank}")]
    BatonDropped {
        /// Rank of the leg that found its neighbour gone.
        rank: usize,
    },

    /// A pairwise force was read before it was written in the same step.
    #[error("force ({i}, {j}) read before it was written in step {step}")]
    StaleForce {
        /// Computing side of the pair.
        i: usize,
        /// Reusing side of the pair.
        j: usize,
        /// Step in which the read happened.
        step: usize,
    },

    /// Writing the trace failed.
    #[error("could not write trace: {0}")]
    Trace(#[from] io::Error),
}

/// Builds a vector of `count` elements, reporting allocation failure instead of aborting.
pub(crate) fn allocate<T, F>(what: &'static str, count: usize, f: F) -> Result<Vec<T>, Error>
where
    F: FnMut(usize) -> T,
{
    let mut vec = Vec::new();
    vec.try_reserve_exact(count)
        .map_err(|source| Error::Allocation {
            what,
            count,
            source,
        })?;
    vec.extend((0..count).map(f));

    Ok(vec)
}
