//! Synchronization between workers: pair gates for shared forces and the output baton.

use std::sync::{Condvar, Mutex, PoisonError};

use flume::{Receiver, Sender};

use crate::{error::Error, pairs::PairTable};

/// Counting signal: [`open`](Gate::open) releases one pending or future [`pass`](Gate::pass).
///
/// Opening happens-before the matching pass returns, so whatever the opener wrote before opening is
/// visible to the passer.
#[derive(Debug, Default)]
pub struct Gate {
    permits: Mutex<usize>,
    opened: Condvar,
}

impl Gate {
    /// Releases one waiter.
    #[inline]
    pub fn open(&self) {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        *permits += 1;
        self.opened.notify_one();
    }

    /// Blocks until the gate was opened, consuming one opening.
    #[inline]
    pub fn pass(&self) {
        let permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        let mut permits = self
            .opened
            .wait_while(permits, |permits| *permits == 0)
            .unwrap_or_else(PoisonError::into_inner);
        *permits -= 1;
    }

    /// Consumes one opening if there is one, without blocking.
    #[inline]
    pub fn try_pass(&self) -> bool {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        if *permits == 0 {
            return false;
        }

        *permits -= 1;
        true
    }
}

/// One [`Gate`] per pair of bodies, signalling that the pair's force was stored for this step.
#[derive(Debug)]
pub struct PairGates {
    gates: PairTable<Gate>,
}

impl PairGates {
    /// Creates the gates for `len` bodies, all closed.
    #[inline]
    pub fn new(len: usize) -> Result<Self, Error> {
        Ok(Self {
            gates: PairTable::new("pair gates", len, Gate::default)?,
        })
    }

    /// Gate of the pair `(i, j)`, `i < j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &Gate {
        self.gates.get(i, j)
    }
}

/// One position in the output baton chain.
///
/// A leg waits for the baton on its own gate and hands it to the next leg's gate. The baton is the
/// token `T` itself, so only the holder of the baton can use it.
#[derive(Debug)]
pub struct BatonLeg<T> {
    rank: usize,
    inbox: Receiver<T>,
    next: Sender<T>,
}

impl<T> BatonLeg<T> {
    /// Rank of the leg; the coordinator's leg has the rank equal to the number of workers.
    #[inline]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Blocks until the previous leg hands over the baton.
    #[inline]
    pub fn hold(&self) -> Result<T, Error> {
        log::trace!("baton leg {} waiting", self.rank);
        self.inbox
            .recv()
            .map_err(|_| Error::BatonDropped { rank: self.rank })
    }

    /// Hands the baton to the next leg.
    #[inline]
    pub fn pass(&self, token: T) -> Result<(), Error> {
        log::trace!("baton leg {} passing", self.rank);
        self.next
            .send(token)
            .map_err(|_| Error::BatonDropped { rank: self.rank })
    }
}

/// Builds the baton chain for `workers` workers and their coordinator.
///
/// Returns the coordinator's leg, which already holds `token`, and the workers' legs in rank order.
/// The coordinator hands the baton to worker `0`, worker `k` to worker `k + 1` and the last worker
/// back to the coordinator.
pub fn baton<T>(workers: usize, token: T) -> Result<(BatonLeg<T>, Vec<BatonLeg<T>>), Error> {
    let (mut senders, receivers): (Vec<_>, Vec<_>) =
        (0..=workers).map(|_| flume::bounded(1)).unzip();

    senders[workers]
        .send(token)
        .map_err(|_| Error::BatonDropped { rank: workers })?;

    // Leg `k` passes to gate `k + 1`; the coordinator wraps around to gate `0`.
    senders.rotate_left(1);
    let mut legs = senders
        .into_iter()
        .zip(receivers)
        .enumerate()
        .map(|(rank, (next, inbox))| BatonLeg { rank, inbox, next })
        .collect::<Vec<_>>();

    let coordinator = legs.pop().ok_or(Error::BatonDropped { rank: workers })?;

    Ok((coordinator, legs))
}
