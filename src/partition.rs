use std::{num::NonZeroUsize, ops::Range};

/// Assignment of bodies to workers as contiguous, disjoint index ranges.
///
/// Every worker owns `max(bodies / workers, 1)` bodies, except the last one which also takes the
/// remainder. When there are more workers than bodies, the workers past the last body own empty
/// ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    bodies: usize,
    workers: NonZeroUsize,
    chunk: usize,
}

impl Partition {
    /// Creates the partition of `bodies` bodies between `workers` workers.
    #[inline]
    pub fn new(bodies: usize, workers: NonZeroUsize) -> Self {
        let chunk = (bodies / workers).max(1);

        Self {
            bodies,
            workers,
            chunk,
        }
    }

    /// Number of bodies partitioned.
    #[inline]
    pub const fn bodies(&self) -> usize {
        self.bodies
    }

    /// Number of workers sharing the bodies.
    #[inline]
    pub const fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Range of bodies owned by the worker of the given rank.
    #[inline]
    pub fn range(&self, rank: usize) -> Range<usize> {
        debug_assert!(rank < self.workers());

        let first = (rank * self.chunk).min(self.bodies);
        let last = if rank + 1 == self.workers() {
            self.bodies
        } else {
            (first + self.chunk).min(self.bodies)
        };

        first..last
    }

    /// Rank of the worker owning `body`.
    #[inline]
    pub fn owner(&self, body: usize) -> usize {
        debug_assert!(body < self.bodies);

        (body / self.chunk).min(self.workers() - 1)
    }

    /// Returns `true` if the two bodies are owned by different workers.
    #[inline]
    pub fn crosses(&self, body1: usize, body2: usize) -> bool {
        self.owner(body1) != self.owner(body2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(bodies: usize, workers: usize) -> Partition {
        Partition::new(bodies, NonZeroUsize::new(workers).unwrap())
    }

    #[test]
    fn last_worker_takes_remainder() {
        let partition = partition(10, 3);

        assert_eq!(partition.range(0), 0..3);
        assert_eq!(partition.range(1), 3..6);
        assert_eq!(partition.range(2), 6..10);
    }

    #[test]
    fn extra_workers_own_nothing() {
        let partition = partition(2, 5);

        assert_eq!(partition.range(0), 0..1);
        assert_eq!(partition.range(1), 1..2);
        for rank in 2..5 {
            assert!(partition.range(rank).is_empty());
        }
        assert_eq!(partition.owner(0), 0);
        assert_eq!(partition.owner(1), 1);
    }

    #[test]
    fn no_bodies() {
        let partition = partition(0, 4);
        assert!((0..4).all(|rank| partition.range(rank).is_empty()));
    }

    #[test]
    fn ranges_cover_bodies_exactly_once() {
        for bodies in 0..40 {
            for workers in 1..12 {
                let partition = partition(bodies, workers);

                let mut next = 0;
                for rank in 0..workers {
                    let range = partition.range(rank);
                    if range.is_empty() {
                        continue;
                    }

                    assert_eq!(range.start, next, "gap or overlap for {bodies}/{workers}");
                    for body in range.clone() {
                        assert_eq!(partition.owner(body), rank);
                    }
                    next = range.end;
                }
                assert_eq!(next, bodies, "bodies left over for {bodies}/{workers}");
            }
        }
    }

    #[test]
    fn crossing_pairs() {
        let partition = partition(4, 2);

        assert!(!partition.crosses(0, 1));
        assert!(partition.crosses(1, 2));
        assert!(!partition.crosses(3, 2));
    }
}
