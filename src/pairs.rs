use crate::error::{allocate, Error};

/// Role a body plays for one of its pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The body has the lower index: it computes the pairwise force and stores it.
    Compute,
    /// The body has the higher index: it reuses the stored force, negated.
    Reuse,
}

/// Returns the side `body` is on for the pair it forms with `other`, or `None` if they are the same
/// body.
#[inline]
pub fn side(body: usize, other: usize) -> Option<Side> {
    match body.cmp(&other) {
        std::cmp::Ordering::Less => Some(Side::Compute),
        std::cmp::Ordering::Greater => Some(Side::Reuse),
        std::cmp::Ordering::Equal => None,
    }
}

/// One value per unordered pair `(i, j)`, `i < j`, of `len` bodies.
///
/// Entries are laid out row by row in the upper triangle of the `len × len` matrix.
#[derive(Debug)]
pub struct PairTable<T> {
    len: usize,
    slots: Vec<T>,
}

impl<T> PairTable<T> {
    /// Creates the table for `len` bodies, filling every slot with `f`.
    pub fn new<F>(what: &'static str, len: usize, mut f: F) -> Result<Self, Error>
    where
        F: FnMut() -> T,
    {
        let count = Self::count(len).ok_or(Error::TooManyBodies { bodies: len })?;
        let slots = allocate(what, count, |_| f())?;
        log::debug!("allocated {count} {what} for {len} bodies");

        Ok(Self { len, slots })
    }

    /// Number of pairs of `len` bodies, if it fits in a `usize`.
    #[inline]
    pub fn count(len: usize) -> Option<usize> {
        len.checked_mul(len.saturating_sub(1)).map(|n| n / 2)
    }

    /// Number of bodies the table was created for.
    #[inline]
    pub const fn bodies(&self) -> usize {
        self.len
    }

    /// Returns the slot of the pair `(i, j)`.
    ///
    /// # Panics
    ///
    /// If `i >= j` or `j` is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.slots[self.index(i, j)]
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        assert!(i < j && j < self.len, "({i}, {j}) is not a pair of {}", self.len);

        // Rows 0..i hold (len - 1) + (len - 2) + ... + (len - i) slots.
        i * (2 * self.len - i - 1) / 2 + (j - i - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides() {
        assert_eq!(side(0, 3), Some(Side::Compute));
        assert_eq!(side(3, 0), Some(Side::Reuse));
        assert_eq!(side(2, 2), None);
    }

    #[test]
    fn every_pair_has_its_own_slot() {
        for len in 0..12 {
            let table = PairTable::new("slots", len, || ()).unwrap();
            let mut seen = vec![false; table.slots.len()];

            for i in 0..len {
                for j in (i + 1)..len {
                    let index = table.index(i, j);
                    assert!(!seen[index], "({i}, {j}) shares slot {index}");
                    seen[index] = true;
                }
            }

            assert!(seen.into_iter().all(|seen| seen));
        }
    }

    #[test]
    fn pair_count() {
        assert_eq!(PairTable::<()>::count(0), Some(0));
        assert_eq!(PairTable::<()>::count(1), Some(0));
        assert_eq!(PairTable::<()>::count(5), Some(10));
        assert_eq!(PairTable::<()>::count(usize::MAX), None);
    }

    #[test]
    #[should_panic]
    fn reversed_pair_panics() {
        let table = PairTable::new("slots", 3, || ()).unwrap();
        table.get(2, 1);
    }
}
