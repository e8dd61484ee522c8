use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Draw-without-replacement queue over a fixed catalog.
///
/// Holds the full item list plus a shuffled working copy; when the working
/// copy runs out a fresh copy of the full list is shuffled in. Yields only
/// items from the full list, and `None` when that list is empty — callers
/// must treat `None` as exhaustion, not retry.
#[derive(Debug, Clone)]
pub struct ShuffledQueue<T> {
    full: Vec<T>,
    remaining: Vec<T>,
    rng: StdRng,
}

impl<T: Clone> ShuffledQueue<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::with_rng(items, StdRng::from_os_rng())
    }

    /// Seedable constructor for deterministic shuffles.
    pub fn with_rng(items: Vec<T>, rng: StdRng) -> Self {
        Self {
            full: items,
            remaining: Vec::new(),
            rng,
        }
    }

    /// Pop the next item, reshuffling a fresh working copy on exhaustion.
    pub fn next(&mut self) -> Option<T> {
        if self.remaining.is_empty() {
            if self.full.is_empty() {
                return None;
            }
            self.remaining = self.full.clone();
            self.remaining.shuffle(&mut self.rng);
        }
        self.remaining.pop()
    }

    /// Size of the full catalog backing this queue.
    pub fn catalog_len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded(items: Vec<u32>, seed: u64) -> ShuffledQueue<u32> {
        ShuffledQueue::with_rng(items, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn empty_catalog_yields_none_immediately() {
        let mut q = seeded(vec![], 0);
        assert_eq!(q.next(), None);
        assert_eq!(q.next(), None);
    }

    #[test]
    fn single_item_repeats_forever() {
        let mut q = seeded(vec![42], 0);
        for _ in 0..10 {
            assert_eq!(q.next(), Some(42));
        }
    }

    #[test]
    fn drains_full_catalog_before_repeating() {
        let items = vec![1, 2, 3, 4, 5];
        let mut q = seeded(items.clone(), 7);
        assert_eq!(q.catalog_len(), 5);
        assert!(!q.is_empty());
        let mut first_pass: Vec<u32> = (0..items.len()).filter_map(|_| q.next()).collect();
        first_pass.sort_unstable();
        assert_eq!(first_pass, items);
    }

    proptest! {
        /// N draws over a catalog of size N form a permutation of the
        /// catalog, and so do the next N — the reshuffle-on-exhaustion
        /// round-trip property.
        #[test]
        fn each_full_pass_is_a_permutation(
            size in 1usize..20,
            seed in proptest::num::u64::ANY,
        ) {
            let items: Vec<u32> = (0..size as u32).collect();
            let mut q = seeded(items.clone(), seed);
            for _pass in 0..2 {
                let mut drawn: Vec<u32> =
                    (0..size).filter_map(|_| q.next()).collect();
                drawn.sort_unstable();
                prop_assert_eq!(&drawn, &items);
            }
        }

        #[test]
        fn never_yields_foreign_items(
            items in proptest::collection::vec(0u32..100, 0..10),
            draws in 0usize..40,
            seed in proptest::num::u64::ANY,
        ) {
            let mut q = seeded(items.clone(), seed);
            for _ in 0..draws {
                match q.next() {
                    Some(item) => prop_assert!(items.contains(&item)),
                    None => prop_assert!(items.is_empty()),
                }
            }
        }
    }
}
