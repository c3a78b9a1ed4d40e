//! Non-repeating random selection over fixed content pools.
//!
//! Every item of a pool is returned once before any item repeats. When the
//! pool is exhausted the shown-set is cleared and a new cycle starts; the
//! item returned last is held back from the first pick of the new cycle so
//! the same text never appears twice in a row (unless the pool has size 1).
use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::state::LocationId;

/// Indices of pool items already returned in the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShownSet {
    shown: BTreeSet<usize>,
    last: Option<usize>,
}

impl ShownSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.shown.contains(&index)
    }

    #[must_use]
    pub const fn last(&self) -> Option<usize> {
        self.last
    }

    pub fn clear(&mut self) {
        self.shown.clear();
        self.last = None;
    }
}

/// Pick one item from `pool` that is not in `shown`, uniformly at random.
///
/// Returns `None` only for an empty pool.
pub fn pick<'a, R>(pool: &'a [String], shown: &mut ShownSet, rng: &mut R) -> Option<&'a str>
where
    R: Rng + ?Sized,
{
    let index = pick_index(pool.len(), shown, rng)?;
    pool.get(index).map(String::as_str)
}

/// Index-level variant of [`pick`] for callers that keep their own pools.
pub fn pick_index<R>(pool_len: usize, shown: &mut ShownSet, rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    if pool_len == 0 {
        return None;
    }
    // Indices from a larger, previous pool are stale.
    if shown.shown.iter().any(|&i| i >= pool_len) {
        shown.clear();
    }

    let mut candidates: Vec<usize> = (0..pool_len).filter(|i| !shown.contains(*i)).collect();
    if candidates.is_empty() {
        let last = shown.last;
        shown.shown.clear();
        candidates = (0..pool_len)
            .filter(|i| pool_len == 1 || Some(*i) != last)
            .collect();
    }

    let choice = candidates[rng.gen_range(0..candidates.len())];
    shown.shown.insert(choice);
    shown.last = Some(choice);
    Some(choice)
}

/// A single shown-set tied to one pool, e.g. the general facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentPicker {
    shown: ShownSet,
}

impl ContentPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick<'a, R>(&mut self, pool: &'a [String], rng: &mut R) -> Option<&'a str>
    where
        R: Rng + ?Sized,
    {
        pick(pool, &mut self.shown, rng)
    }

    #[must_use]
    pub const fn shown(&self) -> &ShownSet {
        &self.shown
    }
}

/// Independent shown-sets per location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocationPicker {
    shown: BTreeMap<LocationId, ShownSet>,
}

impl LocationPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick<'a, R>(
        &mut self,
        location: LocationId,
        pool: &'a [String],
        rng: &mut R,
    ) -> Option<&'a str>
    where
        R: Rng + ?Sized,
    {
        pick(pool, self.shown.entry(location).or_default(), rng)
    }

    /// Number of items shown at `location` in its current cycle.
    #[must_use]
    pub fn shown_count(&self, location: LocationId) -> usize {
        self.shown.get(&location).map_or(0, ShownSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("fact-{i}")).collect()
    }

    #[test]
    fn five_picks_cover_pool_of_five() {
        let facts = pool(5);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut picker = ContentPicker::new();
        let seen: HashSet<&str> = (0..5)
            .map(|_| picker.pick(&facts, &mut rng).unwrap())
            .collect();
        assert_eq!(seen.len(), 5);
        assert_eq!(picker.shown().len(), 5);
    }

    #[test]
    fn every_cycle_covers_the_pool_without_back_to_back_repeats() {
        let facts = pool(4);
        for seed in 0..32 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut shown = ShownSet::default();
            let picks: Vec<&str> = (0..40)
                .map(|_| pick(&facts, &mut shown, &mut rng).unwrap())
                .collect();
            for cycle in picks.chunks(4) {
                let unique: HashSet<_> = cycle.iter().collect();
                assert_eq!(unique.len(), 4, "seed {seed}");
            }
            for pair in picks.windows(2) {
                assert_ne!(pair[0], pair[1], "seed {seed}");
            }
        }
    }

    #[test]
    fn single_item_pool_repeats() {
        let facts = pool(1);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut shown = ShownSet::default();
        assert_eq!(pick(&facts, &mut shown, &mut rng), Some("fact-0"));
        assert_eq!(pick(&facts, &mut shown, &mut rng), Some("fact-0"));
    }

    #[test]
    fn empty_pool_yields_none() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut shown = ShownSet::default();
        assert!(pick(&[], &mut shown, &mut rng).is_none());
        assert!(shown.is_empty());
    }

    #[test]
    fn shrunken_pool_resets_stale_indices() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut shown = ShownSet::default();
        for _ in 0..6 {
            pick_index(6, &mut shown, &mut rng);
        }
        let index = pick_index(2, &mut shown, &mut rng).unwrap();
        assert!(index < 2);
        assert_eq!(shown.len(), 1);
    }

    #[test]
    fn location_pickers_are_independent() {
        let facts = pool(3);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut picker = LocationPicker::new();
        picker.pick(LocationId::Home, &facts, &mut rng);
        picker.pick(LocationId::Home, &facts, &mut rng);
        picker.pick(LocationId::Park, &facts, &mut rng);
        assert_eq!(picker.shown_count(LocationId::Home), 2);
        assert_eq!(picker.shown_count(LocationId::Park), 1);
        assert_eq!(picker.shown_count(LocationId::Beach), 0);
    }
}
