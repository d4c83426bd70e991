use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A value that scales with dungeon depth.
///
/// An ordered list of `(depth_threshold, value)` pairs; the effective value
/// is that of the highest threshold at or below the current depth. A depth
/// below every threshold yields 0 (the implicit threshold-0 entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthTable(Vec<(u32, i32)>);

impl DepthTable {
    /// Build a table from ascending `(depth_threshold, value)` pairs.
    pub fn new(pairs: Vec<(u32, i32)>) -> Self {
        Self(pairs)
    }

    /// A value that never scales.
    pub fn flat(value: i32) -> Self {
        Self(vec![(0, value)])
    }

    /// The effective value at the given depth.
    pub fn value(&self, depth: u32) -> i32 {
        self.0
            .iter()
            .rev()
            .find(|(threshold, _)| depth >= *threshold)
            .map_or(0, |(_, value)| *value)
    }
}

/// Pick an index from a weight list, with probability proportional to weight.
///
/// Zero-weight entries are never picked; returns `None` when every weight is
/// zero or the list is empty.
pub fn weighted_choice(rng: &mut StdRng, weights: &[i32]) -> Option<usize> {
    let total: i32 = weights.iter().filter(|w| **w > 0).sum();
    if total <= 0 {
        return None;
    }

    let mut roll = rng.random_range(1..=total);
    for (index, weight) in weights.iter().enumerate() {
        if *weight > 0 {
            roll -= weight;
            if roll <= 0 {
                return Some(index);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn depth_table_picks_highest_threshold_at_or_below() {
        let table = DepthTable::new(vec![(1, 2), (4, 3), (6, 5)]);
        assert_eq!(table.value(1), 2);
        assert_eq!(table.value(3), 2);
        assert_eq!(table.value(4), 3);
        assert_eq!(table.value(5), 3);
        assert_eq!(table.value(6), 5);
        assert_eq!(table.value(99), 5);
    }

    #[test]
    fn depth_below_every_threshold_yields_zero() {
        let table = DepthTable::new(vec![(3, 15), (5, 30)]);
        assert_eq!(table.value(1), 0);
        assert_eq!(table.value(2), 0);
    }

    #[test]
    fn flat_table_ignores_depth() {
        let table = DepthTable::flat(80);
        assert_eq!(table.value(1), 80);
        assert_eq!(table.value(50), 80);
    }

    #[test]
    fn weighted_choice_never_picks_zero_weight() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let picked = weighted_choice(&mut rng, &[0, 10, 0, 5]).unwrap();
            assert!(picked == 1 || picked == 3);
        }
    }

    #[test]
    fn weighted_choice_with_all_zero_weights_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(weighted_choice(&mut rng, &[0, 0]), None);
        assert_eq!(weighted_choice(&mut rng, &[]), None);
    }

    #[test]
    fn weighted_choice_respects_proportions_roughly() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 2];
        for _ in 0..2000 {
            counts[weighted_choice(&mut rng, &[80, 20]).unwrap()] += 1;
        }
        assert!(counts[0] > counts[1] * 2);
    }
}
