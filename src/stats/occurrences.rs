//! Occurrence aggregation over the history.

use super::keys::{GroupKey, PairKey};
use crate::model::{Entry, GroupSizes, Id};
use std::collections::{BTreeMap, BTreeSet};

/// Redundancy statistics derived from a history.
///
/// Every person, every unordered pair of persons and every
/// (person, group) combination has a key, zero when never observed.
/// Lookups for ids outside the population also return zero, so callers
/// can index blindly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrences<P: Ord, G: Ord> {
    pairing_counts: BTreeMap<P, u64>,
    pair_counts: BTreeMap<PairKey<P>, u64>,
    group_counts: BTreeMap<GroupKey<P, G>, u64>,
}

impl<P: Id, G: Id> Occurrences<P, G> {
    /// Scans `history` once and counts past pairings.
    ///
    /// Only persons in `persons` are counted: a historical group-mate who
    /// has left the population contributes nothing to either side of a
    /// pair, nor to pairing counts. Historical groups absent from
    /// `group_sizes` contribute pair counts but no person-group counts.
    ///
    /// # Complexity
    /// O(P² + P·K) initialization and O(H·M²) scanning, with P persons,
    /// K groups, H entries and M the largest historical group.
    pub fn aggregate(
        persons: &BTreeSet<P>,
        group_sizes: &GroupSizes<G>,
        history: &[Entry<P, G>],
    ) -> Self {
        let mut pairing_counts = BTreeMap::new();
        let mut pair_counts = BTreeMap::new();
        let mut group_counts = BTreeMap::new();

        let population: Vec<&P> = persons.iter().collect();
        for (i, &p1) in population.iter().enumerate() {
            pairing_counts.insert(p1.clone(), 0);
            for &p2 in &population[i + 1..] {
                pair_counts.insert(PairKey::of(p1, p2), 0);
            }
            for group_id in group_sizes.keys() {
                group_counts.insert(GroupKey::of(p1, group_id), 0);
            }
        }

        for entry in history {
            for (group_id, members) in entry.groups() {
                let present: Vec<&P> = members.iter().filter(|p| persons.contains(p)).collect();
                let mates = present.len().saturating_sub(1) as u64;
                for (i, &p1) in present.iter().enumerate() {
                    if let Some(count) = pairing_counts.get_mut(p1) {
                        *count += mates;
                    }
                    for &p2 in &present[i + 1..] {
                        if let Some(count) = pair_counts.get_mut(&PairKey::of(p1, p2)) {
                            *count += 1;
                        }
                    }
                    if let Some(count) = group_counts.get_mut(&GroupKey::of(p1, group_id)) {
                        *count += 1;
                    }
                }
            }
        }

        Self {
            pairing_counts,
            pair_counts,
            group_counts,
        }
    }

    /// Total historical group-mates of `person_id`.
    pub fn pairing_count(&self, person_id: &P) -> u64 {
        self.pairing_counts.get(person_id).copied().unwrap_or(0)
    }

    /// Number of past entries placing `a` and `b` in the same group.
    pub fn pair_count(&self, a: &P, b: &P) -> u64 {
        self.pair_counts
            .get(&PairKey::of(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Number of past entries placing `person_id` in `group_id`.
    pub fn group_count(&self, person_id: &P, group_id: &G) -> u64 {
        self.group_counts
            .get(&GroupKey::of(person_id, group_id))
            .copied()
            .unwrap_or(0)
    }

    /// Iterates every unordered pair of the population with its count.
    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey<P>, u64)> {
        self.pair_counts.iter().map(|(key, &count)| (key, count))
    }

    /// Sum of historical pair counts realized by `entry`.
    pub fn pair_redundancy(&self, entry: &Entry<P, G>) -> u64 {
        entry
            .groups()
            .map(|(_, members)| {
                let members: Vec<&P> = members.iter().collect();
                members
                    .iter()
                    .enumerate()
                    .flat_map(|(i, &a)| members[i + 1..].iter().map(move |&b| (a, b)))
                    .map(|(a, b)| self.pair_count(a, b))
                    .sum::<u64>()
            })
            .sum()
    }

    /// Sum of historical person-group counts realized by `entry`.
    pub fn group_redundancy(&self, entry: &Entry<P, G>) -> u64 {
        entry
            .groups()
            .flat_map(|(group_id, members)| members.iter().map(move |p| (p, group_id)))
            .map(|(p, g)| self.group_count(p, g))
            .sum()
    }
}
