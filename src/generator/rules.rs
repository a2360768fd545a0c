//! Sequential tie-break chains for choosing a target group.
//!
//! A [`TieBreakChain`] narrows a candidate set one [`Criterion`] at a
//! time: each criterion keeps only the candidates with the best score,
//! and later criteria are consulted only while more than one candidate
//! remains. Whatever survives the whole chain is a genuine tie, broken
//! uniformly at random by [`TieBreakChain::select`].
//!
//! Averages are compared exactly as rationals, so "equal redundancy"
//! means equal, not within an epsilon.

use super::builder::EntryBuilder;
use crate::model::Id;
use rand::Rng;
use std::cmp::{Ordering, Reverse};

/// Which groups may be considered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Non-empty groups with room for every newcomer.
    ///
    /// Average pair redundancy is only defined against existing
    /// occupants.
    Occupied,

    /// Any group with room for every newcomer.
    Any,
}

/// A scoring criterion. Lower scores win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Criterion {
    /// Average historical pair count between newcomers and occupants.
    PairRedundancy,

    /// Average historical count of the newcomers in this group.
    GroupRedundancy,

    /// Prefer groups with larger capacity.
    LargestCapacity,
}

/// An exact average `sum / count`. An empty average is zero.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Average {
    sum: u64,
    count: u64,
}

impl Average {
    pub fn new(sum: u64, count: u64) -> Self {
        if count == 0 {
            Self { sum: 0, count: 1 }
        } else {
            Self { sum, count }
        }
    }
}

impl Ord for Average {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.sum) * u128::from(other.count);
        let rhs = u128::from(other.sum) * u128::from(self.count);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Average {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Average {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Average {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Score {
    Average(Average),
    Capacity(Reverse<usize>),
}

impl Criterion {
    fn score<P: Id, G: Id>(
        self,
        builder: &EntryBuilder<'_, P, G>,
        newcomers: &[P],
        group_id: &G,
    ) -> Score {
        let stats = builder.stats();
        match self {
            Criterion::PairRedundancy => {
                let mut sum = 0;
                let mut count = 0;
                for newcomer in newcomers {
                    for occupant in builder.members(group_id) {
                        sum += stats.pair_count(newcomer, occupant);
                        count += 1;
                    }
                }
                Score::Average(Average::new(sum, count))
            }
            Criterion::GroupRedundancy => {
                let sum = newcomers
                    .iter()
                    .map(|p| stats.group_count(p, group_id))
                    .sum();
                Score::Average(Average::new(sum, newcomers.len() as u64))
            }
            Criterion::LargestCapacity => Score::Capacity(Reverse(builder.capacity(group_id))),
        }
    }
}

/// An admission filter followed by criteria applied in order.
#[derive(Debug, Clone)]
pub(crate) struct TieBreakChain {
    admission: Admission,
    criteria: Vec<Criterion>,
}

impl TieBreakChain {
    pub fn new(admission: Admission) -> Self {
        Self {
            admission,
            criteria: Vec::new(),
        }
    }

    pub fn then(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    fn admits<P: Id, G: Id>(&self, builder: &EntryBuilder<'_, P, G>, n: usize, group_id: &G) -> bool {
        if !builder.can_hold(group_id, n) {
            return false;
        }
        match self.admission {
            Admission::Occupied => !builder.is_empty_group(group_id),
            Admission::Any => true,
        }
    }

    /// All admitted candidates that survive every criterion.
    ///
    /// Returns an empty vector when no candidate is admitted.
    pub fn best<'g, P, G, I>(&self, builder: &EntryBuilder<'_, P, G>, newcomers: &[P], candidates: I) -> Vec<G>
    where
        P: Id,
        G: Id + 'g,
        I: IntoIterator<Item = &'g G>,
    {
        let mut pool: Vec<G> = candidates
            .into_iter()
            .filter(|g| self.admits(builder, newcomers.len(), g))
            .cloned()
            .collect();
        pool.sort();
        pool.dedup();

        for criterion in &self.criteria {
            if pool.len() <= 1 {
                break;
            }
            let scored: Vec<(G, Score)> = pool
                .into_iter()
                .map(|g| {
                    let score = criterion.score(builder, newcomers, &g);
                    (g, score)
                })
                .collect();
            let Some(best) = scored.iter().map(|(_, s)| *s).min() else {
                return Vec::new();
            };
            pool = scored
                .into_iter()
                .filter(|(_, s)| *s == best)
                .map(|(g, _)| g)
                .collect();
        }
        pool
    }

    /// Runs the chain and breaks any remaining tie uniformly at random.
    pub fn select<'g, P, G, I, R>(
        &self,
        builder: &EntryBuilder<'_, P, G>,
        newcomers: &[P],
        candidates: I,
        rng: &mut R,
    ) -> Option<G>
    where
        P: Id,
        G: Id + 'g,
        I: IntoIterator<Item = &'g G>,
        R: Rng + ?Sized,
    {
        pick(self.best(builder, newcomers, candidates), rng)
    }
}

/// Uniformly random element of `pool`.
pub(crate) fn pick<G, R: Rng + ?Sized>(mut pool: Vec<G>, rng: &mut R) -> Option<G> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.random_range(0..pool.len());
    Some(pool.swap_remove(index))
}
