//! Inputs of one entry generation.

use crate::model::{Constraint, GroupSizes, Id};
use crate::stats::Occurrences;
use std::collections::BTreeSet;

/// A borrowed view of everything one generation needs.
///
/// The generator trusts these inputs: capacities are positive, their sum
/// covers the population and constraints reference known ids. The session
/// checks all of that before building a problem; callers driving the
/// generator directly are responsible for it themselves.
#[derive(Debug)]
pub struct RegroupProblem<'a, P: Ord, G: Ord> {
    /// Persons to place.
    pub persons: &'a BTreeSet<P>,

    /// Capacity of every group.
    pub group_sizes: &'a GroupSizes<G>,

    /// Redundancy statistics of the history so far.
    pub occurrences: &'a Occurrences<P, G>,

    /// Constraints, highest priority first.
    pub constraints: &'a [Constraint<P, G>],
}

impl<'a, P: Id, G: Id> RegroupProblem<'a, P, G> {
    pub fn new(
        persons: &'a BTreeSet<P>,
        group_sizes: &'a GroupSizes<G>,
        occurrences: &'a Occurrences<P, G>,
        constraints: &'a [Constraint<P, G>],
    ) -> Self {
        Self {
            persons,
            group_sizes,
            occurrences,
            constraints,
        }
    }

    /// Total seats over all groups.
    pub fn capacity(&self) -> usize {
        self.group_sizes.values().sum()
    }
}
