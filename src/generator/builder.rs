//! In-progress entry owned by one generation call.

use crate::model::{Entry, GroupSizes, Id};
use crate::stats::Occurrences;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Mutable entry under construction plus the set of persons not yet
/// placed.
///
/// Every mutation goes through [`EntryBuilder::place`], which refuses
/// placements that would exceed a group's capacity or place a person
/// twice. The builder therefore never holds an invalid entry.
pub(crate) struct EntryBuilder<'a, P: Ord, G: Ord> {
    sizes: &'a GroupSizes<G>,
    stats: &'a Occurrences<P, G>,
    groups: BTreeMap<G, BTreeSet<P>>,
    placed: BTreeMap<P, G>,
    remaining: BTreeSet<P>,
}

impl<'a, P: Id, G: Id> EntryBuilder<'a, P, G> {
    pub fn new(
        persons: &BTreeSet<P>,
        sizes: &'a GroupSizes<G>,
        stats: &'a Occurrences<P, G>,
    ) -> Self {
        Self {
            sizes,
            stats,
            groups: sizes.keys().map(|g| (g.clone(), BTreeSet::new())).collect(),
            placed: BTreeMap::new(),
            remaining: persons.clone(),
        }
    }

    pub fn stats(&self) -> &'a Occurrences<P, G> {
        self.stats
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &'a G> {
        self.sizes.keys()
    }

    pub fn members(&self, group_id: &G) -> impl Iterator<Item = &P> {
        self.groups.get(group_id).into_iter().flatten()
    }

    pub fn occupancy(&self, group_id: &G) -> usize {
        self.groups.get(group_id).map_or(0, BTreeSet::len)
    }

    pub fn capacity(&self, group_id: &G) -> usize {
        self.sizes.get(group_id).copied().unwrap_or(0)
    }

    /// Whether `group_id` has room for `n` more persons.
    pub fn can_hold(&self, group_id: &G, n: usize) -> bool {
        self.occupancy(group_id) + n <= self.capacity(group_id)
    }

    pub fn is_empty_group(&self, group_id: &G) -> bool {
        self.occupancy(group_id) == 0
    }

    pub fn group_of(&self, person_id: &P) -> Option<&G> {
        self.placed.get(person_id)
    }

    /// Whether the person belongs to the population being placed.
    pub fn knows(&self, person_id: &P) -> bool {
        self.remaining.contains(person_id) || self.placed.contains_key(person_id)
    }

    pub fn is_remaining(&self, person_id: &P) -> bool {
        self.remaining.contains(person_id)
    }

    pub fn remaining(&self) -> &BTreeSet<P> {
        &self.remaining
    }

    /// Places a not-yet-placed person into a group with room.
    ///
    /// Returns `false` (and changes nothing) if the person is unknown or
    /// already placed, or if the group is unknown or full.
    pub fn place(&mut self, person_id: &P, group_id: &G) -> bool {
        if !self.remaining.contains(person_id) || !self.can_hold(group_id, 1) {
            return false;
        }
        let Some(members) = self.groups.get_mut(group_id) else {
            return false;
        };
        members.insert(person_id.clone());
        self.remaining.remove(person_id);
        self.placed.insert(person_id.clone(), group_id.clone());
        true
    }

    /// Places every person of `person_ids` into `group_id`, all or nothing.
    pub fn place_all(&mut self, person_ids: &[P], group_id: &G) -> bool {
        let all_free = person_ids.iter().all(|p| self.remaining.contains(p));
        if !all_free || !self.can_hold(group_id, person_ids.len()) {
            return false;
        }
        person_ids.iter().all(|p| self.place(p, group_id))
    }

    /// Shuffles `person_ids`, then stably sorts them by ascending pairing
    /// count, so persons with fewer historical pairings come first and
    /// exact ties are in random order.
    pub fn by_pairing_count<'p, I, R>(&self, person_ids: I, rng: &mut R) -> Vec<P>
    where
        P: 'p,
        I: IntoIterator<Item = &'p P>,
        R: Rng + ?Sized,
    {
        let mut order: Vec<P> = person_ids.into_iter().cloned().collect();
        order.shuffle(rng);
        order.sort_by_key(|p| self.stats.pairing_count(p));
        order
    }

    /// Finishes construction, returning the entry and anyone left over.
    pub fn finish(self) -> (Entry<P, G>, BTreeSet<P>) {
        (Entry::from(self.groups), self.remaining)
    }
}
