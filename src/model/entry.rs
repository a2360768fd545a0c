//! Entry: one round's assignment of persons to groups.

use super::Id;
use std::collections::{BTreeMap, BTreeSet};

/// A complete (or historical) assignment of persons to groups.
///
/// Each group holds a set of persons, so a person can never appear twice
/// in the same group. Appearing in two *different* groups is representable
/// and is rejected by [`Entry::duplicate_person`] checks at the session
/// boundary.
///
/// # Examples
///
/// ```
/// use u_regroup::Entry;
///
/// let entry: Entry<&str, &str> = Entry::from_groups([
///     ("g1", vec!["ann", "bob"]),
///     ("g2", vec!["cid"]),
/// ]);
/// assert_eq!(entry.group_of(&"bob"), Some(&"g1"));
/// assert_eq!(entry.person_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entry<P: Ord, G: Ord> {
    groups: BTreeMap<G, BTreeSet<P>>,
}

impl<P: Id, G: Id> Entry<P, G> {
    /// Creates an entry with no groups.
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Creates an entry with every given group present and empty.
    pub fn with_groups<I: IntoIterator<Item = G>>(group_ids: I) -> Self {
        Self {
            groups: group_ids
                .into_iter()
                .map(|g| (g, BTreeSet::new()))
                .collect(),
        }
    }

    /// Builds an entry from `(group, members)` pairs.
    ///
    /// Repeating a group id merges its members.
    pub fn from_groups<I, M>(groups: I) -> Self
    where
        I: IntoIterator<Item = (G, M)>,
        M: IntoIterator<Item = P>,
    {
        let mut entry = Self::new();
        for (group_id, members) in groups {
            entry.groups.entry(group_id).or_default().extend(members);
        }
        entry
    }

    /// Adds `person_id` to `group_id`, creating the group if needed.
    ///
    /// Returns `false` if the person was already in that group.
    pub fn insert(&mut self, group_id: G, person_id: P) -> bool {
        self.groups.entry(group_id).or_default().insert(person_id)
    }

    /// Members of a group, if the group is present.
    pub fn group(&self, group_id: &G) -> Option<&BTreeSet<P>> {
        self.groups.get(group_id)
    }

    /// Iterates `(group, members)` in group order.
    pub fn groups(&self) -> impl Iterator<Item = (&G, &BTreeSet<P>)> {
        self.groups.iter()
    }

    /// The group holding `person_id`, if any.
    pub fn group_of(&self, person_id: &P) -> Option<&G> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(person_id))
            .map(|(group_id, _)| group_id)
    }

    /// Total number of placements across all groups.
    pub fn person_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Number of groups present (including empty ones).
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the first person found in more than one group.
    pub fn duplicate_person(&self) -> Option<&P> {
        let mut seen = BTreeSet::new();
        self.groups
            .values()
            .flatten()
            .find(|&person_id| !seen.insert(person_id))
    }

    /// Consumes the entry, returning the underlying map.
    pub fn into_groups(self) -> BTreeMap<G, BTreeSet<P>> {
        self.groups
    }
}

impl<P: Id, G: Id> Default for Entry<P, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Id, G: Id> From<BTreeMap<G, BTreeSet<P>>> for Entry<P, G> {
    fn from(groups: BTreeMap<G, BTreeSet<P>>) -> Self {
        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_groups_merges_repeated_group() {
        let entry: Entry<u32, &str> = Entry::from_groups([("a", vec![1, 2]), ("a", vec![3])]);
        assert_eq!(entry.group_count(), 1);
        assert_eq!(entry.group(&"a").map(BTreeSet::len), Some(3));
    }

    #[test]
    fn test_with_groups_starts_empty() {
        let entry: Entry<u32, u32> = Entry::with_groups([1, 2, 3]);
        assert_eq!(entry.group_count(), 3);
        assert_eq!(entry.person_count(), 0);
        assert!(entry.groups().all(|(_, m)| m.is_empty()));
    }

    #[test]
    fn test_insert_and_group_of() {
        let mut entry: Entry<&str, u8> = Entry::new();
        assert!(entry.insert(1, "x"));
        assert!(!entry.insert(1, "x"));
        assert_eq!(entry.group_of(&"x"), Some(&1));
        assert_eq!(entry.group_of(&"y"), None);
    }

    #[test]
    fn test_duplicate_person_across_groups() {
        let entry: Entry<&str, u8> = Entry::from_groups([(1, vec!["a", "b"]), (2, vec!["c", "a"])]);
        assert_eq!(entry.duplicate_person(), Some(&"a"));

        let clean: Entry<&str, u8> = Entry::from_groups([(1, vec!["a"]), (2, vec!["b"])]);
        assert_eq!(clean.duplicate_person(), None);
    }
}
