//! Placement constraints.

use super::Id;
use std::collections::BTreeSet;

/// Persons that must end up in mutually distinct groups.
///
/// Best-effort: when fewer groups have room than there are members, the
/// surplus members are left to the free placement phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Apart<P: Ord> {
    pub persons: BTreeSet<P>,
}

/// Persons that should end up in the same group.
///
/// `mandatory_group` pins the members to one group; `forbidden_groups`
/// excludes groups from consideration. If both are set, the mandatory
/// group wins and the exclusions are ignored.
///
/// # Examples
///
/// ```
/// use u_regroup::{Constraint, Together};
///
/// let pinned: Constraint<&str, &str> = Together::new(["ann", "bob"])
///     .with_mandatory_group("g1")
///     .into();
///
/// let not_at_g2: Constraint<&str, &str> = Together::new(["cid"])
///     .with_forbidden_groups(["g2"])
///     .into();
/// # let _ = (pinned, not_at_g2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Together<P: Ord, G: Ord> {
    pub persons: BTreeSet<P>,
    pub mandatory_group: Option<G>,
    pub forbidden_groups: BTreeSet<G>,
}

/// A placement constraint.
///
/// Constraints are applied strictly in list order. A later constraint may
/// be partially undermined by an earlier one's placements and is never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Constraint<P: Ord, G: Ord> {
    Apart(Apart<P>),
    Together(Together<P, G>),
}

impl<P: Id> Apart<P> {
    pub fn new<I: IntoIterator<Item = P>>(persons: I) -> Self {
        Self {
            persons: persons.into_iter().collect(),
        }
    }
}

impl<P: Id, G: Id> Together<P, G> {
    pub fn new<I: IntoIterator<Item = P>>(persons: I) -> Self {
        Self {
            persons: persons.into_iter().collect(),
            mandatory_group: None,
            forbidden_groups: BTreeSet::new(),
        }
    }

    /// Pins all members to `group_id`.
    pub fn with_mandatory_group(mut self, group_id: G) -> Self {
        self.mandatory_group = Some(group_id);
        self
    }

    /// Excludes the given groups.
    pub fn with_forbidden_groups<I: IntoIterator<Item = G>>(mut self, group_ids: I) -> Self {
        self.forbidden_groups.extend(group_ids);
        self
    }
}

impl<P: Id, G: Id> Constraint<P, G> {
    /// Shorthand for `Apart::new(persons).into()`.
    pub fn apart<I: IntoIterator<Item = P>>(persons: I) -> Self {
        Constraint::Apart(Apart::new(persons))
    }

    /// Shorthand for an unpinned `Together` constraint.
    pub fn together<I: IntoIterator<Item = P>>(persons: I) -> Self {
        Constraint::Together(Together::new(persons))
    }

    /// The persons named by this constraint.
    pub fn persons(&self) -> &BTreeSet<P> {
        match self {
            Constraint::Apart(apart) => &apart.persons,
            Constraint::Together(together) => &together.persons,
        }
    }

    /// Groups referenced by this constraint (mandatory and forbidden).
    pub fn referenced_groups(&self) -> Vec<&G> {
        match self {
            Constraint::Apart(_) => Vec::new(),
            Constraint::Together(together) => together
                .mandatory_group
                .iter()
                .chain(together.forbidden_groups.iter())
                .collect(),
        }
    }
}

impl<P: Id, G: Id> From<Apart<P>> for Constraint<P, G> {
    fn from(apart: Apart<P>) -> Self {
        Constraint::Apart(apart)
    }
}

impl<P: Id, G: Id> From<Together<P, G>> for Constraint<P, G> {
    fn from(together: Together<P, G>) -> Self {
        Constraint::Together(together)
    }
}
