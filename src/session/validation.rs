//! Input validation at the session boundary.

use super::config::ConflictPolicy;
use crate::error::RegroupError;
use crate::model::{Constraint, Entry, GroupSizes, Id};
use std::collections::BTreeSet;

/// Every group must hold at least one person, and all groups together
/// must hold the whole population.
pub(crate) fn check_capacity<P: Id, G: Id>(
    persons: &BTreeSet<P>,
    group_sizes: &GroupSizes<G>,
) -> Result<(), RegroupError> {
    if let Some((group_id, _)) = group_sizes.iter().find(|(_, size)| **size == 0) {
        return Err(RegroupError::InvalidCapacity {
            group: format!("{group_id:?}"),
        });
    }
    let capacity: usize = group_sizes.values().sum();
    if capacity < persons.len() {
        return Err(RegroupError::InsufficientCapacity {
            persons: persons.len(),
            capacity,
        });
    }
    Ok(())
}

/// A history entry must not place anyone twice.
pub(crate) fn check_entry<P: Id, G: Id>(
    entry: &Entry<P, G>,
    index: Option<usize>,
) -> Result<(), RegroupError> {
    match entry.duplicate_person() {
        Some(person_id) => Err(RegroupError::InvalidHistoryEntry {
            index,
            person: format!("{person_id:?}"),
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_history<P: Id, G: Id>(history: &[Entry<P, G>]) -> Result<(), RegroupError> {
    history
        .iter()
        .enumerate()
        .try_for_each(|(i, entry)| check_entry(entry, Some(i)))
}

/// Checks each constraint on its own, then pairwise conflicts unless the
/// policy defers them to list order.
pub(crate) fn check_constraints<P: Id, G: Id>(
    persons: &BTreeSet<P>,
    group_sizes: &GroupSizes<G>,
    constraints: &[Constraint<P, G>],
    policy: ConflictPolicy,
) -> Result<(), RegroupError> {
    for (index, constraint) in constraints.iter().enumerate() {
        check_constraint(persons, group_sizes, constraint)
            .map_err(|reason| RegroupError::InvalidConstraint { index, reason })?;
    }

    if policy == ConflictPolicy::Reject {
        for (first, a) in constraints.iter().enumerate() {
            for (offset, b) in constraints[first + 1..].iter().enumerate() {
                if let Some(reason) = conflict(a, b) {
                    return Err(RegroupError::ConflictingConstraints {
                        first,
                        second: first + 1 + offset,
                        reason,
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_constraint<P: Id, G: Id>(
    persons: &BTreeSet<P>,
    group_sizes: &GroupSizes<G>,
    constraint: &Constraint<P, G>,
) -> Result<(), String> {
    if constraint.persons().is_empty() {
        return Err("no persons".into());
    }
    if let Some(person_id) = constraint.persons().iter().find(|p| !persons.contains(*p)) {
        return Err(format!("unknown person {person_id:?}"));
    }
    if let Some(group_id) = constraint
        .referenced_groups()
        .into_iter()
        .find(|g| !group_sizes.contains_key(*g))
    {
        return Err(format!("unknown group {group_id:?}"));
    }

    let Constraint::Together(together) = constraint else {
        return Ok(());
    };
    match &together.mandatory_group {
        Some(group_id) => {
            let capacity = group_sizes.get(group_id).copied().unwrap_or(0);
            if together.persons.len() > capacity {
                return Err(format!(
                    "{} persons cannot fit into {group_id:?} of capacity {capacity}",
                    together.persons.len()
                ));
            }
        }
        None => {
            if group_sizes
                .keys()
                .all(|g| together.forbidden_groups.contains(g))
            {
                return Err("every group is forbidden".into());
            }
        }
    }
    Ok(())
}

fn conflict<P: Id, G: Id>(a: &Constraint<P, G>, b: &Constraint<P, G>) -> Option<String> {
    match (a, b) {
        (Constraint::Apart(apart), Constraint::Together(together))
        | (Constraint::Together(together), Constraint::Apart(apart)) => {
            let shared: Vec<&P> = apart.persons.intersection(&together.persons).collect();
            (shared.len() >= 2).then(|| format!("{shared:?} must be both apart and together"))
        }
        (Constraint::Together(t1), Constraint::Together(t2)) => {
            let shared = t1.persons.intersection(&t2.persons).next()?;
            match (&t1.mandatory_group, &t2.mandatory_group) {
                (Some(g1), Some(g2)) if g1 != g2 => {
                    Some(format!("{shared:?} is pinned to both {g1:?} and {g2:?}"))
                }
                (Some(g), None) if t2.forbidden_groups.contains(g) => {
                    Some(format!("{shared:?} is pinned to {g:?} but also kept out of it"))
                }
                (None, Some(g)) if t1.forbidden_groups.contains(g) => {
                    Some(format!("{shared:?} is kept out of {g:?} but also pinned to it"))
                }
                _ => None,
            }
        }
        (Constraint::Apart(_), Constraint::Apart(_)) => None,
    }
}
