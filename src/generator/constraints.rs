//! Constraint placement.
//!
//! Each function places the constrained persons it can into the shared
//! builder and returns the members it could not place as required (the
//! constraint's shortfall). A shortfall is never an error: persons left
//! unplaced stay in the remaining set and are placed by the free phase,
//! and persons already seated against a group pin keep their seat.

use super::builder::EntryBuilder;
use super::rules::{pick, Admission, Criterion, TieBreakChain};
use crate::model::{Apart, Id, Together};
use rand::Rng;
use std::collections::BTreeSet;
use std::slice;

/// Spreads the members of an `Apart` constraint over distinct groups.
///
/// Members are visited least-paired first. A member already placed by an
/// earlier constraint only consumes its group. Unplaced members prefer
/// groups that are neither empty nor full, so nobody gets scattered into
/// an empty group while company is available; among those the choice
/// minimizes pair redundancy, then group redundancy, then prefers larger
/// groups. Without such groups, any group with room is chosen by group
/// redundancy alone. Each group hosts at most one member.
pub(crate) fn satisfy_apart<P, G, R>(
    builder: &mut EntryBuilder<'_, P, G>,
    apart: &Apart<P>,
    rng: &mut R,
) -> Vec<P>
where
    P: Id,
    G: Id,
    R: Rng + ?Sized,
{
    let members: Vec<&P> = apart.persons.iter().filter(|p| builder.knows(p)).collect();
    let order = builder.by_pairing_count(members, rng);

    let mut available: BTreeSet<G> = builder
        .group_ids()
        .filter(|g| builder.can_hold(g, 1))
        .cloned()
        .collect();
    let mut priority: BTreeSet<G> = available
        .iter()
        .filter(|g| !builder.is_empty_group(g))
        .cloned()
        .collect();

    let in_company = TieBreakChain::new(Admission::Occupied)
        .then(Criterion::PairRedundancy)
        .then(Criterion::GroupRedundancy)
        .then(Criterion::LargestCapacity);
    let anywhere = TieBreakChain::new(Admission::Any).then(Criterion::GroupRedundancy);

    // Groups already hosting a member are consumed up front, whatever
    // the visiting order.
    for person in &order {
        if let Some(group_id) = builder.group_of(person) {
            available.remove(group_id);
            priority.remove(group_id);
        }
    }

    let mut shortfall = Vec::new();
    for person in order {
        if !builder.is_remaining(&person) {
            continue;
        }

        let newcomer = slice::from_ref(&person);
        let target = in_company
            .select(builder, newcomer, priority.iter(), rng)
            .or_else(|| anywhere.select(builder, newcomer, available.iter(), rng));

        let Some(group_id) = target.filter(|g| builder.place(&person, g)) else {
            shortfall.push(person);
            continue;
        };
        available.remove(&group_id);
        priority.remove(&group_id);
    }
    shortfall
}

/// Gathers the members of a `Together` constraint into one group.
///
/// If earlier constraints already placed some members, the others join
/// one of those groups (least pair redundancy, then group redundancy);
/// members who end up outside the mandatory group, or in a forbidden one,
/// are reported alongside those who fit nowhere. Otherwise a mandatory group is filled in order up to capacity.
/// Otherwise the members go, all at once, to the non-forbidden group that
/// best fits them; when no group can hold them all, the last member is
/// dropped and the search repeats.
pub(crate) fn satisfy_together<P, G, R>(
    builder: &mut EntryBuilder<'_, P, G>,
    together: &Together<P, G>,
    rng: &mut R,
) -> Vec<P>
where
    P: Id,
    G: Id,
    R: Rng + ?Sized,
{
    let members: Vec<&P> = together.persons.iter().filter(|p| builder.knows(p)).collect();
    let order = builder.by_pairing_count(members, rng);

    let used: BTreeSet<G> = order
        .iter()
        .filter_map(|p| builder.group_of(p).cloned())
        .collect();
    let unplaced: Vec<P> = order
        .iter()
        .filter(|p| builder.is_remaining(p))
        .cloned()
        .collect();

    if !used.is_empty() {
        let mut shortfall = join_used_groups(builder, unplaced, &used, rng);
        shortfall.extend(
            order
                .into_iter()
                .filter(|p| outside_allowed_groups(builder, together, p)),
        );
        return shortfall;
    }

    if let Some(mandatory) = &together.mandatory_group {
        return unplaced
            .into_iter()
            .filter(|p| !builder.place(p, mandatory))
            .collect();
    }

    let candidates: BTreeSet<G> = builder
        .group_ids()
        .filter(|g| !together.forbidden_groups.contains(*g))
        .cloned()
        .collect();
    place_as_block(builder, unplaced, &candidates, rng)
}

/// Whether a placed member sits outside the mandatory group, or, without
/// one, inside a forbidden group.
fn outside_allowed_groups<P: Id, G: Id>(
    builder: &EntryBuilder<'_, P, G>,
    together: &Together<P, G>,
    person_id: &P,
) -> bool {
    let Some(group_id) = builder.group_of(person_id) else {
        return false;
    };
    match &together.mandatory_group {
        Some(mandatory) => group_id != mandatory,
        None => together.forbidden_groups.contains(group_id),
    }
}

fn join_used_groups<P, G, R>(
    builder: &mut EntryBuilder<'_, P, G>,
    unplaced: Vec<P>,
    used: &BTreeSet<G>,
    rng: &mut R,
) -> Vec<P>
where
    P: Id,
    G: Id,
    R: Rng + ?Sized,
{
    let chain = TieBreakChain::new(Admission::Occupied)
        .then(Criterion::PairRedundancy)
        .then(Criterion::GroupRedundancy);

    let mut shortfall = Vec::new();
    for person in unplaced {
        let target = chain.select(builder, slice::from_ref(&person), used.iter(), rng);
        if !target.is_some_and(|g| builder.place(&person, &g)) {
            shortfall.push(person);
        }
    }
    shortfall
}

fn place_as_block<P, G, R>(
    builder: &mut EntryBuilder<'_, P, G>,
    mut block: Vec<P>,
    candidates: &BTreeSet<G>,
    rng: &mut R,
) -> Vec<P>
where
    P: Id,
    G: Id,
    R: Rng + ?Sized,
{
    let joining = TieBreakChain::new(Admission::Occupied)
        .then(Criterion::PairRedundancy)
        .then(Criterion::GroupRedundancy)
        .then(Criterion::LargestCapacity);
    let opening = TieBreakChain::new(Admission::Any)
        .then(Criterion::GroupRedundancy)
        .then(Criterion::LargestCapacity);

    let mut dropped = Vec::new();
    while !block.is_empty() {
        let mut best = joining.best(builder, &block, candidates.iter());
        if best.is_empty() {
            best = opening.best(builder, &block, candidates.iter());
        }
        if let Some(group_id) = pick(best, rng) {
            if builder.place_all(&block, &group_id) {
                break;
            }
        }
        if let Some(last) = block.pop() {
            dropped.push(last);
        }
    }
    dropped.reverse();
    dropped
}
