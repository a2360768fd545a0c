//! Free placement of everyone the constraints left unplaced.

use super::builder::EntryBuilder;
use super::rules::{Admission, Criterion, TieBreakChain};
use crate::model::Id;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::slice;

/// Seeds empty groups with couples of unplaced persons.
///
/// Couples are tried in order of fewest past meetings, then of the lower
/// pairing count of the two; exact ties are shuffled. Each accepted couple
/// opens one empty group, chosen by group redundancy. Stops when fewer
/// than two persons remain or no empty group can take a couple.
///
/// Returns the number of couples placed.
pub(crate) fn seed_couples<P, G, R>(builder: &mut EntryBuilder<'_, P, G>, rng: &mut R) -> usize
where
    P: Id,
    G: Id,
    R: Rng + ?Sized,
{
    let stats = builder.stats();
    let remaining: Vec<P> = builder.remaining().iter().cloned().collect();

    let mut couples: Vec<[P; 2]> = remaining
        .iter()
        .enumerate()
        .flat_map(|(i, a)| remaining[i + 1..].iter().map(move |b| [a.clone(), b.clone()]))
        .collect();
    couples.shuffle(rng);
    couples.sort_by_key(|[a, b]| {
        let least_paired = stats.pairing_count(a).min(stats.pairing_count(b));
        (stats.pair_count(a, b), least_paired)
    });

    let mut empty: BTreeSet<G> = builder
        .group_ids()
        .filter(|g| builder.is_empty_group(g))
        .cloned()
        .collect();
    let chain = TieBreakChain::new(Admission::Any).then(Criterion::GroupRedundancy);

    let mut seeded = 0;
    for couple in couples {
        if builder.remaining().len() < 2 {
            break;
        }
        if !couple.iter().all(|p| builder.is_remaining(p)) {
            continue;
        }
        let Some(group_id) = chain.select(builder, &couple, empty.iter(), rng) else {
            break;
        };
        if builder.place_all(&couple, &group_id) {
            empty.remove(&group_id);
            seeded += 1;
        }
    }
    seeded
}

/// Places every remaining person, least-paired first.
///
/// Each person joins a non-empty group with room, chosen by pair
/// redundancy, then group redundancy, then larger capacity. Persons for
/// whom no such group exists are then placed anywhere with room by group
/// redundancy alone; this covers isolated single-seat groups.
///
/// Returns the number of persons that needed that last pass, and the
/// persons that could not be placed at all.
pub(crate) fn place_remaining<P, G, R>(
    builder: &mut EntryBuilder<'_, P, G>,
    rng: &mut R,
) -> (usize, Vec<P>)
where
    P: Id,
    G: Id,
    R: Rng + ?Sized,
{
    let order = builder.by_pairing_count(builder.remaining(), rng);

    let joining = TieBreakChain::new(Admission::Occupied)
        .then(Criterion::PairRedundancy)
        .then(Criterion::GroupRedundancy)
        .then(Criterion::LargestCapacity);
    let fallback = TieBreakChain::new(Admission::Any).then(Criterion::GroupRedundancy);

    let mut leftovers = Vec::new();
    for person in order {
        let target = joining.select(builder, slice::from_ref(&person), builder.group_ids(), rng);
        if !target.is_some_and(|g| builder.place(&person, &g)) {
            leftovers.push(person);
        }
    }

    let fallback_count = leftovers.len();
    let mut unplaceable = Vec::new();
    for person in leftovers {
        let target = fallback.select(builder, slice::from_ref(&person), builder.group_ids(), rng);
        if !target.is_some_and(|g| builder.place(&person, &g)) {
            unplaceable.push(person);
        }
    }
    (fallback_count - unplaceable.len(), unplaceable)
}
