//! Keys indexing the occurrence statistics.

use crate::model::Id;

/// Key for an unordered pair of persons.
///
/// `PairKey::new(a, b) == PairKey::new(b, a)`: the smaller id is always
/// stored first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey<P> {
    low: P,
    high: P,
}

impl<P: Id> PairKey<P> {
    pub fn new(a: P, b: P) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Builds a key from borrowed ids, cloning only what is stored.
    pub fn of(a: &P, b: &P) -> Self {
        Self::new(a.clone(), b.clone())
    }

    pub fn first(&self) -> &P {
        &self.low
    }

    pub fn second(&self) -> &P {
        &self.high
    }

    /// Returns `true` if `person_id` is one side of the pair.
    pub fn contains(&self, person_id: &P) -> bool {
        &self.low == person_id || &self.high == person_id
    }
}

/// Key for an ordered (person, group) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey<P, G> {
    person: P,
    group: G,
}

impl<P: Id, G: Id> GroupKey<P, G> {
    pub fn new(person: P, group: G) -> Self {
        Self { person, group }
    }

    pub fn of(person: &P, group: &G) -> Self {
        Self::new(person.clone(), group.clone())
    }

    pub fn person(&self) -> &P {
        &self.person
    }

    pub fn group(&self) -> &G {
        &self.group
    }
}
