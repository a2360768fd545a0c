//! History statistics.
//!
//! Three redundancy measures drive every placement decision:
//!
//! - **Pairing count**: per person, total historical group-mates.
//! - **Pair count**: per unordered person pair, number of shared groups.
//! - **Group count**: per (person, group), number of past placements.
//!
//! [`Occurrences::aggregate`] recomputes all three from the full history
//! on every call; nothing is cached across rounds.

mod keys;
mod occurrences;

pub use keys::{GroupKey, PairKey};
pub use occurrences::Occurrences;
