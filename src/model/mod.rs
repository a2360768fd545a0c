//! Core data model: identifiers, entries and placement constraints.
//!
//! # Key Types
//!
//! - [`Id`]: Marker trait for person and group identifiers
//! - [`Entry`]: One round's assignment of persons to groups
//! - [`GroupSizes`]: Capacity of each group
//! - [`Constraint`]: Prioritized `Apart` / `Together` placement requirement
//!
//! Identifiers are opaque to the crate. They only need a total order so
//! that iteration (and therefore seeded generation) is deterministic.

mod constraint;
mod entry;

use std::collections::BTreeMap;
use std::fmt::Debug;

pub use constraint::{Apart, Constraint, Together};
pub use entry::Entry;

/// An opaque person or group identifier.
///
/// Blanket-implemented for every `Clone + Ord + Debug` type, so `String`,
/// `&'static str`, integers and user newtypes all work out of the box.
pub trait Id: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Id for T {}

/// Capacity of each group, keyed by group identifier.
pub type GroupSizes<G> = BTreeMap<G, usize>;
