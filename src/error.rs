//! Error type for session construction, mutation and generation.

use std::fmt::{self, Display};

/// Errors raised at the session boundary.
///
/// All variants are fatal to the call that raised them; nothing is
/// committed. Identifiers are rendered with their `Debug` form so the
/// error type stays independent of the id types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegroupError {
    /// A group has capacity zero.
    InvalidCapacity { group: String },

    /// The population does not fit into the groups.
    InsufficientCapacity { persons: usize, capacity: usize },

    /// An entry places the same person in more than one group.
    InvalidHistoryEntry {
        /// Position in the history, or `None` for an entry being saved.
        index: Option<usize>,
        person: String,
    },

    /// A constraint references an unknown person or group, or cannot be
    /// satisfied by construction.
    InvalidConstraint { index: usize, reason: String },

    /// Two constraints demand incompatible placements.
    ConflictingConstraints {
        first: usize,
        second: usize,
        reason: String,
    },
}

impl Display for RegroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { group } => {
                write!(f, "group {group} has a non-positive capacity")
            }
            Self::InsufficientCapacity { persons, capacity } => write!(
                f,
                "groups hold {capacity} persons in total but {persons} must be placed"
            ),
            Self::InvalidHistoryEntry {
                index: Some(i),
                person,
            } => write!(f, "history entry #{i} places {person} more than once"),
            Self::InvalidHistoryEntry {
                index: None,
                person,
            } => write!(f, "entry places {person} more than once"),
            Self::InvalidConstraint { index, reason } => {
                write!(f, "constraint #{index} is invalid: {reason}")
            }
            Self::ConflictingConstraints {
                first,
                second,
                reason,
            } => write!(f, "constraints #{first} and #{second} conflict: {reason}"),
        }
    }
}

impl std::error::Error for RegroupError {}
