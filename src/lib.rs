//! History-aware group assignment.
//!
//! Places a population of persons into fixed-capacity groups, round after
//! round, so that people meet others they have rarely been grouped with
//! and rotate through groups they have rarely sat in. Placement is a
//! greedy, randomized construction steered by statistics over the full
//! history of past rounds:
//!
//! - **Model**: identifiers, entries (one round's assignment), group
//!   capacities and prioritized `Apart` / `Together` constraints.
//! - **Stats**: pairing counts, pair occurrences and person-group
//!   occurrences aggregated from the history.
//! - **Generator**: constraint placement followed by greedy assignment
//!   with sequential tie-break rules and uniform random final ties.
//! - **Session**: validated inputs plus the growing history; the
//!   stateful entry point.
//!
//! # Example
//!
//! ```
//! use u_regroup::{GroupSizes, Session, SessionConfig};
//!
//! let sizes: GroupSizes<&str> = [("red", 2), ("blue", 2)].into_iter().collect();
//! let mut session = Session::with_config(
//!     ["ann", "bob", "cid", "dan"],
//!     sizes,
//!     Vec::new(),
//!     Vec::new(),
//!     SessionConfig::default().with_seed(42),
//! )
//! .unwrap();
//!
//! for _ in 0..3 {
//!     let result = session.generate().unwrap();
//!     // Four persons in pairs can meet someone new three rounds in a row.
//!     assert_eq!(result.pair_redundancy, 0);
//!     session.save_entry(result.entry).unwrap();
//! }
//! ```
//!
//! The crate performs no I/O and is deterministic for a given seed.

pub mod error;
pub mod generator;
pub mod model;
pub mod session;
pub mod stats;

pub use error::RegroupError;
pub use generator::{GenerationResult, Shortfall};
pub use model::{Apart, Constraint, Entry, GroupSizes, Id, Together};
pub use session::{ConflictPolicy, Session, SessionConfig};
pub use stats::Occurrences;
