//! Entry generation.
//!
//! A greedy, non-backtracking construction in two phases:
//!
//! 1. **Constrained**: constraints are processed in list order, each
//!    placing what it can into a shared entry builder. What a
//!    constraint cannot place is reported as a [`Shortfall`], never an
//!    error.
//! 2. **Free**: empty groups are opened with couples of persons who met
//!    least, then everyone left joins the occupied group with the least
//!    average pair redundancy. Persons with no occupied group available
//!    are placed last by group redundancy alone.
//!
//! Every choice between equally good groups is broken uniformly at random
//! with the caller's RNG, so a seeded RNG reproduces an entry exactly.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use u_regroup::generator::{EntryGenerator, GeneratorConfig, RegroupProblem};
//! use u_regroup::{GroupSizes, Occurrences};
//!
//! let persons: BTreeSet<u32> = (0..6).collect();
//! let sizes: GroupSizes<&str> = [("red", 3), ("blue", 3)].into_iter().collect();
//! let occurrences = Occurrences::aggregate(&persons, &sizes, &[]);
//!
//! let problem = RegroupProblem::new(&persons, &sizes, &occurrences, &[]);
//! let result = EntryGenerator::run(&problem, &GeneratorConfig::default().with_seed(42)).unwrap();
//! assert_eq!(result.entry.person_count(), 6);
//! ```

mod builder;
mod config;
mod constraints;
mod greedy;
mod rules;
mod runner;
mod types;

pub use config::GeneratorConfig;
pub use runner::{EntryGenerator, GenerationResult, Shortfall};
pub use types::RegroupProblem;
