//! Session: the stateful entry point.
//!
//! A [`Session`] owns the population, group capacities, constraints and
//! history. It validates every input at the boundary, generates entries on
//! demand and appends entries the caller chooses to keep.
//!
//! # Key Types
//!
//! - [`Session`]: Validated inputs plus the growing history
//! - [`SessionConfig`]: Seed, conflict policy and couple seeding
//! - [`ConflictPolicy`]: Whether contradictory constraints are rejected

mod config;
mod store;
mod validation;

pub use config::{ConflictPolicy, SessionConfig};
pub use store::Session;
