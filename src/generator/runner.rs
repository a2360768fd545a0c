//! Entry generation: constrained phase, then free phase.

use super::builder::EntryBuilder;
use super::config::GeneratorConfig;
use super::constraints::{satisfy_apart, satisfy_together};
use super::greedy::{place_remaining, seed_couples};
use super::types::RegroupProblem;
use crate::error::RegroupError;
use crate::model::{Constraint, Entry, Id};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Persons a constraint could not place as required.
///
/// Every person still ends up in the entry; only the constraint's wish
/// went unmet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall<P> {
    /// Index of the constraint in the constraint list.
    pub constraint: usize,

    /// Members left to the free phase, or seated outside the constraint's
    /// mandatory group or inside one of its forbidden groups.
    pub persons: Vec<P>,
}

/// Result of one entry generation.
#[derive(Debug, Clone)]
pub struct GenerationResult<P: Ord, G: Ord> {
    /// The generated entry. Every person is placed exactly once and no
    /// group exceeds its capacity.
    pub entry: Entry<P, G>,

    /// Constraints that were only partly satisfied, in list order.
    pub shortfalls: Vec<Shortfall<P>>,

    /// Number of couples that opened an empty group.
    pub couples_seeded: usize,

    /// Number of persons placed by the last-resort pass, which ignores
    /// pair redundancy.
    pub fallback_placements: usize,

    /// Sum of historical pair counts realized by the entry.
    pub pair_redundancy: u64,

    /// Sum of historical person-group counts realized by the entry.
    pub group_redundancy: u64,
}

impl<P: Ord, G: Ord> GenerationResult<P, G> {
    /// Whether every constraint was fully satisfied.
    pub fn is_fully_satisfied(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// Executes entry generation.
pub struct EntryGenerator;

impl EntryGenerator {
    /// Generates one entry with an RNG derived from `config.seed`.
    ///
    /// # Errors
    ///
    /// [`RegroupError::InsufficientCapacity`] if some person could not be
    /// seated anywhere, which only happens when the problem's capacities
    /// were never validated.
    pub fn run<P: Id, G: Id>(
        problem: &RegroupProblem<'_, P, G>,
        config: &GeneratorConfig,
    ) -> Result<GenerationResult<P, G>, RegroupError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Generates one entry drawing every tie-break from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn run_with_rng<P, G, R>(
        problem: &RegroupProblem<'_, P, G>,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<GenerationResult<P, G>, RegroupError>
    where
        P: Id,
        G: Id,
        R: Rng + ?Sized,
    {
        let mut builder =
            EntryBuilder::new(problem.persons, problem.group_sizes, problem.occurrences);

        // Constrained phase
        let mut shortfalls = Vec::new();
        for (index, constraint) in problem.constraints.iter().enumerate() {
            let persons = match constraint {
                Constraint::Apart(apart) => satisfy_apart(&mut builder, apart, rng),
                Constraint::Together(together) => satisfy_together(&mut builder, together, rng),
            };
            if !persons.is_empty() {
                shortfalls.push(Shortfall {
                    constraint: index,
                    persons,
                });
            }
        }

        // Free phase
        let couples_seeded = if config.seed_couples {
            seed_couples(&mut builder, rng)
        } else {
            0
        };
        let (fallback_placements, unplaceable) = place_remaining(&mut builder, rng);
        if !unplaceable.is_empty() {
            return Err(RegroupError::InsufficientCapacity {
                persons: problem.persons.len(),
                capacity: problem.capacity(),
            });
        }

        let (entry, _) = builder.finish();
        let pair_redundancy = problem.occurrences.pair_redundancy(&entry);
        let group_redundancy = problem.occurrences.group_redundancy(&entry);

        Ok(GenerationResult {
            entry,
            shortfalls,
            couples_seeded,
            fallback_placements,
            pair_redundancy,
            group_redundancy,
        })
    }
}
