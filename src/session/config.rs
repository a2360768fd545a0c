//! Session configuration.

use crate::generator::GeneratorConfig;

/// How contradictory constraints are handled at validation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictPolicy {
    /// Reject constraint lists whose members contradict each other.
    #[default]
    Reject,

    /// Accept them; earlier constraints win during generation.
    ListOrder,
}

/// Configuration for a [`Session`](super::Session).
///
/// # Examples
///
/// ```
/// use u_regroup::{ConflictPolicy, SessionConfig};
///
/// let config = SessionConfig::default()
///     .with_seed(7)
///     .with_conflict_policy(ConflictPolicy::ListOrder);
/// assert_eq!(config.seed, Some(7));
/// assert!(config.seed_couples);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Random seed (None for random).
    ///
    /// With a seed, every call to `generate_entry` returns the same entry
    /// until the history or inputs change.
    pub seed: Option<u64>,
    /// Handling of contradictory constraints.
    pub conflict_policy: ConflictPolicy,
    /// Whether generation opens empty groups with couples first.
    pub seed_couples: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            conflict_policy: ConflictPolicy::Reject,
            seed_couples: true,
        }
    }
}

impl SessionConfig {
    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the conflict policy.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Enables or disables couple seeding.
    pub fn with_couple_seeding(mut self, enabled: bool) -> Self {
        self.seed_couples = enabled;
        self
    }

    pub(crate) fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            seed_couples: self.seed_couples,
        }
    }
}
