//! Generator configuration.

/// Configuration for one entry generation.
///
/// # Examples
///
/// ```
/// use u_regroup::generator::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_seed(42)
///     .with_couple_seeding(false);
/// assert_eq!(config.seed, Some(42));
/// assert!(!config.seed_couples);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Random seed for reproducible tie-breaks.
    ///
    /// `None` draws a fresh seed for every generation.
    pub seed: Option<u64>,

    /// Whether empty groups are opened with couples of persons who met
    /// least before the one-by-one placement.
    ///
    /// Disabling it leaves empty groups to the last-resort pass, which
    /// only looks at group redundancy.
    pub seed_couples: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            seed_couples: true,
        }
    }
}

impl GeneratorConfig {
    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables couple seeding.
    pub fn with_couple_seeding(mut self, enabled: bool) -> Self {
        self.seed_couples = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.seed, None);
        assert!(config.seed_couples);
    }
}
