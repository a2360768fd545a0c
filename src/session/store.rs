//! The session: validated inputs plus the growing history.

use super::config::SessionConfig;
use super::validation::{check_capacity, check_constraints, check_entry, check_history};
use crate::error::RegroupError;
use crate::generator::{EntryGenerator, GenerationResult, RegroupProblem};
use crate::model::{Constraint, Entry, GroupSizes, Id};
use crate::stats::Occurrences;
use rand::Rng;
use std::collections::BTreeSet;

/// Persons, groups, constraints and the history of past entries.
///
/// Every input is validated before it is stored, so a session is always
/// in a state from which a valid entry can be generated. Generation reads
/// the session (`&self`) and never touches the history; only
/// [`Session::save_entry`] appends to it.
///
/// # Examples
///
/// ```
/// use u_regroup::{Constraint, GroupSizes, Session, SessionConfig, Together};
///
/// let sizes: GroupSizes<&str> = [("g1", 3), ("g2", 3)].into_iter().collect();
/// let constraints = vec![Constraint::from(
///     Together::new(["ann", "bob"]).with_mandatory_group("g1"),
/// )];
/// let mut session = Session::with_config(
///     ["ann", "bob", "cid", "dan", "eve", "fay"],
///     sizes,
///     Vec::new(),
///     constraints,
///     SessionConfig::default().with_seed(42),
/// )
/// .unwrap();
///
/// let entry = session.generate_entry().unwrap();
/// assert_eq!(entry.group_of(&"ann"), Some(&"g1"));
/// assert_eq!(entry.group_of(&"bob"), Some(&"g1"));
///
/// session.save_entry(entry).unwrap();
/// assert_eq!(session.history().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Session<P: Ord, G: Ord> {
    persons: BTreeSet<P>,
    group_sizes: GroupSizes<G>,
    history: Vec<Entry<P, G>>,
    constraints: Vec<Constraint<P, G>>,
    config: SessionConfig,
}

impl<P: Id, G: Id> Session<P, G> {
    /// Creates a session with the default configuration.
    ///
    /// # Errors
    ///
    /// - [`RegroupError::InvalidCapacity`] if a group has capacity zero.
    /// - [`RegroupError::InsufficientCapacity`] if the groups cannot hold
    ///   every person.
    /// - [`RegroupError::InvalidHistoryEntry`] if a past entry places a
    ///   person twice.
    /// - [`RegroupError::InvalidConstraint`] if a constraint references an
    ///   unknown person or group, or cannot be met by construction.
    /// - [`RegroupError::ConflictingConstraints`] if two constraints
    ///   contradict each other and the policy rejects that.
    pub fn new<I>(
        persons: I,
        group_sizes: GroupSizes<G>,
        history: Vec<Entry<P, G>>,
        constraints: Vec<Constraint<P, G>>,
    ) -> Result<Self, RegroupError>
    where
        I: IntoIterator<Item = P>,
    {
        Self::with_config(
            persons,
            group_sizes,
            history,
            constraints,
            SessionConfig::default(),
        )
    }

    /// Creates a session with an explicit configuration.
    ///
    /// Fails like [`Session::new`].
    pub fn with_config<I>(
        persons: I,
        group_sizes: GroupSizes<G>,
        history: Vec<Entry<P, G>>,
        constraints: Vec<Constraint<P, G>>,
        config: SessionConfig,
    ) -> Result<Self, RegroupError>
    where
        I: IntoIterator<Item = P>,
    {
        let persons: BTreeSet<P> = persons.into_iter().collect();
        check_capacity(&persons, &group_sizes)?;
        check_history(&history)?;
        check_constraints(&persons, &group_sizes, &constraints, config.conflict_policy)?;

        Ok(Self {
            persons,
            group_sizes,
            history,
            constraints,
            config,
        })
    }

    pub fn persons(&self) -> &BTreeSet<P> {
        &self.persons
    }

    pub fn group_sizes(&self) -> &GroupSizes<G> {
        &self.group_sizes
    }

    pub fn history(&self) -> &[Entry<P, G>] {
        &self.history
    }

    pub fn constraints(&self) -> &[Constraint<P, G>] {
        &self.constraints
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Aggregates the history against the current population and groups.
    pub fn occurrences(&self) -> Occurrences<P, G> {
        Occurrences::aggregate(&self.persons, &self.group_sizes, &self.history)
    }

    /// Generates the next entry without saving it.
    pub fn generate_entry(&self) -> Result<Entry<P, G>, RegroupError> {
        self.generate().map(|result| result.entry)
    }

    /// Like [`Session::generate_entry`], drawing tie-breaks from `rng`.
    pub fn generate_entry_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Entry<P, G>, RegroupError> {
        self.generate_with_rng(rng).map(|result| result.entry)
    }

    /// Generates the next entry along with placement diagnostics.
    ///
    /// The RNG is seeded from the configured seed, or freshly when there
    /// is none.
    pub fn generate(&self) -> Result<GenerationResult<P, G>, RegroupError> {
        let occurrences = self.occurrences();
        let problem = RegroupProblem::new(
            &self.persons,
            &self.group_sizes,
            &occurrences,
            &self.constraints,
        );
        EntryGenerator::run(&problem, &self.config.generator())
    }

    /// Like [`Session::generate`], drawing tie-breaks from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<GenerationResult<P, G>, RegroupError> {
        let occurrences = self.occurrences();
        let problem = RegroupProblem::new(
            &self.persons,
            &self.group_sizes,
            &occurrences,
            &self.constraints,
        );
        EntryGenerator::run_with_rng(&problem, &self.config.generator(), rng)
    }

    /// Appends an entry to the history.
    ///
    /// The entry may mention persons or groups outside the current
    /// session; they are ignored by the statistics.
    ///
    /// # Errors
    ///
    /// [`RegroupError::InvalidHistoryEntry`] if the entry places a person
    /// twice. The history is left unchanged.
    pub fn save_entry(&mut self, entry: Entry<P, G>) -> Result<(), RegroupError> {
        check_entry(&entry, None)?;
        self.history.push(entry);
        Ok(())
    }

    /// Replaces the population.
    ///
    /// Fails, changing nothing, if the groups cannot hold the new
    /// population or a constraint references a person no longer present.
    pub fn set_persons<I>(&mut self, persons: I) -> Result<(), RegroupError>
    where
        I: IntoIterator<Item = P>,
    {
        let persons: BTreeSet<P> = persons.into_iter().collect();
        check_capacity(&persons, &self.group_sizes)?;
        check_constraints(
            &persons,
            &self.group_sizes,
            &self.constraints,
            self.config.conflict_policy,
        )?;
        self.persons = persons;
        Ok(())
    }

    /// Replaces the group capacities.
    ///
    /// Fails, changing nothing, on a zero capacity, on insufficient total
    /// capacity, or if a constraint no longer fits the new groups.
    pub fn set_group_sizes(&mut self, group_sizes: GroupSizes<G>) -> Result<(), RegroupError> {
        check_capacity(&self.persons, &group_sizes)?;
        check_constraints(
            &self.persons,
            &group_sizes,
            &self.constraints,
            self.config.conflict_policy,
        )?;
        self.group_sizes = group_sizes;
        Ok(())
    }

    /// Replaces the constraint list. Order is priority.
    pub fn set_constraints(
        &mut self,
        constraints: Vec<Constraint<P, G>>,
    ) -> Result<(), RegroupError> {
        check_constraints(
            &self.persons,
            &self.group_sizes,
            &constraints,
            self.config.conflict_policy,
        )?;
        self.constraints = constraints;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Apart, Together};
    use crate::session::ConflictPolicy;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestSession = Session<&'static str, &'static str>;

    fn sizes(groups: &[(&'static str, usize)]) -> GroupSizes<&'static str> {
        groups.iter().copied().collect()
    }

    fn is_valid<P: Id, G: Id>(entry: &Entry<P, G>, persons: &BTreeSet<P>, sizes: &GroupSizes<G>) -> bool {
        entry.person_count() == persons.len()
            && entry.duplicate_person().is_none()
            && persons.iter().all(|p| entry.group_of(p).is_some())
            && entry
                .groups()
                .all(|(g, members)| sizes.get(g).is_some_and(|&cap| members.len() <= cap))
    }

    #[test]
    fn test_six_persons_split_evenly() {
        let session: TestSession = Session::new(
            ["A", "B", "C", "D", "E", "F"],
            sizes(&[("g1", 3), ("g2", 3)]),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let entry = session.generate_entry_with_rng(&mut rng).unwrap();
            assert!(is_valid(&entry, session.persons(), session.group_sizes()));
            assert_eq!(entry.group(&"g1").map(BTreeSet::len), Some(3));
            assert_eq!(entry.group(&"g2").map(BTreeSet::len), Some(3));
        }
    }

    #[test]
    fn test_apart_in_single_seats() {
        let session: TestSession = Session::new(
            ["A", "B"],
            sizes(&[("g1", 1), ("g2", 1)]),
            Vec::new(),
            vec![Apart::new(["A", "B"]).into()],
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            let entry = session.generate_entry_with_rng(&mut rng).unwrap();
            assert_ne!(entry.group_of(&"A"), entry.group_of(&"B"));
        }
    }

    #[test]
    fn test_together_in_mandatory_group() {
        let session: TestSession = Session::new(
            ["A", "B", "C", "D"],
            sizes(&[("g1", 2), ("g2", 2)]),
            Vec::new(),
            vec![Together::new(["A", "B"]).with_mandatory_group("g1").into()],
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let result = session.generate_with_rng(&mut rng).unwrap();
            assert!(result.is_fully_satisfied());
            assert_eq!(result.entry.group_of(&"A"), Some(&"g1"));
            assert_eq!(result.entry.group_of(&"B"), Some(&"g1"));
        }
    }

    #[test]
    fn test_unmet_pair_is_preferred() {
        // A has met both B and C; B and C have never shared a group.
        let history = vec![
            Entry::from_groups([("g1", vec!["A", "B"]), ("g2", vec!["C"])]),
            Entry::from_groups([("g1", vec!["A", "C"]), ("g2", vec!["B"])]),
        ];
        let session: TestSession = Session::new(
            ["A", "B", "C"],
            sizes(&[("g1", 2), ("g2", 1)]),
            history,
            Vec::new(),
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let together = (0..100)
            .filter(|_| {
                let entry = session.generate_entry_with_rng(&mut rng).unwrap();
                entry.group_of(&"B") == entry.group_of(&"C")
            })
            .count();
        assert_eq!(together, 100);
    }

    #[test]
    fn test_rotation_avoids_repeats() {
        // Three rounds of 2x2 can pair everyone with someone new each time.
        let mut session: TestSession = Session::with_config(
            ["A", "B", "C", "D"],
            sizes(&[("g1", 2), ("g2", 2)]),
            Vec::new(),
            Vec::new(),
            SessionConfig::default().with_seed(11),
        )
        .unwrap();

        for _ in 0..3 {
            let result = session.generate().unwrap();
            assert_eq!(result.pair_redundancy, 0);
            session.save_entry(result.entry).unwrap();
        }
        assert!(session.occurrences().pairs().all(|(_, count)| count == 1));
    }

    #[test]
    fn test_generation_does_not_touch_history() {
        let session: TestSession = Session::with_config(
            ["A", "B", "C"],
            sizes(&[("g1", 3)]),
            Vec::new(),
            Vec::new(),
            SessionConfig::default().with_seed(3),
        )
        .unwrap();

        let first = session.generate_entry().unwrap();
        let second = session.generate_entry().unwrap();
        assert_eq!(first, second);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_construction_errors() {
        let err = TestSession::new(["A"], sizes(&[("g1", 0)]), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, RegroupError::InvalidCapacity { .. }));

        let err = TestSession::new(["A", "B"], sizes(&[("g1", 1)]), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, RegroupError::InsufficientCapacity { persons: 2, capacity: 1 }));

        let bad = Entry::from_groups([("g1", vec!["A"]), ("g2", vec!["A"])]);
        let err = TestSession::new(["A"], sizes(&[("g1", 1)]), vec![bad], Vec::new()).unwrap_err();
        assert!(matches!(err, RegroupError::InvalidHistoryEntry { index: Some(0), .. }));

        let err = TestSession::new(
            ["A"],
            sizes(&[("g1", 1)]),
            Vec::new(),
            vec![Apart::new(["Z"]).into()],
        )
        .unwrap_err();
        assert!(matches!(err, RegroupError::InvalidConstraint { index: 0, .. }));
    }

    #[test]
    fn test_conflict_policy() {
        let constraints: Vec<Constraint<&str, &str>> = vec![
            Together::new(["A", "B"]).into(),
            Apart::new(["A", "B"]).into(),
        ];
        let err = TestSession::new(
            ["A", "B"],
            sizes(&[("g1", 2), ("g2", 2)]),
            Vec::new(),
            constraints.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, RegroupError::ConflictingConstraints { first: 0, second: 1, .. }));

        // Under list order the earlier constraint wins.
        let session = TestSession::with_config(
            ["A", "B"],
            sizes(&[("g1", 2), ("g2", 2)]),
            Vec::new(),
            constraints,
            SessionConfig::default()
                .with_seed(0)
                .with_conflict_policy(ConflictPolicy::ListOrder),
        )
        .unwrap();
        let entry = session.generate_entry().unwrap();
        assert_eq!(entry.group_of(&"A"), entry.group_of(&"B"));
    }

    #[test]
    fn test_pin_against_exclusion_is_rejected() {
        let constraints: Vec<Constraint<&str, &str>> = vec![
            Together::new(["A", "B"]).with_mandatory_group("g1").into(),
            Together::new(["A", "C"]).with_forbidden_groups(["g1"]).into(),
        ];
        let err = TestSession::new(
            ["A", "B", "C", "D"],
            sizes(&[("g1", 3), ("g2", 3)]),
            Vec::new(),
            constraints.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, RegroupError::ConflictingConstraints { first: 0, second: 1, .. }));

        // Accepted under list order, with the broken exclusion reported.
        let session = TestSession::with_config(
            ["A", "B", "C", "D"],
            sizes(&[("g1", 3), ("g2", 3)]),
            Vec::new(),
            constraints,
            SessionConfig::default()
                .with_seed(0)
                .with_conflict_policy(ConflictPolicy::ListOrder),
        )
        .unwrap();
        let result = session.generate().unwrap();
        assert_eq!(result.entry.group_of(&"A"), Some(&"g1"));
        assert!(!result.is_fully_satisfied());
        assert_eq!(result.shortfalls[0].constraint, 1);
        assert!(result.shortfalls[0].persons.contains(&"A"));
    }

    #[test]
    fn test_save_entry_rejects_duplicates() {
        let mut session =
            TestSession::new(["A", "B"], sizes(&[("g1", 2)]), Vec::new(), Vec::new()).unwrap();

        let bad = Entry::from_groups([("g1", vec!["A"]), ("g2", vec!["A"])]);
        assert_eq!(
            session.save_entry(bad),
            Err(RegroupError::InvalidHistoryEntry {
                index: None,
                person: "\"A\"".into()
            })
        );
        assert!(session.history().is_empty());

        let foreign = Entry::from_groups([("g7", vec!["A", "Q"])]);
        assert!(session.save_entry(foreign).is_ok());
        assert_eq!(session.occurrences().pair_count(&"A", &"B"), 0);
    }

    #[test]
    fn test_setters_revalidate() {
        let mut session = TestSession::new(
            ["A", "B", "C"],
            sizes(&[("g1", 2), ("g2", 2)]),
            Vec::new(),
            vec![Together::new(["A", "B"]).with_mandatory_group("g1").into()],
        )
        .unwrap();

        let err = session.set_group_sizes(sizes(&[("g1", 1), ("g2", 2)])).unwrap_err();
        assert!(matches!(err, RegroupError::InvalidConstraint { index: 0, .. }));
        let err = session.set_group_sizes(sizes(&[("g1", 2)])).unwrap_err();
        assert!(matches!(err, RegroupError::InsufficientCapacity { .. }));
        assert_eq!(session.group_sizes().len(), 2);

        let err = session.set_persons(["A", "C"]).unwrap_err();
        assert!(matches!(err, RegroupError::InvalidConstraint { index: 0, .. }));
        assert_eq!(session.persons().len(), 3);

        session.set_constraints(Vec::new()).unwrap();
        session.set_persons(["A", "C"]).unwrap();
        session.set_group_sizes(sizes(&[("g1", 1), ("g2", 1)])).unwrap();

        let entry = session.generate_entry().unwrap();
        assert!(is_valid(&entry, session.persons(), session.group_sizes()));
    }

    #[test]
    fn test_departed_persons_are_ignored() {
        let history = vec![Entry::from_groups([("g1", vec!["A", "B", "X"])])];
        let session =
            TestSession::new(["A", "B"], sizes(&[("g1", 2)]), history, Vec::new()).unwrap();

        let stats = session.occurrences();
        assert_eq!(stats.pair_count(&"A", &"B"), 1);
        assert_eq!(stats.pairing_count(&"A"), 1);
        assert_eq!(stats.pair_count(&"A", &"X"), 0);
    }

    fn scenario() -> impl Strategy<Value = (u32, Vec<usize>)> {
        (prop::collection::vec(1usize..6, 1..6), 0u32..30).prop_map(|(caps, n)| {
            let capacity = caps.iter().sum::<usize>() as u32;
            (n.min(capacity), caps)
        })
    }

    fn indexed(caps: &[usize]) -> GroupSizes<usize> {
        caps.iter().copied().enumerate().collect()
    }

    proptest! {
        #[test]
        fn test_entries_are_always_valid(
            (n, caps) in scenario(),
            rounds in 1usize..5,
            seed in any::<u64>(),
        ) {
            let mut session = Session::new(0..n, indexed(&caps), Vec::new(), Vec::new()).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..rounds {
                let entry = session.generate_entry_with_rng(&mut rng).unwrap();
                prop_assert!(is_valid(&entry, session.persons(), session.group_sizes()));
                session.save_entry(entry).unwrap();
            }
        }

        #[test]
        fn test_apart_members_are_spread(
            (n, caps) in scenario(),
            members in 1usize..6,
            seed in any::<u64>(),
        ) {
            let members = members.min(caps.len()).min(n as usize) as u32;
            prop_assume!(members > 0);
            let constraints = vec![Constraint::apart(0..members)];
            let session = Session::new(0..n, indexed(&caps), Vec::new(), constraints).unwrap();

            let mut rng = StdRng::seed_from_u64(seed);
            let entry = session.generate_entry_with_rng(&mut rng).unwrap();
            let groups: BTreeSet<&usize> = (0..members).filter_map(|p| entry.group_of(&p)).collect();
            prop_assert_eq!(groups.len(), members as usize);
        }

        #[test]
        fn test_together_stays_out_of_forbidden_groups(
            (n, caps) in scenario(),
            members in 1u32..6,
            forbidden in prop::collection::btree_set(0usize..6, 0..4),
            seed in any::<u64>(),
        ) {
            let members = members.min(n);
            prop_assume!(members > 0);
            let largest_allowed = indexed(&caps)
                .into_iter()
                .filter(|(g, _)| !forbidden.contains(g))
                .map(|(_, cap)| cap)
                .max()
                .unwrap_or(0);
            prop_assume!(largest_allowed >= members as usize);

            let forbidden: BTreeSet<usize> = forbidden.into_iter().filter(|g| *g < caps.len()).collect();
            let together = Together::new(0..members).with_forbidden_groups(forbidden.clone());
            let session =
                Session::new(0..n, indexed(&caps), Vec::new(), vec![together.into()]).unwrap();

            let mut rng = StdRng::seed_from_u64(seed);
            let result = session.generate_with_rng(&mut rng).unwrap();
            prop_assert!(result.is_fully_satisfied());
            let home = result.entry.group_of(&0).copied();
            for p in 0..members {
                let group = result.entry.group_of(&p).copied();
                prop_assert_eq!(group, home);
                prop_assert!(group.is_some_and(|g| !forbidden.contains(&g)));
            }
        }

        #[test]
        fn test_together_fills_mandatory_group(
            (n, caps) in scenario(),
            members in 1u32..6,
            seed in any::<u64>(),
        ) {
            let members = members.min(n).min(caps[0] as u32);
            prop_assume!(members > 0);
            let together = Together::new(0..members).with_mandatory_group(0usize);
            let session =
                Session::new(0..n, indexed(&caps), Vec::new(), vec![together.into()]).unwrap();

            let mut rng = StdRng::seed_from_u64(seed);
            let entry = session.generate_entry_with_rng(&mut rng).unwrap();
            for p in 0..members {
                prop_assert_eq!(entry.group_of(&p), Some(&0));
            }
        }
    }
}
