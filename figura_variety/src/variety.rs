// The variety: a bounded, strategy-driven collection of figures.
//
// A `Variety<T>` is bound to one `System` and filled by exactly one call to
// `generate`. Every strategy feeds candidate numbers through a `Collector`,
// which builds each `T` with `Figure::from_number`, drops invalid candidates
// and those the qualifier refuses, and stops the run as soon as `cap` results
// are held. After the run the results are sorted into their natural `Ord`
// order; `sort_by` and `sort_with` re-order them afterwards.
//
// Every strategy terminates: each walks a finite numeric range (at most
// `degree^order` numbers) or a finite backtracking tree, and all of them
// unwind on the cap. Systems of order 0 or 1 have no meaningful patterns or
// rotations and yield an empty variety.
//
// Class enumeration uses the orbit sieve in `sieve.rs`, bounded by the
// config's `sieve_ceiling`. Exceeding the ceiling logs a warning and returns
// only the classes found below it; see `GeneratorConfig::sieve_ceiling`.
//
// See also: `strategy.rs` for the strategy list, `substructure.rs` for mask
// enumeration and `rhythm.rs` for the rhythmic pruning tests.

use figura_structure::{Figure, System};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;
use tracing::{debug, warn};

use crate::collector::Collector;
use crate::config::GeneratorConfig;
use crate::error::VarietyError;
use crate::rhythm::{is_separable, is_simple, metric_patterns};
use crate::sieve::{ClassSieve, binary_candidates};
use crate::strategy::Strategy;
use crate::substructure::substructures;

/// Acceptance predicate applied to every candidate.
pub type Qualifier<T> = Box<dyn Fn(&T) -> bool>;

/// Maps a number to the number of its canonical rotation.
pub type ClassNumberFn = fn(&System, u128) -> u128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

pub struct Variety<T: Figure> {
    system: System,
    config: GeneratorConfig,
    qualifier: Option<Qualifier<T>>,
    class_number: ClassNumberFn,
    results: Vec<T>,
    generated: bool,
    capped: bool,
}

fn smallest_rotation(system: &System, number: u128) -> u128 {
    system.class_number(number)
}

impl<T: Figure> Variety<T> {
    /// An empty variety with the default config, no qualifier and the
    /// smallest-rotation class number.
    pub fn new(system: System) -> Self {
        Variety {
            system,
            config: GeneratorConfig::default(),
            qualifier: None,
            class_number: smallest_rotation,
            results: Vec::new(),
            generated: false,
            capped: false,
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.config.cap = cap;
        self
    }

    /// Only candidates for which `qualifier` returns true are kept.
    pub fn with_qualifier(mut self, qualifier: impl Fn(&T) -> bool + 'static) -> Self {
        self.qualifier = Some(Box::new(qualifier));
        self
    }

    /// Replace the canonical-form function used by `BinaryClasses` and
    /// `class_census`.
    pub fn with_class_number(mut self, class_number: ClassNumberFn) -> Self {
        self.class_number = class_number;
        self
    }

    /// Run `strategy` and store its results. Returns how many were kept.
    ///
    /// A variety is generated once; a second call is refused.
    pub fn generate(&mut self, strategy: &Strategy) -> Result<usize, VarietyError> {
        if self.generated {
            return Err(VarietyError::AlreadyGenerated);
        }
        self.check(strategy)?;
        self.generated = true;

        debug!(
            strategy = %strategy,
            system = %self.system,
            cap = self.config.cap,
            "generating variety"
        );

        let mut collector = Collector::new(self.system, self.config.cap, self.qualifier.as_deref());
        if self.system.order() > 1 {
            let _ = run_strategy(&mut collector, strategy, &self.config, self.class_number);
        }
        let (mut results, capped) = collector.finish();
        results.sort();

        if capped {
            debug!(cap = self.config.cap, "cap reached, variety is partial");
        }
        debug!(count = results.len(), "variety generated");

        self.results = results;
        self.capped = capped;
        Ok(self.results.len())
    }

    fn check(&self, strategy: &Strategy) -> Result<(), VarietyError> {
        match strategy {
            Strategy::BinaryClasses { .. } if !self.system.is_binary() => {
                Err(VarietyError::NotBinary(self.system.degree()))
            }
            Strategy::Substructures { mask, .. } if *mask.system() != self.system => {
                Err(VarietyError::MaskSystemMismatch {
                    mask: *mask.system(),
                    variety: self.system,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn into_results(self) -> Vec<T> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether the last run stopped early on the cap.
    pub fn is_capped(&self) -> bool {
        self.capped
    }

    /// Stable re-sort by a property of each figure. Keys that do not compare
    /// (NaN) are treated as equal.
    pub fn sort_by<K: PartialOrd>(&mut self, mut key: impl FnMut(&T) -> K, direction: SortDirection) {
        self.results.sort_by(|a, b| {
            let ordering = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    /// Stable re-sort with an arbitrary comparator.
    pub fn sort_with(&mut self, comparator: impl FnMut(&T, &T) -> Ordering) {
        self.results.sort_by(comparator);
    }

    /// How many results fall into each rotation class, keyed by class number.
    pub fn class_census(&self) -> BTreeMap<u128, usize> {
        let mut census = BTreeMap::new();
        for figure in &self.results {
            *census
                .entry((self.class_number)(&self.system, figure.number()))
                .or_insert(0) += 1;
        }
        census
    }
}

impl<T: Figure> fmt::Debug for Variety<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variety")
            .field("system", &self.system)
            .field("config", &self.config)
            .field("qualified", &self.qualifier.is_some())
            .field("results", &self.results.len())
            .field("generated", &self.generated)
            .field("capped", &self.capped)
            .finish()
    }
}

fn run_strategy<T: Figure>(
    collector: &mut Collector<'_, T>,
    strategy: &Strategy,
    config: &GeneratorConfig,
    class_number: ClassNumberFn,
) -> ControlFlow<()> {
    let system = *collector.system();
    match strategy {
        Strategy::Instances { level } => instances(collector, &system, *level),
        Strategy::Classes { level } => sieve_classes(collector, &system, *level, config, |_| true),
        Strategy::BinaryClasses { level } => binary_classes(collector, &system, *level, class_number),
        Strategy::Substructures { mask, level } => substructures(collector, mask, *level),
        Strategy::RhythmicClasses { level } => {
            sieve_classes(collector, &system, *level, config, |number| {
                let digits = system.decode(number);
                is_separable(&digits, &config.rhythm) && is_simple(&digits, &config.rhythm)
            })
        }
        Strategy::MetricClasses => {
            for number in metric_patterns(&system) {
                collector.offer_number(number)?;
            }
            ControlFlow::Continue(())
        }
    }
}

fn instances<T: Figure>(collector: &mut Collector<'_, T>, system: &System, level: usize) -> ControlFlow<()> {
    if level == 0 || level > system.order() {
        return ControlFlow::Continue(());
    }
    for number in 1..=system.max_number() {
        if system.weight(number) == level {
            collector.offer_number(number)?;
        }
    }
    ControlFlow::Continue(())
}

/// Offer the representative of every class of `level` that `accept` passes,
/// then the all-maximal fixed point if it qualifies.
fn sieve_classes<T: Figure>(
    collector: &mut Collector<'_, T>,
    system: &System,
    level: usize,
    config: &GeneratorConfig,
    accept: impl Fn(u128) -> bool,
) -> ControlFlow<()> {
    if level == 0 || level > system.order() {
        return ControlFlow::Continue(());
    }
    let sieve = ClassSieve::new(system, config.sieve_ceiling);
    if sieve.is_truncated() {
        warn!(
            system = %system,
            ceiling = config.sieve_ceiling,
            "system exceeds the sieve ceiling, classes above it are skipped"
        );
    }
    for number in sieve {
        if system.weight(number) == level && accept(number) {
            collector.offer_number(number)?;
        }
    }
    offer_fixed_point(collector, system, level, accept)
}

fn binary_classes<T: Figure>(
    collector: &mut Collector<'_, T>,
    system: &System,
    level: usize,
    class_number: ClassNumberFn,
) -> ControlFlow<()> {
    if level == 0 || level > system.order() {
        return ControlFlow::Continue(());
    }
    for number in binary_candidates(system) {
        if system.weight(number) == level && class_number(system, number) == number {
            collector.offer_number(number)?;
        }
    }
    offer_fixed_point(collector, system, level, |_| true)
}

fn offer_fixed_point<T: Figure>(
    collector: &mut Collector<'_, T>,
    system: &System,
    level: usize,
    accept: impl Fn(u128) -> bool,
) -> ControlFlow<()> {
    let fixed = system.max_number();
    if fixed != 0 && system.weight(fixed) == level && accept(fixed) {
        collector.offer_number(fixed)?;
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figura_structure::FiguralStructure;

    fn codes(variety: &Variety<FiguralStructure>) -> Vec<String> {
        variety.results().iter().map(|s| s.code().to_string()).collect()
    }

    fn generated(system: System, strategy: Strategy) -> Variety<FiguralStructure> {
        let mut variety = Variety::new(system);
        variety.generate(&strategy).unwrap();
        variety
    }

    #[test]
    fn binary_order_four_level_two_has_two_classes() {
        let variety = generated(System::new(2, 4), Strategy::Classes { level: 2 });
        assert_eq!(codes(&variety), vec!["1,0,1,0", "2*1,2*0"]);
    }

    #[test]
    fn instances_list_every_structure_of_the_level() {
        let variety = generated(System::new(2, 4), Strategy::Instances { level: 2 });
        assert_eq!(variety.len(), 6);
        assert!(variety.results().iter().all(|s| s.level() == 2));
        // Natural order: level, then digits.
        assert_eq!(variety.results()[0].code(), "2*0,2*1");
        assert_eq!(variety.results()[5].code(), "2*1,2*0");
    }

    #[test]
    fn instances_count_in_a_ternary_system() {
        // C(5, 2) positions times 2^2 nonzero digit choices.
        let variety = generated(System::new(3, 5), Strategy::Instances { level: 2 });
        assert_eq!(variety.len(), 40);
    }

    #[test]
    fn classes_include_the_full_fixed_point() {
        let variety = generated(System::new(3, 3), Strategy::Classes { level: 3 });
        let numbers: Vec<u128> = variety.results().iter().map(|s| s.number()).collect();
        assert!(numbers.contains(&26), "all-twos fixed point missing: {numbers:?}");
        // 8 level-3 structures over {1,2}: 1,1,1 / 2,2,2 fixed; the two
        // three-member orbits of one 2 and of two 2s.
        assert_eq!(variety.len(), 4);
        for s in variety.results() {
            assert!(s.is_class_representative());
        }
    }

    #[test]
    fn binary_classes_agree_with_the_sieve() {
        for order in 2..=10 {
            for level in 1..=order {
                let system = System::new(2, order);
                let sieved = generated(system, Strategy::Classes { level });
                let tested = generated(system, Strategy::BinaryClasses { level });
                assert_eq!(codes(&sieved), codes(&tested), "order {order}, level {level}");
            }
        }
    }

    #[test]
    fn binary_classes_refuse_other_degrees() {
        let mut variety: Variety<FiguralStructure> = Variety::new(System::new(3, 4));
        let err = variety.generate(&Strategy::BinaryClasses { level: 2 }).unwrap_err();
        assert!(matches!(err, VarietyError::NotBinary(3)));
        assert!(!variety.is_generated());
    }

    #[test]
    fn binary_classes_use_the_injected_class_number() {
        // A class-number function that calls everything canonical turns the
        // strategy into "odd numbers below 2^(order-1)".
        fn identity(_: &System, number: u128) -> u128 {
            number
        }
        let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 5)).with_class_number(identity);
        variety.generate(&Strategy::BinaryClasses { level: 2 }).unwrap();
        let numbers: Vec<u128> = variety.results().iter().map(|s| s.number()).collect();
        let mut expected = vec![3u128, 5, 9];
        expected.sort_by_key(|&n| FiguralStructure::from_number(&System::new(2, 5), n));
        assert_eq!(numbers, expected);
    }

    #[test]
    fn qualifier_filters_candidates() {
        let mut variety = Variety::new(System::new(2, 6))
            .with_qualifier(|s: &FiguralStructure| s.is_on(3));
        variety.generate(&Strategy::Classes { level: 2 }).unwrap();
        // Level-2 classes of order 6: gaps 1, 2, 3. Only 1,0,0,1,0,0 hits pulse 3.
        assert_eq!(codes(&variety), vec!["1,2*0,1,2*0"]);
    }

    #[test]
    fn cap_truncates_and_is_reported() {
        let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 8)).with_cap(3);
        variety.generate(&Strategy::Instances { level: 4 }).unwrap();
        assert_eq!(variety.len(), 3);
        assert!(variety.is_capped());

        let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 8)).with_cap(0);
        variety.generate(&Strategy::Classes { level: 4 }).unwrap();
        assert!(variety.is_empty());
        assert!(variety.is_capped());
    }

    #[test]
    fn generate_runs_once() {
        let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 4));
        variety.generate(&Strategy::MetricClasses).unwrap();
        let err = variety.generate(&Strategy::MetricClasses).unwrap_err();
        assert!(matches!(err, VarietyError::AlreadyGenerated));
        assert_eq!(variety.len(), 3);
    }

    #[test]
    fn tiny_orders_are_empty() {
        for order in [0, 1] {
            let variety = generated(System::new(2, order), Strategy::Instances { level: 1 });
            assert!(variety.is_empty());
            let variety = generated(System::new(2, order), Strategy::MetricClasses);
            assert!(variety.is_empty());
        }
    }

    #[test]
    fn sieve_ceiling_degrades_to_a_canonical_subset() {
        let system = System::new(2, 12);
        let full = generated(system, Strategy::Classes { level: 5 });
        let config = GeneratorConfig {
            sieve_ceiling: 200,
            ..GeneratorConfig::default()
        };
        let mut partial: Variety<FiguralStructure> = Variety::new(system).with_config(config);
        partial.generate(&Strategy::Classes { level: 5 }).unwrap();
        assert!(partial.len() < full.len());
        for s in partial.results() {
            assert!(s.number() < 200 && s.is_class_representative());
            assert!(full.results().contains(s));
        }
    }

    #[test]
    fn substructure_mask_must_share_the_system() {
        let mask = FiguralStructure::from_code(&System::new(3, 4), "1,0,1,1");
        let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 4));
        let err = variety
            .generate(&Strategy::Substructures { mask, level: None })
            .unwrap_err();
        assert!(matches!(err, VarietyError::MaskSystemMismatch { .. }));
    }

    #[test]
    fn rhythmic_classes_are_a_subset_of_classes() {
        let system = System::new(2, 8);
        let all = generated(system, Strategy::Classes { level: 3 });
        let rhythmic = generated(system, Strategy::RhythmicClasses { level: 3 });
        assert!(!rhythmic.is_empty());
        assert!(rhythmic.len() < all.len());
        for s in rhythmic.results() {
            assert!(s.is_on(4), "{s} misses the midpoint");
            assert!(all.results().contains(s));
        }
    }

    #[test]
    fn metric_classes_ignore_level() {
        let variety = generated(System::new(2, 12), Strategy::MetricClasses);
        let levels: Vec<usize> = variety.results().iter().map(|s| s.level()).collect();
        // Divisors 12, 6, 4, 3, 2, 1 give 1, 2, 3, 4, 6, 12 onsets.
        assert_eq!(levels, vec![1, 2, 3, 4, 6, 12]);
    }

    #[test]
    fn sort_by_reorders_by_property() {
        let mut variety = generated(System::new(2, 5), Strategy::Instances { level: 2 });
        variety.sort_by(|s| s.number(), SortDirection::Descending);
        let numbers: Vec<u128> = variety.results().iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![24, 20, 18, 17, 12, 10, 9, 6, 5, 3]);

        variety.sort_by(|s| s.variability(), SortDirection::Ascending);
        assert!(variety
            .results()
            .windows(2)
            .all(|w| w[0].variability() <= w[1].variability()));

        variety.sort_with(|a, b| a.cmp_by_number(b));
        assert_eq!(variety.results()[0].number(), 3);
    }

    #[test]
    fn class_census_counts_instances_per_class() {
        let variety = generated(System::new(2, 4), Strategy::Instances { level: 2 });
        let census = variety.class_census();
        assert_eq!(census.into_iter().collect::<Vec<_>>(), vec![(3, 4), (5, 2)]);
    }
}
