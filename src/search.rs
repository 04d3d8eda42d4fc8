//! Meta-search over ordering strategies.
//!
//! Cycles the five sorting strategies, jitters near-ties from the sixth
//! iteration on, scores every trial outcome and keeps the strictly best one.
//! The loop stops early once a complete, efficient, warning-free outcome is
//! found, or after a bounded stretch without improvement.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::model::{BinTemplate, Carton};
use crate::placement::PackingConfig;
use crate::scoring::{PackingResult, score_outcome};
use crate::strategy::{SortStrategy, run_trial};

/// Configuration for the meta-search.
///
/// The defaults are the reference parameters; deviating from them changes
/// which outcomes the search can reach.
#[derive(Copy, Clone, Debug)]
pub struct SearchConfig {
    /// Upper bound on trials.
    pub max_iterations: usize,
    /// Consecutive non-improving trials after which the search stops.
    pub stagnation_limit: usize,
    /// Mean efficiency (percent) required for an early exit.
    pub target_efficiency: f64,
    /// Base seed for the per-trial jitter generators.
    pub rng_seed: u64,
}

impl SearchConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 100;
    pub const DEFAULT_STAGNATION_LIMIT: usize = 15;
    pub const DEFAULT_TARGET_EFFICIENCY: f64 = 98.0;
    pub const DEFAULT_RNG_SEED: u64 = 0;

    /// Number of leading iterations that run without jitter, one per
    /// strategy.
    pub const PURE_ITERATIONS: usize = SortStrategy::CYCLE.len();

    /// Creates a builder for custom configuration.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            stagnation_limit: Self::DEFAULT_STAGNATION_LIMIT,
            target_efficiency: Self::DEFAULT_TARGET_EFFICIENCY,
            rng_seed: Self::DEFAULT_RNG_SEED,
        }
    }
}

/// Builder for SearchConfig.
#[derive(Clone, Debug)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }
}

impl SearchConfigBuilder {
    /// Sets the iteration bound.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    /// Sets the stagnation cutoff.
    pub fn stagnation_limit(mut self, limit: usize) -> Self {
        self.config.stagnation_limit = limit;
        self
    }

    /// Sets the early-exit efficiency target in percent.
    pub fn target_efficiency(mut self, efficiency: f64) -> Self {
        self.config.target_efficiency = efficiency;
        self
    }

    /// Sets the base seed for the jitter generators.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = seed;
        self
    }

    /// Creates the final configuration.
    pub fn build(self) -> SearchConfig {
        self.config
    }
}

/// Why the meta-search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A complete, efficient, warning-free outcome was found.
    EarlyExit,
    /// The stagnation limit was reached without improvement.
    Stagnated,
    /// The iteration budget ran out.
    Exhausted,
}

/// Runs the meta-search and returns the best outcome found.
///
/// Deterministic for a fixed configuration: the first
/// [`SearchConfig::PURE_ITERATIONS`] trials use the pure strategy orderings,
/// all later trials draw their jitter from a generator seeded with the base
/// seed plus the iteration index.
pub fn run_search(
    cartons: &[Carton],
    template: &BinTemplate,
    target_volume: f64,
    packing: &PackingConfig,
    config: &SearchConfig,
) -> PackingResult {
    let (outcome, reason) = search_with_reason(cartons, template, target_volume, packing, config);
    info!(
        "[SEARCH] finished ({:?}): {} containers, {} unpacked, mean efficiency {:.1}%",
        reason,
        outcome.container_count(),
        outcome.unpacked_count(),
        outcome.average_efficiency()
    );
    outcome
}

/// Meta-search loop, also reporting the terminal state.
pub(crate) fn search_with_reason(
    cartons: &[Carton],
    template: &BinTemplate,
    target_volume: f64,
    packing: &PackingConfig,
    config: &SearchConfig,
) -> (PackingResult, StopReason) {
    let mut best: Option<(PackingResult, f64)> = None;
    let mut stagnation = 0usize;
    let mut reason = StopReason::Exhausted;

    for iteration in 0..config.max_iterations {
        let strategy = SortStrategy::CYCLE[iteration % SortStrategy::CYCLE.len()];
        let jitter = iteration >= SearchConfig::PURE_ITERATIONS;
        let mut rng = StdRng::seed_from_u64(config.rng_seed.wrapping_add(iteration as u64));

        let outcome = run_trial(
            cartons,
            template,
            target_volume,
            strategy,
            jitter,
            packing,
            &mut rng,
        );
        let score = score_outcome(&outcome);

        let improved = best
            .as_ref()
            .is_none_or(|(_, best_score)| score > *best_score);
        if improved {
            info!(
                "[SEARCH] iteration {}: new best via {} (jitter: {}), score {:.3}, {} containers",
                iteration,
                strategy.label(),
                jitter,
                score,
                outcome.container_count()
            );
            let reached_target = meets_target(&outcome, config);
            best = Some((outcome, score));
            stagnation = 0;

            if reached_target {
                reason = StopReason::EarlyExit;
                break;
            }
        } else {
            debug!(
                "[SEARCH] iteration {}: {} scored {:.3}, no improvement ({}/{})",
                iteration,
                strategy.label(),
                score,
                stagnation + 1,
                config.stagnation_limit
            );
            stagnation += 1;
            if stagnation >= config.stagnation_limit {
                reason = StopReason::Stagnated;
                break;
            }
        }
    }

    let outcome = best
        .map(|(outcome, _)| outcome)
        .unwrap_or_else(PackingResult::empty);
    (outcome, reason)
}

/// Checks the early-exit criteria: everything stowed, efficient on average,
/// and no container carries a safety warning.
fn meets_target(outcome: &PackingResult, config: &SearchConfig) -> bool {
    outcome.is_complete()
        && !outcome.results.is_empty()
        && outcome.average_efficiency() >= config.target_efficiency
        && !outcome.has_warnings()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carton(id: &str, dims: (f64, f64, f64), weight: f64) -> Carton {
        Carton::new(id, "SKU", dims, weight, true, 3).unwrap()
    }

    fn run(
        cartons: &[Carton],
        template: &BinTemplate,
        target_volume: f64,
        config: &SearchConfig,
    ) -> (PackingResult, StopReason) {
        search_with_reason(
            cartons,
            template,
            target_volume,
            &PackingConfig::default(),
            config,
        )
    }

    #[test]
    fn early_exit_on_complete_balanced_outcome() {
        // Two slabs stacked along Z: weight split 50/50, center of gravity
        // near the middle, full target volume used.
        let template = BinTemplate::new((100.0, 100.0, 200.0), 1000.0).unwrap();
        let cartons = vec![
            carton("front", (99.0, 80.0, 99.0), 10.0),
            carton("back", (99.0, 80.0, 99.0), 10.0),
        ];
        let target_volume = 2.0 * 99.0 * 80.0 * 99.0;

        let config = SearchConfig::default();
        let (outcome, reason) = run(&cartons, &template, target_volume, &config);

        assert_eq!(reason, StopReason::EarlyExit);
        assert!(outcome.is_complete());
        assert_eq!(outcome.container_count(), 1);
        assert!(!outcome.has_warnings());
        assert!((outcome.average_efficiency() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn stagnation_stops_unimprovable_search() {
        // A single carton always yields the same score; after the first
        // trial the search can only stagnate.
        let template = BinTemplate::new((100.0, 100.0, 100.0), 1000.0).unwrap();
        let cartons = vec![carton("cube", (50.0, 50.0, 50.0), 10.0)];

        let (outcome, reason) = run(&cartons, &template, 1_000_000.0, &SearchConfig::default());

        assert_eq!(reason, StopReason::Stagnated);
        assert_eq!(outcome.container_count(), 1);
        assert!(outcome.is_complete());
    }

    #[test]
    fn unpackable_cargo_yields_empty_results() {
        let template = BinTemplate::new((100.0, 100.0, 100.0), 1000.0).unwrap();
        let cartons = vec![carton("oversized", (200.0, 50.0, 50.0), 10.0)];

        let (outcome, reason) = run(&cartons, &template, 1_000_000.0, &SearchConfig::default());

        assert_eq!(reason, StopReason::Stagnated);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.unpacked_count(), 1);
    }

    #[test]
    fn exhaustion_when_budget_is_tiny() {
        let template = BinTemplate::new((100.0, 100.0, 100.0), 1000.0).unwrap();
        let cartons = vec![carton("cube", (50.0, 50.0, 50.0), 10.0)];

        let config = SearchConfig::builder().max_iterations(3).build();
        let (outcome, reason) = run(&cartons, &template, 1_000_000.0, &config);

        assert_eq!(reason, StopReason::Exhausted);
        assert_eq!(outcome.container_count(), 1);
    }

    #[test]
    fn search_is_deterministic_for_fixed_seed() {
        let template = BinTemplate::new((120.0, 120.0, 120.0), 500.0).unwrap();
        let cartons: Vec<Carton> = (0..10)
            .map(|i| {
                carton(
                    &format!("c-{}", i),
                    (30.0 + (i % 3) as f64, 30.0, 30.0),
                    5.0 + (i % 4) as f64,
                )
            })
            .collect();

        let config = SearchConfig::builder().rng_seed(99).build();
        let a = run(&cartons, &template, 1_728_000.0, &config);
        let b = run(&cartons, &template, 1_728_000.0, &config);

        assert_eq!(a.1, b.1);
        assert_eq!(
            serde_json::to_string(&a.0).unwrap(),
            serde_json::to_string(&b.0).unwrap()
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = SearchConfig::builder()
            .max_iterations(10)
            .stagnation_limit(3)
            .target_efficiency(90.0)
            .rng_seed(7)
            .build();

        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.stagnation_limit, 3);
        assert!((config.target_efficiency - 90.0).abs() < 1e-9);
        assert_eq!(config.rng_seed, 7);
    }
}
