//! Ordering strategies and the single-trial driver.
//!
//! One trial sorts a fresh copy of the carton list by a strategy, optionally
//! jitters near-ties, and fills containers one after another, feeding each
//! container's leftovers to the next.

use std::cmp::Ordering;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::model::{BinTemplate, Carton};
use crate::placement::{PackingConfig, pack_single_bin};
use crate::scoring::{PackingResult, summarize_bin};

/// Primary-key gap below which two cartons count as tied for jittering.
pub const JITTER_TIE_EPSILON: f64 = 0.1;

/// An item-ordering rule driving one trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortStrategy {
    /// Volume descending.
    VolumeDesc,
    /// Weight descending.
    WeightDesc,
    /// Density (weight per volume) descending.
    DensityDesc,
    /// Fragility class descending (tough cartons first).
    FragilityDesc,
    /// Footprint area descending.
    AreaDesc,
}

impl SortStrategy {
    /// The strategy rotation of the meta-search, in cycle order.
    pub const CYCLE: [SortStrategy; 5] = [
        SortStrategy::VolumeDesc,
        SortStrategy::WeightDesc,
        SortStrategy::DensityDesc,
        SortStrategy::FragilityDesc,
        SortStrategy::AreaDesc,
    ];

    /// Returns the primary sort key of a carton under this strategy.
    pub fn key(&self, carton: &Carton) -> f64 {
        match self {
            SortStrategy::VolumeDesc => carton.volume(),
            SortStrategy::WeightDesc => carton.weight,
            SortStrategy::DensityDesc => carton.weight / carton.volume(),
            SortStrategy::FragilityDesc => carton.fragility as f64,
            SortStrategy::AreaDesc => carton.footprint_area(),
        }
    }

    /// Stable identifier for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            SortStrategy::VolumeDesc => "volume_desc",
            SortStrategy::WeightDesc => "weight_desc",
            SortStrategy::DensityDesc => "density_desc",
            SortStrategy::FragilityDesc => "fragility_desc",
            SortStrategy::AreaDesc => "area_desc",
        }
    }
}

impl std::fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Orders a fresh copy of the carton list for one trial.
///
/// The sort is stable and descending on the strategy key, so trials without
/// jitter are deterministic across calls with the same input. With `jitter`,
/// runs of cartons whose consecutive keys differ by less than
/// [`JITTER_TIE_EPSILON`] are shuffled uniformly.
pub fn order_cartons(
    cartons: &[Carton],
    strategy: SortStrategy,
    jitter: bool,
    rng: &mut StdRng,
) -> Vec<Carton> {
    let mut ordered: Vec<Carton> = cartons.to_vec();
    ordered.sort_by(|a, b| {
        strategy
            .key(b)
            .partial_cmp(&strategy.key(a))
            .unwrap_or(Ordering::Equal)
    });

    if jitter {
        shuffle_tied_runs(&mut ordered, strategy, rng);
    }

    ordered
}

/// Shuffles maximal runs of near-tied cartons in a sorted list.
///
/// Run boundaries are taken from the sorted key sequence before any
/// shuffling, so a chain of small gaps forms a single run.
fn shuffle_tied_runs(ordered: &mut [Carton], strategy: SortStrategy, rng: &mut StdRng) {
    let keys: Vec<f64> = ordered.iter().map(|c| strategy.key(c)).collect();

    let mut start = 0;
    for i in 1..=ordered.len() {
        let chained = i < ordered.len() && (keys[i - 1] - keys[i]).abs() < JITTER_TIE_EPSILON;
        if !chained {
            if i - start > 1 {
                ordered[start..i].shuffle(rng);
            }
            start = i;
        }
    }
}

/// Runs one trial: sorts the cartons and fills containers sequentially.
///
/// Containers are numbered 1-based in loading order. A container that
/// accepts zero cartons ends the run; the remainder is returned as
/// unpacked.
///
/// # Parameters
/// * `cartons` - The full carton list; not mutated
/// * `template` - Container type to instantiate per bin
/// * `target_volume` - Efficiency reference volume in cm³
/// * `strategy` - Ordering rule for this trial
/// * `jitter` - Whether near-ties are shuffled
/// * `config` - Placement configuration
/// * `rng` - Per-trial random generator (only consumed when jittering)
pub fn run_trial(
    cartons: &[Carton],
    template: &BinTemplate,
    target_volume: f64,
    strategy: SortStrategy,
    jitter: bool,
    config: &PackingConfig,
    rng: &mut StdRng,
) -> PackingResult {
    let mut results = Vec::new();
    let mut unpacked = Vec::new();
    let mut remaining = order_cartons(cartons, strategy, jitter, rng);

    while !remaining.is_empty() {
        let mut bin = template.instantiate(target_volume);
        let leftovers = pack_single_bin(&mut bin, remaining, config);

        if bin.placed.is_empty() {
            // No carton fit a fresh container; the rest is unpackable.
            unpacked = leftovers;
            break;
        }

        debug!(
            "[TRIAL] {} container #{}: {} cartons, {:.1} kg",
            strategy.label(),
            results.len() + 1,
            bin.placed.len(),
            bin.total_weight()
        );
        results.push(summarize_bin(bin, results.len() + 1));
        remaining = leftovers;
    }

    PackingResult { results, unpacked }
}
