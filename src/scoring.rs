//! Per-container metrics and outcome scoring.
//!
//! After the placement engine finalizes a container, this module derives the
//! report consumed by downstream systems (efficiency, weight distribution,
//! center of gravity, safety warnings) and assigns the scalar score by which
//! the meta-search ranks complete outcomes.

use serde::Serialize;

use crate::model::{Bin, Carton, PlacedCarton};
use crate::types::CenterOfGravityCalculator;

/// Cubic centimeters per cubic meter.
pub const CM3_PER_CBM: f64 = 1_000_000.0;

/// Maximum tolerated center-of-gravity offset, as a ratio of the respective
/// container dimension.
pub const BALANCE_TOLERANCE_RATIO: f64 = 0.05;

/// Maximum share of total weight either longitudinal half may carry.
pub const HALF_WEIGHT_LIMIT: f64 = 0.6;

/// Score penalty per cubic meter of cargo left unpacked.
pub const UNPACKED_PENALTY_PER_CBM: f64 = 100.0;

/// Score penalty per container used.
pub const CONTAINER_PENALTY: f64 = 50.0;

/// Score penalty for a balance warning on a non-final container.
pub const BALANCE_WARNING_PENALTY: f64 = 20.0;

/// Score penalty for a longitudinal weight warning on a non-final container.
pub const WEIGHT_DISTRIBUTION_PENALTY: f64 = 30.0;

/// Score assigned to an outcome without any loaded container.
pub const EMPTY_OUTCOME_SCORE: f64 = -1_000_000.0;

/// Report for one loaded container.
///
/// # Fields
/// * `id` - `"Container #k"`, k 1-based in loading order
/// * `items` - Placed cartons in placement order
/// * `total_weight` - Total cargo weight in kg
/// * `efficiency` - Stowed volume relative to the target volume, in percent;
///   may exceed 100 since the target volume is a planning reference, not the
///   container capacity
/// * `total_cbm` / `empty_cbm` / `empty_percent` - Volume accounting in m³
/// * `carton_count` - Number of cartons
/// * `weight_capacity_percent` - Cargo weight relative to the weight limit
/// * `cog_x` / `cog_z` - Center of gravity on the deck plane
/// * `balance_warning` - Center of gravity off-center beyond tolerance
/// * `weight_60_50_warning` - One longitudinal half carries over 60% of the
///   cargo weight
#[derive(Clone, Debug, Serialize)]
pub struct ContainerReport {
    pub id: String,
    pub items: Vec<PlacedCarton>,
    pub total_weight: f64,
    pub efficiency: f64,
    pub total_cbm: f64,
    pub empty_cbm: f64,
    pub empty_percent: f64,
    pub carton_count: usize,
    pub weight_capacity_percent: f64,
    pub cog_x: f64,
    pub cog_z: f64,
    pub balance_warning: bool,
    pub weight_60_50_warning: bool,
}

/// Derives the report for a finalized container.
///
/// # Parameters
/// * `bin` - The loaded container; its placements move into the report
/// * `ordinal` - 1-based container number within the outcome
pub fn summarize_bin(bin: Bin, ordinal: usize) -> ContainerReport {
    let total_volume = bin.used_volume();
    let total_weight = bin.total_weight();

    let mut cog = CenterOfGravityCalculator::new();
    for p in &bin.placed {
        let (cx, _, cz) = p.center();
        cog.add_point(cx, cz, p.carton.weight);
    }
    let (cog_x, cog_z) = cog.compute().unwrap_or((0.0, 0.0));

    let (bin_w, _, bin_d) = bin.dims;
    let balance_warning = (cog_x - bin_w / 2.0).abs() > BALANCE_TOLERANCE_RATIO * bin_w
        || (cog_z - bin_d / 2.0).abs() > BALANCE_TOLERANCE_RATIO * bin_d;

    let front_weight: f64 = bin
        .placed
        .iter()
        .filter(|p| p.center().2 < bin_d / 2.0)
        .map(|p| p.carton.weight)
        .sum();
    let back_weight = total_weight - front_weight;
    let weight_60_50_warning = front_weight > HALF_WEIGHT_LIMIT * total_weight
        || back_weight > HALF_WEIGHT_LIMIT * total_weight;

    ContainerReport {
        id: format!("Container #{}", ordinal),
        total_weight,
        efficiency: total_volume / bin.target_volume * 100.0,
        total_cbm: total_volume / CM3_PER_CBM,
        empty_cbm: (bin.target_volume - total_volume) / CM3_PER_CBM,
        empty_percent: (bin.target_volume - total_volume) / bin.target_volume * 100.0,
        carton_count: bin.placed.len(),
        weight_capacity_percent: total_weight / bin.max_weight * 100.0,
        cog_x,
        cog_z,
        balance_warning,
        weight_60_50_warning,
        items: bin.placed,
    }
}

/// Result of one complete loading computation.
#[derive(Clone, Debug, Serialize)]
pub struct PackingResult {
    pub results: Vec<ContainerReport>,
    pub unpacked: Vec<Carton>,
}

impl PackingResult {
    /// Creates an empty result (no containers, nothing unpacked).
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            unpacked: Vec::new(),
        }
    }

    /// Indicates whether all cartons were stowed.
    pub fn is_complete(&self) -> bool {
        self.unpacked.is_empty()
    }

    /// Returns the total number of containers.
    pub fn container_count(&self) -> usize {
        self.results.len()
    }

    /// Returns the number of unpacked cartons.
    pub fn unpacked_count(&self) -> usize {
        self.unpacked.len()
    }

    /// Calculates the mean volumetric efficiency across containers.
    pub fn average_efficiency(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.results.iter().map(|r| r.efficiency).sum();
        sum / self.results.len() as f64
    }

    /// Indicates whether any container carries a safety warning.
    pub fn has_warnings(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.balance_warning || r.weight_60_50_warning)
    }

    /// Calculates the total weight of all stowed cartons.
    pub fn total_packed_weight(&self) -> f64 {
        self.results.iter().map(|r| r.total_weight).sum()
    }
}

/// Assigns the scalar score by which outcomes are ranked (higher is better).
///
/// Rewards packed volume; penalizes unpacked cargo, container count and
/// safety warnings. Warnings on the final container are forgiven: a tail
/// container typically holds light remnants and cannot be balanced.
pub fn score_outcome(outcome: &PackingResult) -> f64 {
    if outcome.results.is_empty() {
        return EMPTY_OUTCOME_SCORE;
    }

    let packed_cbm: f64 = outcome.results.iter().map(|r| r.total_cbm).sum();
    let unpacked_cbm: f64 = outcome
        .unpacked
        .iter()
        .map(|c| c.volume())
        .sum::<f64>()
        / CM3_PER_CBM;

    let mut safety_penalty = 0.0;
    for report in &outcome.results[..outcome.results.len() - 1] {
        if report.balance_warning {
            safety_penalty += BALANCE_WARNING_PENALTY;
        }
        if report.weight_60_50_warning {
            safety_penalty += WEIGHT_DISTRIBUTION_PENALTY;
        }
    }

    packed_cbm
        - UNPACKED_PENALTY_PER_CBM * unpacked_cbm
        - CONTAINER_PENALTY * outcome.results.len() as f64
        - safety_penalty
}
