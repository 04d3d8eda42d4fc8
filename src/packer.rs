//! Public entry point of the container-loading optimizer.
//!
//! A `Packer` owns the container template and the accumulated carton list
//! for one computation. `pack_all` runs the full meta-search and returns the
//! best outcome found.

use crate::model::{BinTemplate, Carton};
use crate::placement::PackingConfig;
use crate::scoring::{CM3_PER_CBM, PackingResult};
use crate::search::{SearchConfig, run_search};

/// Heuristic container-loading optimizer.
///
/// # Examples
/// ```
/// use stow_it_now::{BinTemplate, Carton, Packer};
///
/// let template = BinTemplate::new((100.0, 100.0, 100.0), 1000.0).unwrap();
/// let mut packer = Packer::new(template, 0.001);
/// packer.add_carton(Carton::new("c-1", "SKU-A", (50.0, 50.0, 50.0), 10.0, true, 3).unwrap());
///
/// let outcome = packer.pack_all();
/// assert!(outcome.is_complete());
/// assert_eq!(outcome.container_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Packer {
    template: BinTemplate,
    target_volume: f64,
    cartons: Vec<Carton>,
    packing_config: PackingConfig,
    search_config: SearchConfig,
}

impl Packer {
    /// Creates a packer for the given container type.
    ///
    /// # Parameters
    /// * `template` - Container dimensions (cm) and weight limit (kg)
    /// * `target_volume_cbm` - Planning reference volume in m³; efficiency is
    ///   reported against it and may exceed 100%
    pub fn new(template: BinTemplate, target_volume_cbm: f64) -> Self {
        Self {
            template,
            target_volume: target_volume_cbm * CM3_PER_CBM,
            cartons: Vec::new(),
            packing_config: PackingConfig::default(),
            search_config: SearchConfig::default(),
        }
    }

    /// Replaces the placement configuration.
    pub fn with_packing_config(mut self, config: PackingConfig) -> Self {
        self.packing_config = config;
        self
    }

    /// Replaces the meta-search configuration.
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search_config = config;
        self
    }

    /// Adds a carton to the load list.
    pub fn add_carton(&mut self, carton: Carton) {
        self.cartons.push(carton);
    }

    /// Returns the number of accumulated cartons.
    pub fn carton_count(&self) -> usize {
        self.cartons.len()
    }

    /// Runs the meta-search and returns the best outcome.
    ///
    /// With an empty load list, returns an empty outcome without searching.
    pub fn pack_all(&self) -> PackingResult {
        if self.cartons.is_empty() {
            return PackingResult::empty();
        }

        run_search(
            &self.cartons,
            &self.template,
            self.target_volume,
            &self.packing_config,
            &self.search_config,
        )
    }
}
