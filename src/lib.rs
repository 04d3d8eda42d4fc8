//! stow-it-now: 3D container-loading optimization
//!
//! A heuristic library for loading rectangular cartons into shipping
//! containers. Places cartons considering:
//! - Weight limits and longitudinal weight distribution
//! - Support, stability and fragility (delicate cartons bear no tough ones)
//! - Center of gravity balance
//!
//! The search runs on two levels: an outer loop cycles several ordering
//! strategies (jittering near-ties after the deterministic opening round)
//! and an inner engine greedily fills one container at a time from pivot
//! points with six-way rotation. The best-scoring outcome wins.
//!
//! # Examples
//! ```
//! use stow_it_now::{BinTemplate, Carton, Packer};
//!
//! let template = BinTemplate::new((120.0, 100.0, 80.0), 500.0).unwrap();
//! let mut packer = Packer::new(template, 0.96);
//! packer.add_carton(Carton::new("c-1", "SKU-A", (30.0, 40.0, 20.0), 5.0, true, 3).unwrap());
//!
//! let outcome = packer.pack_all();
//! assert!(outcome.is_complete());
//! ```

pub mod geometry;
pub mod model;
pub mod packer;
pub mod placement;
pub mod scoring;
pub mod search;
pub mod strategy;
pub mod types;

pub use model::{BinTemplate, Carton, PlacedCarton, Rotation, ValidationError};
pub use packer::Packer;
pub use placement::PackingConfig;
pub use scoring::{ContainerReport, PackingResult};
pub use search::SearchConfig;
pub use strategy::SortStrategy;
