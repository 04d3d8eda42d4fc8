//! Data models for the container-loading optimizer.
//!
//! This module defines the fundamental data structures for 3D load planning:
//! - `Carton`: a rectangular item to be stowed, with dimensions, weight and
//!   handling attributes
//! - `Rotation`: the six axis-aligned orientations of a carton
//! - `BinTemplate`: the container type with capacity limits
//! - `PlacedCarton`: a carton with its committed position and orientation
//! - `Bin`: a container being filled during one trial
//!
//! All structures implement the traits from the `types` module.

use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox, Dimensional, EPSILON_GENERAL, Positioned, Vec3, Weighted};

/// Lowest fragility class (most delicate).
pub const FRAGILITY_MIN: u8 = 1;
/// Highest fragility class (toughest, can bear the most load).
pub const FRAGILITY_MAX: u8 = 5;

/// Cubic clearance factor applied to container templates.
///
/// Each linear dimension of the working bin is scaled by the cube root of
/// this value, reserving a 0.2% internal volume clearance.
pub const CLEARANCE_FACTOR: f64 = 0.998;

/// Validation error for carton or container data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidWeight(String),
    InvalidFragility(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidWeight(msg) => write!(f, "Invalid weight: {}", msg),
            ValidationError::InvalidFragility(msg) => write!(f, "Invalid fragility: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper function to validate a single dimension.
fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Helper function to validate weight.
fn validate_weight_value(value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidWeight(format!(
            "Weight must be positive, got: {}",
            value
        )));
    }
    Ok(())
}

/// Validates dimensions and weight together.
fn validate_carton_params(dims: (f64, f64, f64), weight: f64) -> Result<(), ValidationError> {
    validate_dimension(dims.0, "Width")?;
    validate_dimension(dims.1, "Height")?;
    validate_dimension(dims.2, "Depth")?;
    validate_weight_value(weight)?;
    Ok(())
}

/// Validates the fragility class range.
fn validate_fragility(value: u8) -> Result<(), ValidationError> {
    if !(FRAGILITY_MIN..=FRAGILITY_MAX).contains(&value) {
        return Err(ValidationError::InvalidFragility(format!(
            "Fragility must be between {} and {}, got: {}",
            FRAGILITY_MIN, FRAGILITY_MAX, value
        )));
    }
    Ok(())
}

/// The six axis-aligned orientations of a carton.
///
/// Each variant names how the original (width, height, depth) triple maps
/// onto the container axes; `Whd` is the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rotation {
    Whd,
    Hwd,
    Hdw,
    Dhw,
    Dwh,
    Wdh,
}

impl Rotation {
    /// All orientations in the fixed trial order.
    pub const ALL: [Rotation; 6] = [
        Rotation::Whd,
        Rotation::Hwd,
        Rotation::Hdw,
        Rotation::Dhw,
        Rotation::Dwh,
        Rotation::Wdh,
    ];

    /// Maps original (width, height, depth) to the actual dimensions under
    /// this orientation.
    ///
    /// # Examples
    /// ```
    /// use stow_it_now::model::Rotation;
    ///
    /// assert_eq!(Rotation::Whd.apply((1.0, 2.0, 3.0)), (1.0, 2.0, 3.0));
    /// assert_eq!(Rotation::Dwh.apply((1.0, 2.0, 3.0)), (3.0, 1.0, 2.0));
    /// ```
    #[inline]
    pub fn apply(&self, dims: (f64, f64, f64)) -> (f64, f64, f64) {
        let (w, h, d) = dims;
        match self {
            Rotation::Whd => (w, h, d),
            Rotation::Hwd => (h, w, d),
            Rotation::Hdw => (h, d, w),
            Rotation::Dhw => (d, h, w),
            Rotation::Dwh => (d, w, h),
            Rotation::Wdh => (w, d, h),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Rotation::Whd => "WHD",
            Rotation::Hwd => "HWD",
            Rotation::Hdw => "HDW",
            Rotation::Dhw => "DHW",
            Rotation::Dwh => "DWH",
            Rotation::Wdh => "WDH",
        };
        write!(f, "{}", label)
    }
}

/// Represents a rectangular carton to be stowed.
///
/// # Fields
/// * `id` - Stable identifier of the carton
/// * `name` - Display name; cartons sharing it belong to the same SKU
/// * `dims` - Dimensions (width, height, depth) in cm
/// * `weight` - Weight of the carton in kg
/// * `allow_rotation` - Whether non-identity orientations may be tried
/// * `fragility` - Class 1..=5, higher = tougher (can bear more load)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Carton {
    pub id: String,
    pub name: String,
    pub dims: (f64, f64, f64),
    pub weight: f64,
    pub allow_rotation: bool,
    pub fragility: u8,
}

impl Carton {
    /// Creates a new carton with validation.
    ///
    /// # Parameters
    /// * `id` - Stable identifier
    /// * `name` - Display name (SKU)
    /// * `dims` - Dimensions (width, height, depth) in cm
    /// * `weight` - Weight in kg
    /// * `allow_rotation` - Whether the carton may be reoriented
    /// * `fragility` - Class 1..=5
    ///
    /// # Returns
    /// `Ok(Carton)` for valid values, otherwise `Err(ValidationError)`
    ///
    /// # Examples
    /// ```
    /// use stow_it_now::model::Carton;
    ///
    /// let ok = Carton::new("c-1", "SKU-A", (30.0, 40.0, 20.0), 5.0, true, 3);
    /// assert!(ok.is_ok());
    ///
    /// let invalid = Carton::new("c-2", "SKU-A", (-30.0, 40.0, 20.0), 5.0, true, 3);
    /// assert!(invalid.is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        dims: (f64, f64, f64),
        weight: f64,
        allow_rotation: bool,
        fragility: u8,
    ) -> Result<Self, ValidationError> {
        validate_carton_params(dims, weight)?;
        validate_fragility(fragility)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            dims,
            weight,
            allow_rotation,
            fragility,
        })
    }

    /// Calculates the volume of the carton.
    ///
    /// Invariant under rotation.
    pub fn volume(&self) -> f64 {
        let (w, h, d) = self.dims;
        w * h * d
    }

    /// Returns the floor-projection area of the carton in its original
    /// orientation (width × depth).
    pub fn footprint_area(&self) -> f64 {
        let (w, _, d) = self.dims;
        w * d
    }

    /// Converts the dimensions to a Vec3.
    #[inline]
    pub fn dims_as_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}

impl Dimensional for Carton {
    fn dimensions(&self) -> Vec3 {
        self.dims_as_vec3()
    }
}

impl Weighted for Carton {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// A carton with its committed position and orientation in a container.
///
/// # Fields
/// * `carton` - The original carton
/// * `position` - Position (x, y, z) of the front lower left corner
/// * `rotation` - Selected orientation
/// * `dims` - Actual (post-rotation) dimensions
#[derive(Clone, Debug, Serialize)]
pub struct PlacedCarton {
    pub carton: Carton,
    pub position: (f64, f64, f64),
    pub rotation: Rotation,
    pub dims: (f64, f64, f64),
}

impl PlacedCarton {
    /// Creates a placement of `carton` at `position` under `rotation`.
    pub fn new(carton: Carton, position: (f64, f64, f64), rotation: Rotation) -> Self {
        let dims = rotation.apply(carton.dims);
        Self {
            carton,
            position,
            rotation,
            dims,
        }
    }

    /// Returns the top surface height of the placement.
    ///
    /// # Returns
    /// Y position + actual height of the carton
    pub fn top_y(&self) -> f64 {
        self.position.1 + self.dims.1
    }

    /// Returns the center of the placed carton.
    ///
    /// # Returns
    /// Tuple with (center_x, center_y, center_z)
    pub fn center(&self) -> (f64, f64, f64) {
        (
            self.position.0 + self.dims.0 / 2.0,
            self.position.1 + self.dims.1 / 2.0,
            self.position.2 + self.dims.2 / 2.0,
        )
    }

    /// Calculates the bounding box of the placement.
    ///
    /// Used for collision detection and support overlap calculation.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_position_and_dims(
            Vec3::from_tuple(self.position),
            Vec3::from_tuple(self.dims),
        )
    }

    /// Converts the position to a Vec3.
    #[inline]
    pub fn position_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.position)
    }
}

impl Positioned for PlacedCarton {
    fn position(&self) -> Vec3 {
        self.position_vec3()
    }
}

impl Dimensional for PlacedCarton {
    /// Actual (post-rotation) dimensions.
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}

impl Weighted for PlacedCarton {
    fn weight(&self) -> f64 {
        self.carton.weight
    }
}

/// Template for the container type used by a run.
///
/// Holds the nominal outer dimensions; working bins are instantiated with
/// the clearance shrink applied.
#[derive(Clone, Debug)]
pub struct BinTemplate {
    pub dims: (f64, f64, f64),
    pub max_weight: f64,
}

impl BinTemplate {
    /// Creates a new container template after validating the parameters.
    ///
    /// # Parameters
    /// * `dims` - Nominal dimensions (width, height, depth) in cm
    /// * `max_weight` - Maximum total cargo weight in kg
    pub fn new(dims: (f64, f64, f64), max_weight: f64) -> Result<Self, ValidationError> {
        validate_dimension(dims.0, "Container width")?;
        validate_dimension(dims.1, "Container height")?;
        validate_dimension(dims.2, "Container depth")?;
        validate_weight_value(max_weight)?;
        Ok(Self { dims, max_weight })
    }

    /// Returns the working dimensions with the clearance shrink applied.
    ///
    /// Each linear dimension is scaled by ∛0.998, reserving 0.2% of the
    /// volume as internal clearance.
    pub fn shrunk_dims(&self) -> (f64, f64, f64) {
        let factor = CLEARANCE_FACTOR.cbrt();
        (
            self.dims.0 * factor,
            self.dims.1 * factor,
            self.dims.2 * factor,
        )
    }

    /// Instantiates an empty working bin based on this template.
    ///
    /// # Parameters
    /// * `target_volume` - Efficiency reference volume in cm³; independent of
    ///   the shrunk bin volume
    pub fn instantiate(&self, target_volume: f64) -> Bin {
        Bin {
            dims: self.shrunk_dims(),
            max_weight: self.max_weight,
            target_volume,
            placed: Vec::new(),
        }
    }

    /// Returns the nominal volume of the template.
    pub fn volume(&self) -> f64 {
        let (w, h, d) = self.dims;
        w * h * d
    }
}

impl Dimensional for BinTemplate {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}

/// A container being filled during one trial.
///
/// # Fields
/// * `dims` - Working (shrunk) dimensions
/// * `max_weight` - Maximum total cargo weight in kg
/// * `target_volume` - Efficiency reference volume in cm³
/// * `placed` - Cartons committed so far, in placement order
#[derive(Clone, Debug)]
pub struct Bin {
    pub dims: (f64, f64, f64),
    pub max_weight: f64,
    pub target_volume: f64,
    pub placed: Vec<PlacedCarton>,
}

impl Bin {
    /// Calculates the total weight of all placed cartons.
    pub fn total_weight(&self) -> f64 {
        self.placed.iter().map(|p| p.carton.weight).sum()
    }

    /// Calculates the remaining available weight.
    pub fn remaining_weight(&self) -> f64 {
        self.max_weight - self.total_weight()
    }

    /// Calculates the stowed cargo volume (sum of original carton volumes).
    pub fn used_volume(&self) -> f64 {
        self.placed.iter().map(|p| p.carton.volume()).sum()
    }

    /// Checks whether another `weight` kg can be loaded.
    ///
    /// Uses the global tolerance constant.
    pub fn can_take_weight(&self, weight: f64) -> bool {
        self.remaining_weight() + EPSILON_GENERAL >= weight
    }

    /// Converts the working dimensions to a Vec3.
    #[inline]
    pub fn dims_as_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}

impl Dimensional for Bin {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}
