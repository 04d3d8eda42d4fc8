//! Common types and traits for 3D geometry.
//!
//! This module defines reusable types and trait abstractions shared by the
//! geometry kernel, the placement engine and the scoring layer.
//!
//! Coordinate convention: X = width, Y = height, Z = depth. Gravity acts
//! along -Y, the container floor is the plane Y = 0.

use std::ops::{Add, Mul, Sub};

/// Global numerical tolerance for floating-point comparisons.
///
/// Used for general numerical operations such as dimension and weight comparisons.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Tolerance for flushness of stacked surfaces, in centimeters.
///
/// Two cartons count as flush when their Y gap is below this value. Support
/// computations depend on it; tightening it changes which stacks are legal.
pub const EPSILON_SURFACE: f64 = 0.1;

/// Represents a 3D vector or point in space.
///
/// Used for positions, dimensions, and calculations in 3D space.
///
/// # Examples
/// ```
/// use stow_it_now::types::Vec3;
///
/// let position = Vec3::new(1.0, 2.0, 3.0);
/// let dimensions = Vec3::new(10.0, 20.0, 30.0);
/// let center = position + dimensions * 0.5;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new 3D vector.
    ///
    /// # Parameters
    /// * `x` - X component (width)
    /// * `y` - Y component (height)
    /// * `z` - Z component (depth)
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a zero vector (origin).
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Converts to tuple format for API compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Creates from tuple format.
    #[inline]
    pub const fn from_tuple(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }

    /// Calculates the volume (product of all components).
    ///
    /// Useful for dimension vectors.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Calculates the footprint area (X × Z product).
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        self.x * self.z
    }

    /// Checks if the vector fits within another vector (component-wise <=).
    ///
    /// # Parameters
    /// * `container` - The outer vector (e.g., container dimensions)
    /// * `tolerance` - Numerical tolerance for the comparison
    #[inline]
    pub fn fits_within(&self, container: &Self, tolerance: f64) -> bool {
        self.x <= container.x + tolerance
            && self.y <= container.y + tolerance
            && self.z <= container.z + tolerance
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    #[inline]
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self::from_tuple(tuple)
    }
}

impl From<Vec3> for (f64, f64, f64) {
    #[inline]
    fn from(vec: Vec3) -> Self {
        vec.as_tuple()
    }
}

/// Trait for objects with 3D dimensions.
///
/// Provides a common interface for all objects with spatial extent.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Vec3;

    /// Calculates the volume.
    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    /// Calculates the footprint area (floor projection).
    fn footprint_area(&self) -> f64 {
        self.dimensions().footprint_area()
    }

    /// Checks if this object fits in a container with the given dimensions.
    fn fits_in(&self, container_dims: &Vec3, tolerance: f64) -> bool {
        self.dimensions().fits_within(container_dims, tolerance)
    }
}

/// Trait for objects with a position in 3D space.
pub trait Positioned {
    /// Returns the position (front lower left corner).
    fn position(&self) -> Vec3;
}

/// Trait for objects with weight.
pub trait Weighted {
    /// Returns the weight in kg.
    fn weight(&self) -> f64;
}

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// Used for collision detection and support overlap calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (position)
    pub min: Vec3,
    /// Maximum corner (position + dimensions)
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a bounding box from position and dimensions.
    #[inline]
    pub fn from_position_and_dims(position: Vec3, dims: Vec3) -> Self {
        Self {
            min: position,
            max: position + dims,
        }
    }

    /// Checks if two bounding boxes strictly intersect.
    ///
    /// Half-open interval test per axis: the interiors must overlap on all
    /// three axes. Touching faces do NOT count as an intersection.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// Calculates the overlap length in one dimension.
    #[inline]
    fn overlap_1d(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
        (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
    }

    /// Calculates the overlap area in the XZ plane (floor projection).
    #[inline]
    pub fn overlap_area_xz(&self, other: &Self) -> f64 {
        let overlap_x = Self::overlap_1d(self.min.x, self.max.x, other.min.x, other.max.x);
        let overlap_z = Self::overlap_1d(self.min.z, self.max.z, other.min.z, other.max.z);
        overlap_x * overlap_z
    }

    /// Returns the top surface height (Y maximum).
    #[inline]
    pub fn top_y(&self) -> f64 {
        self.max.y
    }

    /// Returns the center point.
    #[inline]
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Returns the dimensions (width, height, depth).
    #[inline]
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Center of gravity calculation helper for the XZ deck plane.
///
/// Accumulates weighted carton centers; Y is irrelevant for the balance
/// checks, only the floor projection matters.
#[derive(Clone, Debug, Default)]
pub struct CenterOfGravityCalculator {
    weighted_x: f64,
    weighted_z: f64,
    total_weight: f64,
}

impl CenterOfGravityCalculator {
    /// Creates a new calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a weighted point on the deck plane.
    ///
    /// # Parameters
    /// * `x` - X position of the point
    /// * `z` - Z position of the point
    /// * `weight` - Weight of the point
    pub fn add_point(&mut self, x: f64, z: f64, weight: f64) {
        self.weighted_x += x * weight;
        self.weighted_z += z * weight;
        self.total_weight += weight;
    }

    /// Calculates the center of gravity.
    ///
    /// # Returns
    /// `Some((x, z))` for valid center of gravity, `None` if no weight present
    pub fn compute(&self) -> Option<(f64, f64)> {
        if self.total_weight <= 0.0 {
            None
        } else {
            Some((
                self.weighted_x / self.total_weight,
                self.weighted_z / self.total_weight,
            ))
        }
    }
}
