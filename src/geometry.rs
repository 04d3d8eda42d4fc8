//! Geometric helper functions for 3D collision detection and stacking.
//!
//! This module provides the intersection test used by the placement engine
//! and the flush-surface predicates behind the support computation.

use crate::model::PlacedCarton;

/// Checks if two placed cartons spatially intersect.
///
/// Uses Axis-Aligned Bounding Box (AABB) collision detection with a strict
/// half-open interval test per axis: the interiors must overlap on all three
/// axes. Cartons touching along a face or edge do NOT intersect.
///
/// # Parameters
/// * `a` - First placed carton
/// * `b` - Second placed carton
///
/// # Returns
/// `true` if the cartons intersect, otherwise `false`
///
/// # Complexity
/// O(1) - Constant time
#[inline]
pub fn intersects(a: &PlacedCarton, b: &PlacedCarton) -> bool {
    a.bounding_box().intersects(&b.bounding_box())
}

/// Calculates the overlap of two intervals in one dimension.
///
/// # Parameters
/// * `a1` - Start of the first interval
/// * `a2` - End of the first interval
/// * `b1` - Start of the second interval
/// * `b2` - End of the second interval
///
/// # Returns
/// Length of the overlap, at least 0.0
#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}

/// Calculates the floor-projection overlap between a candidate footprint and
/// a placed carton.
///
/// # Parameters
/// * `x`, `z` - Front lower left corner of the candidate footprint
/// * `width`, `depth` - Extent of the candidate footprint
/// * `below` - The placed carton to intersect with
///
/// # Returns
/// Overlap area in the XZ plane, at least 0.0
pub fn footprint_overlap(x: f64, z: f64, width: f64, depth: f64, below: &PlacedCarton) -> f64 {
    let overlap_x = overlap_1d(x, x + width, below.position.0, below.position.0 + below.dims.0);
    let overlap_z = overlap_1d(z, z + depth, below.position.2, below.position.2 + below.dims.2);
    overlap_x * overlap_z
}

/// Checks if a surface at height `y` is flush with the top face of `below`.
///
/// # Parameters
/// * `y` - Bottom height of the candidate
/// * `below` - The potential supporter
/// * `surface_epsilon` - Tolerance for flushness (default 0.1 cm)
#[inline]
pub fn is_flush_on_top(y: f64, below: &PlacedCarton, surface_epsilon: f64) -> bool {
    (y - below.top_y()).abs() < surface_epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Carton, PlacedCarton, Rotation};
    use crate::types::{EPSILON_GENERAL, EPSILON_SURFACE};

    fn make_placed(pos: (f64, f64, f64), dims: (f64, f64, f64)) -> PlacedCarton {
        PlacedCarton::new(
            Carton::new("t", "SKU", dims, 1.0, true, 3).unwrap(),
            pos,
            Rotation::Whd,
        )
    }

    #[test]
    fn test_intersects_overlapping_cartons() {
        let a = make_placed((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        let b = make_placed((5.0, 5.0, 5.0), (10.0, 10.0, 10.0));
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_intersects_separated_cartons() {
        let a = make_placed((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        let b = make_placed((20.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn test_touching_faces_do_not_intersect() {
        let a = make_placed((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        let stacked = make_placed((0.0, 10.0, 0.0), (10.0, 10.0, 10.0));
        let beside = make_placed((10.0, 0.0, 0.0), (10.0, 10.0, 10.0));

        assert!(!intersects(&a, &stacked));
        assert!(!intersects(&a, &beside));
    }

    #[test]
    fn test_overlap_1d() {
        assert!((overlap_1d(0.0, 5.0, 3.0, 8.0) - 2.0).abs() < EPSILON_GENERAL);
        assert!((overlap_1d(0.0, 3.0, 5.0, 8.0) - 0.0).abs() < EPSILON_GENERAL);
        assert!((overlap_1d(0.0, 10.0, 2.0, 8.0) - 6.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_footprint_overlap() {
        let below = make_placed((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));

        assert!((footprint_overlap(5.0, 5.0, 10.0, 10.0, &below) - 25.0).abs() < EPSILON_GENERAL);
        assert!((footprint_overlap(10.0, 0.0, 10.0, 10.0, &below) - 0.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_is_flush_on_top() {
        let below = make_placed((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));

        assert!(is_flush_on_top(10.0, &below, EPSILON_SURFACE));
        assert!(is_flush_on_top(10.05, &below, EPSILON_SURFACE));
        assert!(!is_flush_on_top(10.2, &below, EPSILON_SURFACE));
        assert!(!is_flush_on_top(0.0, &below, EPSILON_SURFACE));
    }
}
