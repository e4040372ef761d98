//! Axis-aligned bounds over fixture space
//!
//! Every fixture accumulates the bounds of its points and children as the
//! rig is assembled. Effects use the normalized mappings to turn a physical
//! position into a gradient coordinate.

use glam::{DVec3, DVec4};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// Starts out empty (inverted infinities) and only ever grows; it is never
/// recomputed by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// The empty sentinel. Adding any point turns it into a real box.
    pub const EMPTY: Self = Self {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    /// Grow to include a point. The `w` component is ignored.
    pub fn add_point(&mut self, p: DVec4) {
        let p = p.truncate();
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow to include another box.
    pub fn add_bounds(&mut self, b: &Bounds) {
        self.min = self.min.min(b.min);
        self.max = self.max.max(b.max);
    }

    /// Whether any point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Per-axis size. Empty bounds report zero extent on every axis.
    pub fn extent(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        self.max - self.min
    }

    /// Map a position into [0, 1] per axis.
    ///
    /// Degenerate axes (extent below epsilon) map to 0, never NaN or inf.
    pub fn map_unit(&self, v: DVec4) -> DVec4 {
        let e = self.extent();
        DVec4::new(
            unit_axis(v.x, self.min.x, e.x),
            unit_axis(v.y, self.min.y, e.y),
            unit_axis(v.z, self.min.z, e.z),
            0.0,
        )
    }

    /// Map a position into [-1, 1] per axis, each axis scaled independently.
    pub fn map_norm(&self, v: DVec4) -> DVec4 {
        let e = self.extent();
        DVec4::new(
            norm_axis(v.x, self.min.x, e.x),
            norm_axis(v.y, self.min.y, e.y),
            norm_axis(v.z, self.min.z, e.z),
            0.0,
        )
    }

    /// Map a position into [-1, 1] scaled uniformly by the largest extent,
    /// preserving the aspect ratio of the box.
    pub fn map_norm_uniform(&self, v: DVec4) -> DVec4 {
        let e = self.extent();
        let longest = e.max_element();
        if longest < f64::EPSILON {
            return DVec4::ZERO;
        }
        DVec4::new(
            (v.x - self.min.x - e.x * 0.5) / longest * 2.0,
            (v.y - self.min.y - e.y * 0.5) / longest * 2.0,
            (v.z - self.min.z - e.z * 0.5) / longest * 2.0,
            0.0,
        )
    }
}

fn unit_axis(v: f64, min: f64, extent: f64) -> f64 {
    if extent >= f64::EPSILON {
        (v - min) / extent
    } else {
        0.0
    }
}

fn norm_axis(v: f64, min: f64, extent: f64) -> f64 {
    if extent >= f64::EPSILON {
        ((v - min) / extent - 0.5) * 2.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds_extent_is_zero() {
        let b = Bounds::default();
        assert!(b.is_empty());
        assert_eq!(b.extent(), DVec3::ZERO);
    }

    #[test]
    fn test_empty_bounds_map_unit_is_zero() {
        let b = Bounds::default();
        let m = b.map_unit(DVec4::new(10.0, -3.0, 7.5, 0.0));
        assert_eq!(m, DVec4::ZERO);
        assert!(m.x.is_finite());
    }

    #[test]
    fn test_bounds_grow_monotonically() {
        let mut b = Bounds::default();
        b.add_point(DVec4::new(1.0, 2.0, 3.0, 0.0));
        b.add_point(DVec4::new(-1.0, 0.0, 5.0, 0.0));
        assert_eq!(b.min, DVec3::new(-1.0, 0.0, 3.0));
        assert_eq!(b.max, DVec3::new(1.0, 2.0, 5.0));

        // Adding an interior point changes nothing
        let before = b;
        b.add_point(DVec4::new(0.0, 1.0, 4.0, 0.0));
        assert_eq!(b, before);
    }

    #[test]
    fn test_map_unit_endpoints() {
        let mut b = Bounds::default();
        b.add_point(DVec4::new(0.0, 0.0, 0.0, 0.0));
        b.add_point(DVec4::new(10.0, 20.0, 2000.0, 0.0));

        let lo = b.map_unit(DVec4::new(0.0, 0.0, 0.0, 0.0));
        let hi = b.map_unit(DVec4::new(10.0, 20.0, 2000.0, 0.0));
        assert!((lo.z - 0.0).abs() < 1e-12);
        assert!((hi.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_map_unit_degenerate_axis() {
        let mut b = Bounds::default();
        // All points share the same x, so the x axis is degenerate
        b.add_point(DVec4::new(5.0, 0.0, 0.0, 0.0));
        b.add_point(DVec4::new(5.0, 1.0, 10.0, 0.0));

        let m = b.map_unit(DVec4::new(5.0, 0.5, 5.0, 0.0));
        assert_eq!(m.x, 0.0);
        assert!((m.y - 0.5).abs() < 1e-12);
        assert!((m.z - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_map_norm_is_symmetric() {
        let mut b = Bounds::default();
        b.add_point(DVec4::new(-2.0, -2.0, -2.0, 0.0));
        b.add_point(DVec4::new(2.0, 2.0, 2.0, 0.0));

        let mid = b.map_norm(DVec4::ZERO);
        assert!(mid.abs().max_element() < 1e-12);
        let hi = b.map_norm(DVec4::new(2.0, 2.0, 2.0, 0.0));
        assert!((hi.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_map_norm_uniform_uses_longest_axis() {
        let mut b = Bounds::default();
        b.add_point(DVec4::new(0.0, 0.0, 0.0, 0.0));
        b.add_point(DVec4::new(1.0, 1.0, 10.0, 0.0));

        // x spans only a tenth of the longest (z) extent
        let hi = b.map_norm_uniform(DVec4::new(1.0, 1.0, 10.0, 0.0));
        assert!((hi.x - 0.1).abs() < 1e-12);
        assert!((hi.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_union_of_child_bounds() {
        let mut a = Bounds::default();
        a.add_point(DVec4::new(0.0, 0.0, 0.0, 0.0));
        let mut c = Bounds::default();
        c.add_point(DVec4::new(3.0, -1.0, 8.0, 0.0));

        let mut parent = Bounds::default();
        parent.add_bounds(&a);
        parent.add_bounds(&c);
        assert_eq!(parent.min, DVec3::new(0.0, -1.0, 0.0));
        assert_eq!(parent.max, DVec3::new(3.0, 0.0, 8.0));
    }
}
