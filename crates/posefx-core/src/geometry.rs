//! Geometry primitives over image-space points

use serde::{Deserialize, Serialize};

/// Image-space point, already mirrored to viewer orientation by the provider
///
/// Points slightly outside the canvas are valid input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation
    pub fn lerp(&self, other: &Point2D, t: f32) -> Point2D {
        Point2D {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
        }
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        self.lerp(other, 0.5)
    }

    /// Shifted copy
    pub fn offset(&self, dx: f32, dy: f32) -> Point2D {
        Point2D {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Distance between two possibly-absent points
///
/// Returns 0.0 when either point is missing. Absence is a normal input here.
pub fn distance(a: Option<Point2D>, b: Option<Point2D>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => a.distance(&b),
        _ => 0.0,
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `value` inside `[min, max]`, clamped to `[0, 1]`
///
/// A degenerate range yields 0.0.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    if max <= min || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Linear map from `[in_min, in_max]` onto `[out_min, out_max]`, clamped
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    lerp(out_min, out_max, normalize(value, in_min, in_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert!((distance(Some(a), Some(b)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_absent_is_zero() {
        let a = Point2D::new(10.0, 10.0);
        assert_eq!(distance(Some(a), None), 0.0);
        assert_eq!(distance(None, Some(a)), 0.0);
        assert_eq!(distance(None, None), 0.0);
    }

    #[test]
    fn test_midpoint() {
        let mid = Point2D::new(0.0, 10.0).midpoint(&Point2D::new(10.0, 30.0));
        assert_eq!(mid, Point2D::new(5.0, 20.0));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(50.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(5.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(50.0, 50.0, 400.0, 20.0, 200.0), 20.0);
        assert_eq!(map_range(400.0, 50.0, 400.0, 20.0, 200.0), 200.0);
        assert_eq!(map_range(10.0, 50.0, 400.0, 20.0, 200.0), 20.0);
    }

    proptest! {
        #[test]
        fn prop_normalize_in_unit_range(
            v in -1e6f32..1e6,
            min in -1e3f32..1e3,
            span in 0.001f32..1e3,
        ) {
            let n = normalize(v, min, min + span);
            prop_assert!((0.0..=1.0).contains(&n));
        }

        #[test]
        fn prop_distance_symmetric(
            ax in -2e3f32..2e3,
            ay in -2e3f32..2e3,
            bx in -2e3f32..2e3,
            by in -2e3f32..2e3,
        ) {
            let a = Point2D::new(ax, ay);
            let b = Point2D::new(bx, by);
            prop_assert_eq!(a.distance(&b), b.distance(&a));
            prop_assert!(a.distance(&b) >= 0.0);
        }
    }
}
