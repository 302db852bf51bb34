//! Math utilities and types
//!
//! Provides the 2D point and vector types used by hitboxes. World
//! coordinates are screen-style: x grows to the right, y grows downward.

pub use nalgebra::{Point2, Vector2};

/// 2D vector type (axes, displacements, velocities)
pub type Vector = Vector2<f64>;

/// 2D point type (polygon vertices)
pub type Point = Point2<f64>;

/// Extension trait for [`Vector`] with the operations SAT needs on top of
/// nalgebra's `dot` and `normalize`
pub trait VectorExt {
    /// Rotate by 90 degrees: `(x, y) -> (-y, x)`
    fn orthogonal(&self) -> Vector;

    /// Dot product with a point interpreted as a position vector
    fn dot_point(&self, point: &Point) -> f64;

    /// 2D cross product (z component of the 3D cross product)
    fn perp_dot(&self, other: &Vector) -> f64;
}

impl VectorExt for Vector {
    fn orthogonal(&self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    fn dot_point(&self, point: &Point) -> f64 {
        self.x * point.x + self.y * point.y
    }

    fn perp_dot(&self, other: &Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Move `value` toward zero by `step` without crossing zero
    pub fn approach_zero(value: f64, step: f64) -> f64 {
        if value > 0.0 {
            (value - step).max(0.0)
        } else if value < 0.0 {
            (value + step).min(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orthogonal_rotates_counter_clockwise() {
        let v = Vector::new(1.0, 0.0);
        assert_eq!(v.orthogonal(), Vector::new(-0.0, 1.0));
        assert_eq!(v.orthogonal().orthogonal(), Vector::new(-1.0, -0.0));
    }

    #[test]
    fn test_normalized_orthogonal_is_unit_and_perpendicular() {
        let edge = Vector::new(3.0, 4.0);
        let axis = edge.normalize().orthogonal();
        assert_relative_eq!(axis.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(axis.dot(&edge), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dot_point_matches_vector_dot() {
        let axis = Vector::new(0.6, 0.8);
        let p = Point::new(2.0, -1.0);
        assert_relative_eq!(axis.dot_point(&p), axis.dot(&p.coords));
    }

    #[test]
    fn test_approach_zero_does_not_overshoot() {
        assert_eq!(utils::approach_zero(0.5, 1.0), 0.0);
        assert_eq!(utils::approach_zero(-0.5, 1.0), 0.0);
        assert_eq!(utils::approach_zero(3.0, 1.0), 2.0);
        assert_eq!(utils::clamp(5.0, -2.0, 2.0), 2.0);
    }
}
