//! Standard tile hitboxes
//!
//! Tiles come in a handful of fixed outlines (a square and five right or
//! 30-60-90 triangles) that can be rotated in quarter turns. Outlines are
//! defined on the unit square and scaled to the tile size when a polygon is
//! built, so the tile size is a parameter rather than shared state.

use super::overlap::AxisDirection;
use super::polygon::Polygon;
use crate::foundation::math::Point;
use crate::physics::CollisionError;
use std::fmt;

/// Quarter-turn rotation of a tile outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// Unrotated
    #[default]
    Zero,
    /// 90 degrees
    Ninety,
    /// 180 degrees
    OneEighty,
    /// 270 degrees
    TwoSeventy,
}

impl Rotation {
    const ALL: [Self; 4] = [Self::Zero, Self::Ninety, Self::OneEighty, Self::TwoSeventy];

    fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    /// Next rotation, wrapping around
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous rotation, wrapping around
    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Rotate a point of the unit square about the square's center
    pub fn rotate_unit_point(self, point: Point) -> Point {
        match self {
            Self::Zero => point,
            Self::Ninety => Point::new(1.0 - point.y, point.x),
            Self::OneEighty => Point::new(1.0 - point.x, 1.0 - point.y),
            Self::TwoSeventy => Point::new(point.y, 1.0 - point.x),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zero => "Zero",
            Self::Ninety => "Ninety",
            Self::OneEighty => "OneEighty",
            Self::TwoSeventy => "TwoSeventy",
        };
        f.write_str(name)
    }
}

/// Outline of a tile on the unit square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    /// Full square
    #[default]
    Square,
    /// 30-60-90 triangle, apex to the right
    Triangle30_60_90,
    /// 60-90-30 triangle, apex to the left
    Triangle60_90_30,
    /// Half-height ramp rising to the left
    Triangle90_30_60,
    /// Half-height ramp rising to the right
    Triangle30_90_60,
    /// Full-height right triangle
    TriangleRight,
}

impl ShapeKind {
    const ALL: [Self; 6] = [
        Self::Square,
        Self::Triangle30_60_90,
        Self::Triangle60_90_30,
        Self::Triangle90_30_60,
        Self::Triangle30_90_60,
        Self::TriangleRight,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Next kind, wrapping around
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous kind, wrapping around
    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Unrotated outline on the unit square, in winding order
    pub fn unit_outline(self) -> Vec<Point> {
        let short_width = 1.0 / 4.0;
        let long_width = 3.0 / 4.0;
        let short_height = 3.0_f64.sqrt() / 4.0;
        match self {
            Self::Square => vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
            Self::Triangle30_60_90 => vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(long_width, short_height),
            ],
            Self::Triangle60_90_30 => vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(short_width, short_height),
            ],
            Self::Triangle90_30_60 => vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(0.0, 0.5),
            ],
            Self::Triangle30_90_60 => vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 0.5),
            ],
            Self::TriangleRight => vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ],
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Square => "Square",
            Self::Triangle30_60_90 => "Triangle_30_60_90",
            Self::Triangle60_90_30 => "Triangle_60_90_30",
            Self::Triangle90_30_60 => "Triangle_90_30_60",
            Self::Triangle30_90_60 => "Triangle_30_90_60",
            Self::TriangleRight => "TriangleRight",
        };
        f.write_str(name)
    }
}

/// A tile outline plus rotation and per-edge primary markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileShape {
    /// Outline kind
    pub kind: ShapeKind,
    /// Quarter-turn rotation
    pub rotation: Rotation,
    /// Primary marker per edge (edge 3 only exists on squares)
    pub primary_edges: [Option<AxisDirection>; 4],
}

impl TileShape {
    /// Unrotated shape with no primary edges
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set the rotation
    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mark an edge as primary
    #[must_use]
    pub fn with_primary_edge(mut self, edge: usize, direction: AxisDirection) -> Self {
        if let Some(slot) = self.primary_edges.get_mut(edge) {
            *slot = Some(direction);
        }
        self
    }

    /// Build the hitbox with the tile's top-left corner at `position`
    pub fn polygon(
        &self,
        position: Point,
        tile_width: f64,
        tile_height: f64,
    ) -> Result<Polygon, CollisionError> {
        let vertices = self
            .kind
            .unit_outline()
            .into_iter()
            .map(|ratio| {
                let rotated = self.rotation.rotate_unit_point(ratio);
                Point::new(
                    position.x + rotated.x * tile_width,
                    position.y + rotated.y * tile_height,
                )
            })
            .collect();
        let mut polygon = Polygon::new(vertices)?;
        for (edge, direction) in self.primary_edges.iter().enumerate() {
            if let Some(direction) = direction {
                polygon.add_primary_axis_index(edge, *direction)?;
            }
        }
        Ok(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_cycles() {
        assert_eq!(Rotation::TwoSeventy.next(), Rotation::Zero);
        assert_eq!(Rotation::Zero.previous(), Rotation::TwoSeventy);
        assert_eq!(Rotation::Ninety.to_string(), "Ninety");
        assert_eq!(ShapeKind::TriangleRight.next(), ShapeKind::Square);
        assert_eq!(ShapeKind::Square.previous(), ShapeKind::TriangleRight);
    }

    #[test]
    fn test_every_kind_and_rotation_builds_convex_polygon() {
        for kind in ShapeKind::ALL {
            let mut rotation = Rotation::Zero;
            for _ in 0..4 {
                let shape = TileShape::new(kind).rotated(rotation);
                let polygon = shape.polygon(Point::new(64.0, 32.0), 32.0, 32.0).unwrap();
                assert_eq!(polygon.vertex_count(), kind.unit_outline().len());
                assert!(polygon.x_min() >= 64.0 && polygon.x_max() <= 96.0);
                assert!(polygon.y_min() >= 32.0 && polygon.y_max() <= 64.0);
                rotation = rotation.next();
            }
        }
    }

    #[test]
    fn test_square_scales_to_tile_size() {
        let polygon = TileShape::new(ShapeKind::Square)
            .polygon(Point::new(10.0, 20.0), 32.0, 16.0)
            .unwrap();
        assert_eq!(polygon.vertices()[2], Point::new(42.0, 36.0));
    }

    #[test]
    fn test_rotation_ninety_moves_ramp() {
        let polygon = TileShape::new(ShapeKind::Triangle30_90_60)
            .rotated(Rotation::Ninety)
            .polygon(Point::new(0.0, 0.0), 1.0, 1.0)
            .unwrap();
        // (1, 0.5) -> (0.5, 1)
        assert_relative_eq!(polygon.vertices()[2].x, 0.5);
        assert_relative_eq!(polygon.vertices()[2].y, 1.0);
    }

    #[test]
    fn test_primary_edges_are_applied() {
        let polygon = TileShape::new(ShapeKind::Square)
            .with_primary_edge(0, AxisDirection::Left)
            .polygon(Point::new(0.0, 0.0), 32.0, 32.0)
            .unwrap();
        assert_eq!(polygon.primary_axes().get(&0), Some(&AxisDirection::Left));
        assert_eq!(polygon.primary_axes().len(), 1);
    }

    #[test]
    fn test_fourth_primary_edge_on_triangle_fails() {
        let result = TileShape::new(ShapeKind::TriangleRight)
            .with_primary_edge(3, AxisDirection::None)
            .polygon(Point::new(0.0, 0.0), 32.0, 32.0);
        assert_eq!(
            result,
            Err(CollisionError::AxisIndexOutOfRange { index: 3, vertex_count: 3 })
        );
    }
}
