//! Convex polygon hitboxes and the separating axis test
//!
//! Polygons are validated as convex when they are built. The indices of the
//! extreme vertices are computed once; since a polygon only ever translates,
//! those indices stay valid and the extent accessors always read the live
//! vertex positions.

use super::overlap::{AxisDirection, AxisOverlap, PolygonOverlap};
use crate::foundation::math::{Point, Vector, VectorExt};
use crate::physics::CollisionError;
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::fmt;

const WINDING_TOLERANCE: f64 = 1e-6;

/// A convex polygon used as a hitbox
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    x_min_index: usize,
    x_max_index: usize,
    y_min_index: usize,
    y_max_index: usize,
    /// Edge index -> direction bias for edges whose axes are preferred
    /// during resolution
    primary_axes: BTreeMap<usize, AxisDirection>,
}

impl Polygon {
    /// Build a polygon from its vertices in winding order
    ///
    /// Either winding is accepted, but it must be consistent and the outline
    /// must be convex and non-degenerate.
    pub fn new(vertices: Vec<Point>) -> Result<Self, CollisionError> {
        validate_convex(&vertices)?;

        let mut polygon = Self {
            vertices,
            x_min_index: 0,
            x_max_index: 0,
            y_min_index: 0,
            y_max_index: 0,
            primary_axes: BTreeMap::new(),
        };
        for (i, p) in polygon.vertices.iter().enumerate() {
            if p.x < polygon.vertices[polygon.x_min_index].x {
                polygon.x_min_index = i;
            }
            if p.x > polygon.vertices[polygon.x_max_index].x {
                polygon.x_max_index = i;
            }
            if p.y < polygon.vertices[polygon.y_min_index].y {
                polygon.y_min_index = i;
            }
            if p.y > polygon.vertices[polygon.y_max_index].y {
                polygon.y_max_index = i;
            }
        }
        Ok(polygon)
    }

    /// Axis-aligned rectangle with its top-left corner at `(x, y)`
    ///
    /// Vertices run top-left, top-right, bottom-right, bottom-left, so edge 0
    /// is the top edge, 1 the right, 2 the bottom and 3 the left.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self, CollisionError> {
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Vertices in winding order
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices (and edges)
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Smallest x of any vertex
    pub fn x_min(&self) -> f64 {
        self.vertices[self.x_min_index].x
    }

    /// Largest x of any vertex
    pub fn x_max(&self) -> f64 {
        self.vertices[self.x_max_index].x
    }

    /// Smallest y of any vertex
    pub fn y_min(&self) -> f64 {
        self.vertices[self.y_min_index].y
    }

    /// Largest y of any vertex
    pub fn y_max(&self) -> f64 {
        self.vertices[self.y_max_index].y
    }

    /// `floor(x_min())`
    pub fn x_min_floor(&self) -> i64 {
        self.x_min().floor() as i64
    }

    /// `floor(x_max())`
    pub fn x_max_floor(&self) -> i64 {
        self.x_max().floor() as i64
    }

    /// `floor(y_min())`
    pub fn y_min_floor(&self) -> i64 {
        self.y_min().floor() as i64
    }

    /// `floor(y_max())`
    pub fn y_max_floor(&self) -> i64 {
        self.y_max().floor() as i64
    }

    /// Edge index -> direction for every primary edge
    pub fn primary_axes(&self) -> &BTreeMap<usize, AxisDirection> {
        &self.primary_axes
    }

    /// Candidate separating axes: one unit normal per edge, in edge order
    pub fn axes(&self) -> Vec<Vector> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let edge = self.vertices[(i + 1) % n] - self.vertices[i];
                edge.normalize().orthogonal()
            })
            .collect()
    }

    /// Project both polygons onto `axis`
    ///
    /// Returns `None` when the projections are disjoint, which proves the
    /// polygons do not collide. Touching intervals count as overlapping.
    pub fn overlap_on_axis(&self, other: &Polygon, axis: &Vector) -> Option<AxisOverlap> {
        let (a_min, a_max) = project(&self.vertices, axis);
        let (b_min, b_max) = project(&other.vertices, axis);

        if a_max < b_min || b_max < a_min {
            return None;
        }
        Some(AxisOverlap::new(*axis, a_max - b_min, -(b_max - a_min)))
    }

    /// Separating axis test against `other`
    ///
    /// Tests this polygon's axes, then `other`'s, stopping at the first
    /// separating axis. Each axis is flagged primary according to the
    /// polygon owning the edge it came from.
    pub fn get_overlap(&self, other: &Polygon) -> PolygonOverlap {
        let mut result = PolygonOverlap::default();
        for owner in [self, other] {
            for (edge_index, axis) in owner.axes().iter().enumerate() {
                result.record_axis_tested();
                let Some(mut axis_overlap) = self.overlap_on_axis(other, axis) else {
                    return result;
                };
                if let Some(direction) = owner.primary_axes.get(&edge_index) {
                    axis_overlap = axis_overlap.with_primary(*direction);
                }
                result.add_axis_overlap(axis_overlap);
            }
        }
        result.mark_overlapping();
        result
    }

    /// Mark the axis of edge `index` as primary
    pub fn add_primary_axis_index(
        &mut self,
        index: usize,
        direction: AxisDirection,
    ) -> Result<(), CollisionError> {
        if index >= self.vertices.len() {
            return Err(CollisionError::AxisIndexOutOfRange {
                index,
                vertex_count: self.vertices.len(),
            });
        }
        self.primary_axes.insert(index, direction);
        Ok(())
    }

    /// Translate every vertex by `(dx, dy)`
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        let offset = Vector::new(dx, dy);
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Overwrite the vertices with a previously saved outline of the same length
    ///
    /// Primary markers and cached extreme indices are kept.
    pub(crate) fn restore_vertices(&mut self, vertices: &[Point]) {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        self.vertices.copy_from_slice(vertices);
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertices: [")?;
        for (i, p) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{x: {:.6}, y: {:.6}}}", p.x, p.y)?;
        }
        write!(f, "]")
    }
}

fn project(vertices: &[Point], axis: &Vector) -> (f64, f64) {
    vertices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
        let projection = axis.dot_point(p);
        (min.min(projection), max.max(projection))
    })
}

fn validate_convex(vertices: &[Point]) -> Result<(), CollisionError> {
    let n = vertices.len();
    if n < 3 {
        return Err(CollisionError::InvalidPolygon(format!(
            "need at least 3 vertices, got {n}"
        )));
    }
    if let Some(p) = vertices.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(CollisionError::InvalidPolygon(format!(
            "non-finite vertex ({}, {})",
            p.x, p.y
        )));
    }

    let edges: Vec<Vector> = (0..n).map(|i| vertices[(i + 1) % n] - vertices[i]).collect();
    if let Some(i) = edges.iter().position(|e| e.norm_squared() == 0.0) {
        return Err(CollisionError::InvalidPolygon(format!("edge {i} has zero length")));
    }

    // Every turn must bend the same way and the outline must wind exactly once
    let mut turn_sign = 0.0_f64;
    let mut total_turn = 0.0_f64;
    for i in 0..n {
        let current = &edges[i];
        let next = &edges[(i + 1) % n];
        let cross = current.perp_dot(next);
        if cross != 0.0 {
            if turn_sign != 0.0 && cross.signum() != turn_sign {
                return Err(CollisionError::InvalidPolygon(format!(
                    "not convex or inconsistently wound at vertex {}",
                    (i + 1) % n
                )));
            }
            turn_sign = cross.signum();
        }
        total_turn += cross.atan2(current.dot(next));
    }
    if turn_sign == 0.0 {
        return Err(CollisionError::InvalidPolygon("vertices are collinear".to_string()));
    }
    if (total_turn.abs() - TAU).abs() > WINDING_TOLERANCE {
        return Err(CollisionError::InvalidPolygon("outline is self-intersecting".to_string()));
    }
    Ok(())
}
