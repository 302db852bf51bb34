//! Overlap results produced by the separating axis test
//!
//! An [`AxisOverlap`] describes how far two projected intervals interpenetrate
//! along one axis; a [`PolygonOverlap`] aggregates every axis tested for a
//! pair and tracks which axis resolution should use.

use crate::foundation::math::Vector;
use std::fmt;

/// Which signed distance a primary axis reports as its resolution distance
///
/// Distances are measured for the polygon running the test (`self` in
/// [`Polygon::get_overlap`](super::Polygon::get_overlap)). Resolution moves
/// that polygon by `-axis * distance`, so `Left` pushes it toward the
/// negative end of the axis and `Right` toward the positive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisDirection {
    /// No bias: use whichever side has the smaller magnitude
    #[default]
    None,
    /// Always report the left distance
    Left,
    /// Always report the right distance
    Right,
}

/// Overlap of two polygons projected onto a single axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOverlap {
    /// The unit axis the polygons were projected onto
    pub axis: Vector,
    /// `a_max - b_min`: penetration with `self` on the low side (>= 0)
    pub left_distance: f64,
    /// `-(b_max - a_min)`: penetration with `self` on the high side (<= 0)
    pub right_distance: f64,
    /// Whether the edge that produced this axis is marked primary
    pub is_primary: bool,
    /// Direction bias of the primary edge
    pub primary_direction: AxisDirection,
}

impl AxisOverlap {
    /// Create a non-primary axis overlap
    pub fn new(axis: Vector, left_distance: f64, right_distance: f64) -> Self {
        Self {
            axis,
            left_distance,
            right_distance,
            is_primary: false,
            primary_direction: AxisDirection::None,
        }
    }

    /// Mark this overlap as coming from a primary edge
    #[must_use]
    pub fn with_primary(mut self, direction: AxisDirection) -> Self {
        self.is_primary = true;
        self.primary_direction = direction;
        self
    }

    /// Magnitude of the left distance
    pub fn left_magnitude(&self) -> f64 {
        self.left_distance.abs()
    }

    /// Magnitude of the right distance
    pub fn right_magnitude(&self) -> f64 {
        self.right_distance.abs()
    }

    /// The smaller of the two magnitudes
    pub fn min_magnitude(&self) -> f64 {
        self.left_magnitude().min(self.right_magnitude())
    }

    /// The larger of the two magnitudes
    pub fn max_magnitude(&self) -> f64 {
        self.left_magnitude().max(self.right_magnitude())
    }

    /// Signed distance with the smaller magnitude (left wins only when strictly smaller)
    pub fn min_distance(&self) -> f64 {
        if self.left_magnitude() < self.right_magnitude() {
            self.left_distance
        } else {
            self.right_distance
        }
    }

    /// Signed distance with the larger magnitude
    pub fn max_distance(&self) -> f64 {
        if self.left_magnitude() > self.right_magnitude() {
            self.left_distance
        } else {
            self.right_distance
        }
    }

    /// Signed distance selected by the primary direction
    pub fn primary_distance(&self) -> f64 {
        match self.primary_direction {
            AxisDirection::Left => self.left_distance,
            AxisDirection::Right => self.right_distance,
            AxisDirection::None => self.min_distance(),
        }
    }

    /// Magnitude of [`primary_distance`](Self::primary_distance)
    pub fn primary_magnitude(&self) -> f64 {
        self.primary_distance().abs()
    }

    /// `axis * left_distance`
    pub fn left_overlap(&self) -> Vector {
        self.axis * self.left_distance
    }

    /// `axis * right_distance`
    pub fn right_overlap(&self) -> Vector {
        self.axis * self.right_distance
    }

    /// `axis * min_distance`
    pub fn min_overlap(&self) -> Vector {
        self.axis * self.min_distance()
    }

    /// `axis * max_distance`
    pub fn max_overlap(&self) -> Vector {
        self.axis * self.max_distance()
    }

    /// `axis * primary_distance`
    pub fn primary_overlap(&self) -> Vector {
        self.axis * self.primary_distance()
    }
}

impl fmt::Display for AxisOverlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.min_overlap();
        let max = self.max_overlap();
        writeln!(f, "is_primary: {}", self.is_primary)?;
        writeln!(f, "axis: x: {:.6}, y: {:.6}", self.axis.x, self.axis.y)?;
        writeln!(f, "min_magnitude: {:.6}", self.min_magnitude())?;
        writeln!(f, "min_overlap: x: {:.6}, y: {:.6}", min.x, min.y)?;
        writeln!(f, "max_magnitude: {:.6}", self.max_magnitude())?;
        writeln!(f, "max_overlap: x: {:.6}, y: {:.6}", max.x, max.y)
    }
}

/// Aggregate overlap of two polygons across every tested axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonOverlap {
    overlap: bool,
    has_primary: bool,
    min_overlap_index: Option<usize>,
    min_primary_overlap_index: Option<usize>,
    axis_overlaps: Vec<AxisOverlap>,
    axes_tested: usize,
}

impl PolygonOverlap {
    /// True only if every axis of both polygons overlapped
    pub fn is_overlapping(&self) -> bool {
        self.overlap
    }

    /// True if at least one primary axis was recorded
    pub fn has_primary(&self) -> bool {
        self.has_primary
    }

    /// Index of the smallest-magnitude axis
    pub fn min_overlap_index(&self) -> Option<usize> {
        self.min_overlap_index
    }

    /// Index of the smallest-magnitude primary axis
    pub fn min_primary_overlap_index(&self) -> Option<usize> {
        self.min_primary_overlap_index
    }

    /// All recorded axis overlaps, in test order
    pub fn axis_overlaps(&self) -> &[AxisOverlap] {
        &self.axis_overlaps
    }

    /// Number of axes evaluated, including a separating one
    pub fn axes_tested(&self) -> usize {
        self.axes_tested
    }

    /// Record one axis overlap and update both tie-break indices
    ///
    /// Comparisons are strict, so the first axis seen wins a tie.
    pub fn add_axis_overlap(&mut self, axis_overlap: AxisOverlap) {
        let index = self.axis_overlaps.len();
        if axis_overlap.is_primary {
            let beats_primary = self
                .min_primary_overlap()
                .map_or(true, |current| current.primary_magnitude() > axis_overlap.primary_magnitude());
            if beats_primary {
                self.has_primary = true;
                self.min_primary_overlap_index = Some(index);
            }
        }
        let beats_min = self
            .min_overlap()
            .map_or(true, |current| current.min_magnitude() > axis_overlap.min_magnitude());
        if beats_min {
            self.min_overlap_index = Some(index);
        }
        self.axis_overlaps.push(axis_overlap);
    }

    pub(crate) fn record_axis_tested(&mut self) {
        self.axes_tested += 1;
    }

    pub(crate) fn mark_overlapping(&mut self) {
        self.overlap = true;
    }

    /// The smallest-magnitude axis overlap
    pub fn min_overlap(&self) -> Option<&AxisOverlap> {
        self.min_overlap_index.map(|i| &self.axis_overlaps[i])
    }

    /// The smallest-magnitude primary axis overlap
    pub fn min_primary_overlap(&self) -> Option<&AxisOverlap> {
        self.min_primary_overlap_index.map(|i| &self.axis_overlaps[i])
    }

    /// Signed distance of the smallest-magnitude axis
    pub fn min_overlap_distance(&self) -> Option<f64> {
        self.min_overlap().map(AxisOverlap::min_distance)
    }

    /// Magnitude of the smallest-magnitude axis
    pub fn min_overlap_magnitude(&self) -> Option<f64> {
        self.min_overlap().map(AxisOverlap::min_magnitude)
    }

    /// Overlap vector of the smallest-magnitude axis
    pub fn min_overlap_vector(&self) -> Option<Vector> {
        self.min_overlap().map(AxisOverlap::min_overlap)
    }

    /// Signed primary distance of the smallest-magnitude primary axis
    pub fn min_primary_overlap_distance(&self) -> Option<f64> {
        self.min_primary_overlap().map(AxisOverlap::primary_distance)
    }

    /// Primary magnitude of the smallest-magnitude primary axis
    pub fn min_primary_overlap_magnitude(&self) -> Option<f64> {
        self.min_primary_overlap().map(AxisOverlap::primary_magnitude)
    }

    /// Primary overlap vector of the smallest-magnitude primary axis
    pub fn min_primary_overlap_vector(&self) -> Option<Vector> {
        self.min_primary_overlap().map(AxisOverlap::primary_overlap)
    }

    /// The vector to push `self` out by (negated by the caller)
    ///
    /// Primary axes take precedence over the global minimum. `None` when the
    /// polygons do not overlap.
    pub fn resolution(&self) -> Option<Vector> {
        if !self.overlap {
            return None;
        }
        if self.has_primary {
            self.min_primary_overlap_vector()
        } else {
            self.min_overlap_vector()
        }
    }
}

impl fmt::Display for PolygonOverlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "overlap: {}", self.overlap)?;
        writeln!(f, "has_primary: {}", self.has_primary)?;
        writeln!(f, "min_overlap_index: {:?}", self.min_overlap_index)?;
        writeln!(f, "min_primary_overlap_index: {:?}", self.min_primary_overlap_index)?;
        writeln!(f, "axes_tested: {}", self.axes_tested)?;
        if let Some(distance) = self.min_overlap_distance() {
            writeln!(f, "min_overlap_distance: {distance:.6}")?;
        }
        if let Some(primary) = self.min_primary_overlap() {
            let v = primary.primary_overlap();
            writeln!(f, "min_primary_overlap_distance: {:.6}", primary.primary_distance())?;
            writeln!(f, "min_primary_overlap: x: {:.6}, y: {:.6}", v.x, v.y)?;
            writeln!(f, "min_primary_axis_direction: {:?}", primary.primary_direction)?;
        }
        for (index, axis_overlap) in self.axis_overlaps.iter().enumerate() {
            writeln!(f, "axis_index: {index}")?;
            write!(f, "{axis_overlap}")?;
        }
        Ok(())
    }
}
