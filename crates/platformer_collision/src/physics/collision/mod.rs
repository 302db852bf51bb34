//! Narrow-phase collision geometry
//!
//! # Module Organization
//!
//! - [`polygon`] - Convex polygon hitboxes and the separating axis test
//! - [`overlap`] - Per-axis and aggregate overlap results
//! - [`shape`] - Standard tile outlines used to build level hitboxes
//!
//! # Key Types
//!
//! - [`Polygon`] - Convex hitbox owned by every collidable object
//! - [`PolygonOverlap`] - Result of testing two polygons, including which
//!   axis resolution should use
//! - [`TileShape`] - Square/triangle tile outline with rotation and primary edges

pub mod polygon;
pub mod overlap;
pub mod shape;

// Re-export commonly used types
pub use polygon::Polygon;
pub use overlap::{AxisDirection, AxisOverlap, PolygonOverlap};
pub use shape::{Rotation, ShapeKind, TileShape};
