//! Spatial partitioning
//!
//! A uniform grid that maps polygons to the collision areas their bounding
//! boxes touch.

mod grid;

pub use grid::{AreaGrid, CollisionArea, MAX_AREAS};
