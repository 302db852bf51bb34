//! # Platformer Collision
//!
//! Collision detection and resolution for a 2D side-scrolling engine.
//!
//! ## Features
//!
//! - **Separating Axis Test**: Convex polygon overlap with per-axis results
//! - **Primary Edges**: Bias resolution toward chosen edges (e.g. tile tops)
//! - **Grid Broad Phase**: Fixed world grid with clamped cell lookup
//! - **Mobile Resolution**: Single-axis push-out with grounded detection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platformer_collision::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WorldConfig::default();
//!     let mut manager = CollisionManager::new(&config)?;
//!     let mut arena = ObjectArena::with_key();
//!
//!     let floor = TileShape::new(ShapeKind::Square).with_primary_edge(0, AxisDirection::Left);
//!     let tile = StaticObject::tile(ObjectId(1), &floor, Point::new(0.0, 320.0), 32.0, 32.0)?;
//!     let key = arena.insert(Box::new(tile));
//!     manager.add_object(&arena, key)?;
//!
//!     // Each tick: pre_update, move, then
//!     let report = manager.update(&mut arena);
//!     manager.clean_up(&arena);
//!     println!("{} collisions", report.collisions_handled);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;
pub mod spatial;
pub mod objects;

#[cfg(test)]
mod tests;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{BoundaryConfig, CollisionConfig, Config, ConfigError, WorldConfig},
        foundation::math::{Point, Vector},
        objects::{
            object_as, object_as_mut, Collidable, Collision, MobileObject, MobileProfile,
            ObjectArena, ObjectId, ObjectKey, ObjectOptions, StaticObject,
        },
        physics::{
            AxisDirection, CollisionError, CollisionManager, ObjectType, ObjectTypes, Polygon,
            PolygonOverlap, Rotation, ShapeKind, TileShape, UpdateReport,
        },
    };
}
