//! Physics module for collision detection and response
//!
//! Convex polygon hitboxes tested with the separating axis theorem, a grid
//! broad phase, and object type filtering.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;
mod error;

pub use collision::{
    AxisDirection,
    AxisOverlap,
    Polygon,
    PolygonOverlap,
    Rotation,
    ShapeKind,
    TileShape,
};
pub use collision_layers::{ObjectType, ObjectTypes};
pub use collision_system::{CollisionManager, CollisionPair, UpdateReport};
pub use error::CollisionError;
