//! Collision error types

use crate::objects::ObjectId;
use thiserror::Error;

/// Errors raised by the collision core
///
/// Configuration and programmer errors (`InvalidConfig`, `AxisIndexOutOfRange`,
/// `InvalidPolygon`, registration errors) are fatal to setup. Errors returned
/// from a `handle_collision` call are logged by the manager and the tick
/// carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// World boundary or grid cell configuration is unusable
    #[error("Invalid collision config: {0}")]
    InvalidConfig(String),

    /// Primary axis index does not name an edge of the polygon
    #[error("Axis index {index} out of range for polygon with {vertex_count} vertices")]
    AxisIndexOutOfRange {
        /// Requested edge index
        index: usize,
        /// Number of vertices (and edges) in the polygon
        vertex_count: usize,
    },

    /// Polygon failed construction checks
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    /// The key does not resolve to an object in the arena
    #[error("Object key does not resolve to a live object")]
    UnknownObject,

    /// An object with this id is already registered
    #[error("Object {0} is already registered")]
    DuplicateObject(ObjectId),

    /// Movement profile lookup failed
    #[error("Mobile profile {0} not found")]
    ProfileNotFound(u8),

    /// A collidable refused to handle a collision
    ///
    /// Returned from custom `Collidable::handle_collision` implementations;
    /// the built-in objects never produce it.
    #[error("Collision rejected: {0}")]
    Rejected(String),
}
