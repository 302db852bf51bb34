//! Collidable objects
//!
//! The collision manager only ever sees objects through the [`Collidable`]
//! trait. Objects live in an [`ObjectArena`] owned by the caller; the
//! manager stores [`ObjectKey`]s into it and never owns an object.
//!
//! - [`object`] - Static objects such as tiles and triggers
//! - [`mobile`] - Moving objects that resolve their own overlaps

pub mod object;
pub mod mobile;

pub use object::StaticObject;
pub use mobile::{MobileObject, MobileProfile};

use crate::foundation::math::Point;
use crate::physics::{AxisDirection, CollisionError, ObjectType, ObjectTypes, Polygon, PolygonOverlap};
use slotmap::SlotMap;
use std::any::Any;
use std::fmt;

slotmap::new_key_type! {
    /// Handle to an object stored in an [`ObjectArena`]
    pub struct ObjectKey;
}

/// Caller-owned storage for every collidable object
pub type ObjectArena = SlotMap<ObjectKey, Box<dyn Collidable>>;

/// Stable, caller-assigned object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A collision delivered to the object that initiated the test
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    /// Overlap measured from the receiving object's side
    pub overlap: PolygonOverlap,
    /// Type of the object it collided with
    pub object_type: ObjectType,
}

impl Collision {
    /// True when this collision means the receiver is standing on ground
    ///
    /// The other object must be ground-like and the resolution must push
    /// straight up (positive y, no x component).
    pub fn hit_ground(&self) -> bool {
        if !self.object_type.is_ground() {
            return false;
        }
        self.overlap
            .resolution()
            .is_some_and(|v| v.x == 0.0 && v.y > 0.0)
    }
}

/// Options shared by every concrete object type
#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    /// Unique id
    pub id: u64,
    /// Type tag
    pub object_type: ObjectType,
    /// Hitbox vertices in winding order
    pub vertices: Vec<Point>,
    /// Types this object interacts with; `None` uses the type's defaults
    pub interactions: Option<ObjectTypes>,
}

/// Capability set every collidable object provides
pub trait Collidable {
    /// Stable unique identifier
    fn id(&self) -> ObjectId;

    /// Type tag used for interactivity filtering and ground detection
    fn object_type(&self) -> ObjectType;

    /// Current hitbox
    fn polygon(&self) -> &Polygon;

    /// Whether this object reacts to objects of `other`'s type
    fn is_interactive(&self, other: ObjectType) -> bool;

    /// React to a collision this object initiated
    ///
    /// Implementations that cannot accept the collision return
    /// [`CollisionError::Rejected`]. The manager logs and counts the failure,
    /// and the pair still counts as processed for the tick.
    fn handle_collision(&mut self, collision: &Collision) -> Result<(), CollisionError>;

    /// Clear per-tick state; called once per tick before movement
    fn pre_update(&mut self);

    /// Mark an edge of the hitbox as primary
    fn add_primary_axis_index(
        &mut self,
        index: usize,
        direction: AxisDirection,
    ) -> Result<(), CollisionError>;

    /// Translate the hitbox
    fn move_by(&mut self, dx: f64, dy: f64);

    /// Get as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get as Any for mutable downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Borrow the object behind `key` as its concrete type
pub fn object_as<T: Collidable + 'static>(arena: &ObjectArena, key: ObjectKey) -> Option<&T> {
    arena.get(key)?.as_any().downcast_ref::<T>()
}

/// Mutably borrow the object behind `key` as its concrete type
pub fn object_as_mut<T: Collidable + 'static>(
    arena: &mut ObjectArena,
    key: ObjectKey,
) -> Option<&mut T> {
    arena.get_mut(key)?.as_any_mut().downcast_mut::<T>()
}
