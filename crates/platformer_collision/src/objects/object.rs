//! Static collidable objects
//!
//! Tiles, triggers and other objects that never move on their own. They
//! record that a collision happened and forward it to any registered
//! callbacks.

use super::{Collidable, Collision, ObjectId, ObjectOptions};
use crate::foundation::math::Point;
use crate::physics::{AxisDirection, CollisionError, ObjectType, ObjectTypes, Polygon, TileShape};
use std::any::Any;
use std::fmt;

/// Callback invoked when a static object handles a collision
pub type CollisionCallback = Box<dyn FnMut(&Collision)>;

/// A collidable object with no movement logic of its own
pub struct StaticObject {
    id: ObjectId,
    object_type: ObjectType,
    polygon: Polygon,
    interactions: ObjectTypes,
    collided: bool,
    callbacks: Vec<CollisionCallback>,
}

impl StaticObject {
    /// Create an object from options
    pub fn new(options: ObjectOptions) -> Result<Self, CollisionError> {
        let polygon = Polygon::new(options.vertices)?;
        let mut object = Self::from_polygon(ObjectId(options.id), options.object_type, polygon);
        if let Some(interactions) = options.interactions {
            object.interactions = interactions;
        }
        Ok(object)
    }

    /// Create an object around an existing polygon
    pub fn from_polygon(id: ObjectId, object_type: ObjectType, polygon: Polygon) -> Self {
        Self {
            id,
            object_type,
            polygon,
            interactions: object_type.default_interactions(),
            collided: false,
            callbacks: Vec::new(),
        }
    }

    /// Create a tile whose top-left corner is at `position`
    pub fn tile(
        id: ObjectId,
        shape: &TileShape,
        position: Point,
        tile_width: f64,
        tile_height: f64,
    ) -> Result<Self, CollisionError> {
        let polygon = shape.polygon(position, tile_width, tile_height)?;
        Ok(Self::from_polygon(id, ObjectType::Tile, polygon))
    }

    /// Replace the set of types this object interacts with
    #[must_use]
    pub fn with_interactions(mut self, interactions: ObjectTypes) -> Self {
        self.interactions = interactions;
        self
    }

    /// Register a callback run for every handled collision, in registration order
    pub fn register_collision_callback(&mut self, callback: impl FnMut(&Collision) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Whether a collision was handled since the last `pre_update`
    pub fn collided(&self) -> bool {
        self.collided
    }
}

impl fmt::Debug for StaticObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticObject")
            .field("id", &self.id)
            .field("object_type", &self.object_type)
            .field("polygon", &self.polygon)
            .field("interactions", &self.interactions)
            .field("collided", &self.collided)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Collidable for StaticObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn object_type(&self) -> ObjectType {
        self.object_type
    }

    fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    fn is_interactive(&self, other: ObjectType) -> bool {
        self.interactions.contains_type(other)
    }

    fn handle_collision(&mut self, collision: &Collision) -> Result<(), CollisionError> {
        if collision.overlap.is_overlapping() {
            self.collided = true;
        }
        for callback in &mut self.callbacks {
            callback(collision);
        }
        Ok(())
    }

    fn pre_update(&mut self) {
        self.collided = false;
    }

    fn add_primary_axis_index(
        &mut self,
        index: usize,
        direction: AxisDirection,
    ) -> Result<(), CollisionError> {
        self.polygon.add_primary_axis_index(index, direction)
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        self.polygon.move_by(dx, dy);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ShapeKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tile_at(x: f64, y: f64) -> StaticObject {
        StaticObject::tile(ObjectId(1), &TileShape::new(ShapeKind::Square), Point::new(x, y), 32.0, 32.0)
            .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_vertices() {
        let result = StaticObject::new(ObjectOptions::default());
        assert!(matches!(result, Err(CollisionError::InvalidPolygon(_))));
    }

    #[test]
    fn test_interactions_default_by_type_and_override() {
        let tile = tile_at(0.0, 0.0);
        assert!(tile.is_interactive(ObjectType::Player));
        assert!(!tile.is_interactive(ObjectType::Mobile));

        let tile = tile.with_interactions(ObjectTypes::MOBILE);
        assert!(tile.is_interactive(ObjectType::Mobile));
        assert!(!tile.is_interactive(ObjectType::Player));

        let options = ObjectOptions {
            id: 7,
            object_type: ObjectType::Object,
            vertices: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            interactions: Some(ObjectTypes::PLAYER),
        };
        let object = StaticObject::new(options).unwrap();
        assert_eq!(object.id(), ObjectId(7));
        assert!(object.is_interactive(ObjectType::Player));
    }

    #[test]
    fn test_handle_collision_sets_flag_and_runs_callbacks() {
        let mut tile = tile_at(0.0, 0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&seen);
        tile.register_collision_callback(move |c| first.borrow_mut().push(("first", c.object_type)));
        let second = Rc::clone(&seen);
        tile.register_collision_callback(move |c| second.borrow_mut().push(("second", c.object_type)));

        let player = Polygon::rectangle(10.0, 10.0, 8.0, 8.0).unwrap();
        let collision = Collision {
            overlap: tile.polygon().get_overlap(&player),
            object_type: ObjectType::Player,
        };
        tile.handle_collision(&collision).unwrap();

        assert!(tile.collided());
        assert_eq!(
            *seen.borrow(),
            vec![("first", ObjectType::Player), ("second", ObjectType::Player)]
        );

        tile.pre_update();
        assert!(!tile.collided());
    }

    #[test]
    fn test_move_and_primary_axis_delegate_to_polygon() {
        let mut tile = tile_at(0.0, 0.0);
        tile.move_by(4.0, -2.0);
        assert_eq!(tile.polygon().x_min(), 4.0);
        assert_eq!(tile.polygon().y_min(), -2.0);
        assert!(tile.add_primary_axis_index(0, AxisDirection::Left).is_ok());
        assert!(tile.add_primary_axis_index(4, AxisDirection::Left).is_err());
    }
}
