//! Mobile objects
//!
//! A mobile moves under its active [`MobileProfile`] and resolves its own
//! overlaps: when the collision manager reports a collision, the mobile is
//! pushed straight out along a single axis and its vertical velocity is
//! cancelled. Horizontal velocity is left alone so the mobile can slide.

use super::{Collidable, Collision, ObjectId, ObjectOptions};
use crate::foundation::math::{utils, Point, Vector};
use crate::physics::{AxisDirection, CollisionError, ObjectType, ObjectTypes, Polygon};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

/// Acceleration and speed limits for one movement mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileProfile {
    /// Profile id
    pub id: u8,
    /// Velocity gained per tick per unit of x input
    pub accelerate_x: f64,
    /// Velocity gained per tick per unit of y input
    pub accelerate_y: f64,
    /// Velocity lost per tick on x without input
    pub decelerate_x: f64,
    /// Velocity lost per tick on y without input
    pub decelerate_y: f64,
    /// Speed cap on x
    pub velocity_max_x: f64,
    /// Speed cap on y
    pub velocity_max_y: f64,
    /// Speed on x when movement begins from rest
    pub velocity_start_x: f64,
    /// Speed on y when movement begins from rest
    pub velocity_start_y: f64,
    /// Treat missing y input as falling
    pub gravity: bool,
}

impl Default for MobileProfile {
    fn default() -> Self {
        Self {
            id: 0,
            accelerate_x: 0.0,
            accelerate_y: 0.0,
            decelerate_x: 0.0,
            decelerate_y: 0.0,
            velocity_max_x: 0.0,
            velocity_max_y: 0.0,
            velocity_start_x: 0.0,
            velocity_start_y: 0.0,
            gravity: true,
        }
    }
}

/// A collidable that moves and resolves its own collisions
#[derive(Debug, Clone)]
pub struct MobileObject {
    id: ObjectId,
    object_type: ObjectType,
    polygon: Polygon,
    start_vertices: Vec<Point>,
    interactions: ObjectTypes,
    velocity: Vector,
    collided: bool,
    grounded: bool,
    profiles: BTreeMap<u8, MobileProfile>,
    active_profile_id: Option<u8>,
}

impl MobileObject {
    /// Create a mobile from options
    pub fn new(options: ObjectOptions) -> Result<Self, CollisionError> {
        let polygon = Polygon::new(options.vertices)?;
        let mut mobile = Self::from_polygon(ObjectId(options.id), options.object_type, polygon);
        if let Some(interactions) = options.interactions {
            mobile.interactions = interactions;
        }
        Ok(mobile)
    }

    /// Create a mobile around an existing polygon, which becomes its start position
    pub fn from_polygon(id: ObjectId, object_type: ObjectType, polygon: Polygon) -> Self {
        Self {
            id,
            object_type,
            start_vertices: polygon.vertices().to_vec(),
            polygon,
            interactions: object_type.default_interactions(),
            velocity: Vector::zeros(),
            collided: false,
            grounded: false,
            profiles: BTreeMap::new(),
            active_profile_id: None,
        }
    }

    /// Replace the set of types this mobile interacts with
    #[must_use]
    pub fn with_interactions(mut self, interactions: ObjectTypes) -> Self {
        self.interactions = interactions;
        self
    }

    /// Current velocity
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    /// Horizontal velocity
    pub fn velocity_x(&self) -> f64 {
        self.velocity.x
    }

    /// Set horizontal velocity
    pub fn set_velocity_x(&mut self, velocity: f64) {
        self.velocity.x = velocity;
    }

    /// Vertical velocity
    pub fn velocity_y(&self) -> f64 {
        self.velocity.y
    }

    /// Set vertical velocity
    pub fn set_velocity_y(&mut self, velocity: f64) {
        self.velocity.y = velocity;
    }

    /// Whether the mobile landed on ground this tick
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Override the grounded flag
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Whether a collision was handled this tick
    pub fn collided(&self) -> bool {
        self.collided
    }

    /// Look up a profile by id
    pub fn profile(&self, id: u8) -> Option<&MobileProfile> {
        self.profiles.get(&id)
    }

    /// Add a profile, replacing any with the same id
    pub fn add_profile(&mut self, profile: MobileProfile) {
        self.profiles.insert(profile.id, profile);
    }

    /// Remove a profile
    ///
    /// Removing the active profile leaves the mobile without one.
    pub fn remove_profile(&mut self, id: u8) -> Result<MobileProfile, CollisionError> {
        let profile = self.profiles.remove(&id).ok_or(CollisionError::ProfileNotFound(id))?;
        if self.active_profile_id == Some(id) {
            self.active_profile_id = None;
        }
        Ok(profile)
    }

    /// Make a stored profile the active one
    pub fn set_active_profile(&mut self, id: u8) -> Result<(), CollisionError> {
        if !self.profiles.contains_key(&id) {
            return Err(CollisionError::ProfileNotFound(id));
        }
        self.active_profile_id = Some(id);
        Ok(())
    }

    /// The active profile, if any
    pub fn active_profile(&self) -> Option<&MobileProfile> {
        self.active_profile_id.and_then(|id| self.profiles.get(&id))
    }

    /// Accelerate from input under the active profile, then move by the new velocity
    ///
    /// Inputs are usually -1, 0 or 1 per axis.
    pub fn move_with_profile(&mut self, input_x: f64, input_y: f64) -> Result<(), CollisionError> {
        let profile = self
            .active_profile()
            .ok_or(CollisionError::ProfileNotFound(self.active_profile_id.unwrap_or_default()))?;

        let input_y = if profile.gravity && input_y == 0.0 { 1.0 } else { input_y };
        let velocity_x = accelerate(
            self.velocity.x,
            input_x,
            profile.accelerate_x,
            profile.decelerate_x,
            profile.velocity_max_x,
            profile.velocity_start_x,
        );
        let velocity_y = accelerate(
            self.velocity.y,
            input_y,
            profile.accelerate_y,
            profile.decelerate_y,
            profile.velocity_max_y,
            profile.velocity_start_y,
        );

        self.velocity = Vector::new(velocity_x, velocity_y);
        self.polygon.move_by(velocity_x, velocity_y);
        Ok(())
    }

    /// Return to the start position and clear velocity and per-tick flags
    pub fn reset(&mut self) {
        self.polygon.restore_vertices(&self.start_vertices);
        self.velocity = Vector::zeros();
        self.collided = false;
        self.grounded = false;
    }
}

fn accelerate(velocity: f64, input: f64, acceleration: f64, deceleration: f64, max: f64, start: f64) -> f64 {
    if input == 0.0 {
        return utils::approach_zero(velocity, deceleration);
    }
    let base = if velocity == 0.0 { start * input.signum() } else { velocity };
    utils::clamp(base + acceleration * input, -max, max)
}

impl Collidable for MobileObject {
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
        self.collided = true;

        if collision.hit_ground() {
            self.grounded = true;
        }

        let Some(resolution) = collision.overlap.resolution() else {
            return Ok(());
        };
        log::trace!(
            "Mobile {} resolving against {:?} by ({:.4}, {:.4})",
            self.id,
            collision.object_type,
            -resolution.x,
            -resolution.y
        );
        self.polygon.move_by(-resolution.x, -resolution.y);

        if resolution.y != 0.0 {
            self.velocity.y = 0.0;
        }
        Ok(())
    }

    fn pre_update(&mut self) {
        self.collided = false;
        self.grounded = false;
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
