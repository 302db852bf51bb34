//! Object type tags and type sets for filtering collision tests
//!
//! Every collidable carries one [`ObjectType`]. Sets of types ([`ObjectTypes`])
//! decide which objects start collision tests and which pairs are allowed to
//! interact at all.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Type tag of a collidable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ObjectType {
    /// Plain object with no special role
    #[default]
    Object,
    /// Level geometry
    Tile,
    /// Static decorated object (also counts as ground)
    Sprite,
    /// Moving non-player object
    Mobile,
    /// The player
    Player,
}

impl ObjectType {
    /// Single-type set
    pub fn as_set(self) -> ObjectTypes {
        match self {
            Self::Object => ObjectTypes::OBJECT,
            Self::Tile => ObjectTypes::TILE,
            Self::Sprite => ObjectTypes::SPRITE,
            Self::Mobile => ObjectTypes::MOBILE,
            Self::Player => ObjectTypes::PLAYER,
        }
    }

    /// Types this type interacts with unless overridden
    ///
    /// Players collide with tiles and tiles with players; everything else
    /// starts out inert.
    pub fn default_interactions(self) -> ObjectTypes {
        match self {
            Self::Player => ObjectTypes::TILE,
            Self::Tile => ObjectTypes::PLAYER,
            _ => ObjectTypes::empty(),
        }
    }

    /// Whether standing on this type makes a mobile grounded
    pub fn is_ground(self) -> bool {
        ObjectTypes::GROUND.contains(self.as_set())
    }
}

bitflags! {
    /// A set of [`ObjectType`]s
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectTypes: u16 {
        /// [`ObjectType::Object`]
        const OBJECT = 1 << 0;
        /// [`ObjectType::Tile`]
        const TILE = 1 << 1;
        /// [`ObjectType::Sprite`]
        const SPRITE = 1 << 2;
        /// [`ObjectType::Mobile`]
        const MOBILE = 1 << 3;
        /// [`ObjectType::Player`]
        const PLAYER = 1 << 4;

        /// Types a mobile can stand on
        const GROUND = Self::TILE.bits() | Self::SPRITE.bits();
    }
}

impl ObjectTypes {
    /// Whether `object_type` is in the set
    pub fn contains_type(self, object_type: ObjectType) -> bool {
        self.contains(object_type.as_set())
    }
}

impl From<ObjectType> for ObjectTypes {
    fn from(object_type: ObjectType) -> Self {
        object_type.as_set()
    }
}

impl FromIterator<ObjectType> for ObjectTypes {
    fn from_iter<I: IntoIterator<Item = ObjectType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, t| acc | t.as_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interactions_are_mutual() {
        assert!(ObjectType::Player.default_interactions().contains_type(ObjectType::Tile));
        assert!(ObjectType::Tile.default_interactions().contains_type(ObjectType::Player));
        assert!(!ObjectType::Tile.default_interactions().contains_type(ObjectType::Tile));
        assert!(ObjectType::Object.default_interactions().is_empty());
    }

    #[test]
    fn test_ground_types() {
        assert!(ObjectType::Tile.is_ground());
        assert!(ObjectType::Sprite.is_ground());
        assert!(!ObjectType::Player.is_ground());
        assert!(!ObjectType::Mobile.is_ground());
    }

    #[test]
    fn test_set_from_types() {
        let set: ObjectTypes = [ObjectType::Player, ObjectType::Mobile].into_iter().collect();
        assert_eq!(set, ObjectTypes::PLAYER | ObjectTypes::MOBILE);
        assert!(set.contains_type(ObjectType::Mobile));
        assert!(!set.contains_type(ObjectType::Tile));
        assert_eq!(ObjectTypes::from(ObjectType::Tile), ObjectTypes::TILE);
    }
}
