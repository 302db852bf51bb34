//! Grid-partitioned collision manager
//!
//! The manager runs a broad phase over a uniform [`AreaGrid`] and a narrow
//! phase with the separating axis test. Only objects whose type is in the
//! configured initiating set start tests, and only the initiating side of a
//! pair is told about the collision.
//!
//! Objects are owned by the caller's [`ObjectArena`]; the manager keeps
//! [`ObjectKey`]s and its own membership maps, and borrows the arena for the
//! duration of each call.

use crate::config::WorldConfig;
use crate::objects::{Collision, ObjectArena, ObjectId, ObjectKey};
use crate::physics::collision_layers::ObjectTypes;
use crate::physics::CollisionError;
use crate::spatial::{AreaGrid, CollisionArea};
use std::collections::{BTreeMap, BTreeSet};

/// Unordered pair of object ids (smaller id stored first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller id
    pub first: ObjectId,
    /// Larger id
    pub second: ObjectId,
}

impl CollisionPair {
    /// Create a pair; `(a, b)` and `(b, a)` produce the same value
    pub fn new(a: ObjectId, b: ObjectId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Cantor-style integer key for the pair
    ///
    /// Wraps on overflow, so distinct pairs of very large ids may share a key.
    pub fn hash_key(&self) -> u64 {
        let (a, b) = (self.first.0, self.second.0);
        let sum = a.wrapping_add(b);
        let triangle = if sum % 2 == 0 {
            (sum / 2).wrapping_mul(sum.wrapping_add(1))
        } else {
            sum.wrapping_mul(sum.wrapping_add(1) / 2)
        };
        triangle.wrapping_add(a)
    }
}

/// Counters from one [`CollisionManager::update`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Narrow-phase tests run
    pub pairs_tested: usize,
    /// Overlaps delivered to `handle_collision`
    pub collisions_handled: usize,
    /// `handle_collision` calls that returned an error
    pub failures: usize,
}

/// Broad and narrow phase collision detection over a fixed grid
#[derive(Debug)]
pub struct CollisionManager {
    grid: AreaGrid,
    initiating_types: ObjectTypes,
    object_keys: BTreeMap<ObjectId, ObjectKey>,
    object_areas: BTreeMap<ObjectId, BTreeSet<usize>>,
    area_objects: Vec<BTreeSet<ObjectId>>,
    processed_pairs: BTreeSet<CollisionPair>,
}

impl CollisionManager {
    /// Build the grid described by `config`
    pub fn new(config: &WorldConfig) -> Result<Self, CollisionError> {
        let grid = AreaGrid::new(config)?;
        let area_objects = vec![BTreeSet::new(); grid.areas().len()];
        Ok(Self {
            grid,
            initiating_types: config.collisions.initiating_set(),
            object_keys: BTreeMap::new(),
            object_areas: BTreeMap::new(),
            area_objects,
            processed_pairs: BTreeSet::new(),
        })
    }

    /// Register the object behind `key` in every area its polygon covers
    pub fn add_object(&mut self, arena: &ObjectArena, key: ObjectKey) -> Result<(), CollisionError> {
        let object = arena.get(key).ok_or(CollisionError::UnknownObject)?;
        let id = object.id();
        if self.object_keys.contains_key(&id) {
            return Err(CollisionError::DuplicateObject(id));
        }

        let area_ids = self.grid.collision_area_ids(object.polygon());
        for &area_id in &area_ids {
            self.area_objects[area_id].insert(id);
        }
        log::debug!("Registered object {} in areas {:?}", id, area_ids);

        self.object_keys.insert(id, key);
        self.object_areas.insert(id, area_ids);
        Ok(())
    }

    /// Run one tick of collision detection
    ///
    /// Each initiating object is tested against every other member of the
    /// areas it currently covers. A pair is tested at most once per tick;
    /// errors from `handle_collision` are logged and counted, never returned.
    pub fn update(&mut self, arena: &mut ObjectArena) -> UpdateReport {
        self.processed_pairs.clear();
        let mut report = UpdateReport::default();

        for (&id, &key) in &self.object_keys {
            let Some(object) = arena.get(key) else {
                log::warn!("Skipping stale object {}: key no longer in arena", id);
                continue;
            };
            if !self.initiating_types.contains_type(object.object_type()) {
                continue;
            }

            let area_ids = self.grid.collision_area_ids(object.polygon());
            for area_id in area_ids {
                for &other_id in &self.area_objects[area_id] {
                    if other_id == id {
                        continue;
                    }
                    let pair = CollisionPair::new(id, other_id);
                    if self.processed_pairs.contains(&pair) {
                        continue;
                    }
                    let Some(&other_key) = self.object_keys.get(&other_id) else {
                        continue;
                    };
                    let (Some(object), Some(other)) = (arena.get(key), arena.get(other_key)) else {
                        log::warn!("Skipping stale object {}: key no longer in arena", other_id);
                        continue;
                    };

                    let other_type = other.object_type();
                    if !object.is_interactive(other_type) {
                        continue;
                    }

                    let overlap = object.polygon().get_overlap(other.polygon());
                    report.pairs_tested += 1;
                    log::trace!(
                        "Pair {} / {}: overlapping = {} after {} axes",
                        id,
                        other_id,
                        overlap.is_overlapping(),
                        overlap.axes_tested()
                    );
                    if !overlap.is_overlapping() {
                        continue;
                    }

                    self.processed_pairs.insert(pair);
                    let collision = Collision { overlap, object_type: other_type };
                    let Some(object) = arena.get_mut(key) else {
                        continue;
                    };
                    match object.handle_collision(&collision) {
                        Ok(()) => report.collisions_handled += 1,
                        Err(e) => {
                            report.failures += 1;
                            log::warn!("Object {} failed to handle collision with {}: {}", id, other_id, e);
                        }
                    }
                }
            }
        }

        report
    }

    /// Move initiating objects into the areas they cover now
    ///
    /// Returns the number of objects whose area set changed.
    pub fn clean_up(&mut self, arena: &ObjectArena) -> usize {
        let mut moved = 0;

        for (&id, &key) in &self.object_keys {
            let Some(object) = arena.get(key) else {
                log::warn!("Skipping stale object {}: key no longer in arena", id);
                continue;
            };
            if !self.initiating_types.contains_type(object.object_type()) {
                continue;
            }

            let area_ids = self.grid.collision_area_ids(object.polygon());
            let old_area_ids = self.object_areas.entry(id).or_default();
            if *old_area_ids == area_ids {
                continue;
            }

            for &area_id in old_area_ids.difference(&area_ids) {
                self.area_objects[area_id].remove(&id);
            }
            for &area_id in area_ids.difference(old_area_ids) {
                self.area_objects[area_id].insert(id);
            }
            log::debug!("Object {} moved from areas {:?} to {:?}", id, old_area_ids, area_ids);
            *old_area_ids = area_ids;
            moved += 1;
        }

        moved
    }

    /// Number of grid columns
    pub fn number_areas_x(&self) -> usize {
        self.grid.number_areas_x()
    }

    /// Number of grid rows
    pub fn number_areas_y(&self) -> usize {
        self.grid.number_areas_y()
    }

    /// Look up an area by id
    pub fn area(&self, id: usize) -> Option<&CollisionArea> {
        self.grid.area(id)
    }

    /// Every area, in id order
    pub fn areas(&self) -> &[CollisionArea] {
        self.grid.areas()
    }

    /// The underlying grid
    pub fn grid(&self) -> &AreaGrid {
        &self.grid
    }

    /// Ids of the objects registered in an area
    pub fn area_object_ids(&self, area_id: usize) -> Option<&BTreeSet<ObjectId>> {
        self.area_objects.get(area_id)
    }

    /// Areas an object is registered in
    pub fn object_area_ids(&self, id: ObjectId) -> Option<&BTreeSet<usize>> {
        self.object_areas.get(&id)
    }

    /// Number of registered objects
    pub fn object_count(&self) -> usize {
        self.object_keys.len()
    }

    /// Types that start collision tests
    pub fn initiating_types(&self) -> ObjectTypes {
        self.initiating_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Collidable;
    use crate::physics::{AxisDirection, ObjectType, Polygon};
    use std::any::Any;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Collidable that counts `handle_collision` calls
    struct Probe {
        id: ObjectId,
        object_type: ObjectType,
        polygon: Polygon,
        interactions: ObjectTypes,
        calls: Rc<Cell<usize>>,
        reject: bool,
    }

    impl Probe {
        fn new(id: u64, object_type: ObjectType, polygon: Polygon) -> (Self, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let probe = Self {
                id: ObjectId(id),
                object_type,
                polygon,
                interactions: object_type.default_interactions(),
                calls: Rc::clone(&calls),
                reject: false,
            };
            (probe, calls)
        }
    }

    impl Collidable for Probe {
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

        fn handle_collision(&mut self, _collision: &Collision) -> Result<(), CollisionError> {
            self.calls.set(self.calls.get() + 1);
            if self.reject {
                return Err(CollisionError::Rejected("probe".to_string()));
            }
            Ok(())
        }

        fn pre_update(&mut self) {}

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

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Polygon {
        Polygon::rectangle(x, y, w, h).unwrap()
    }

    fn manager() -> CollisionManager {
        let mut config = WorldConfig::default();
        config.boundaries.x_max = 1000.0;
        config.boundaries.y_max = 1000.0;
        config.collisions.area_width = 100.0;
        config.collisions.area_height = 100.0;
        CollisionManager::new(&config).unwrap()
    }

    fn register(manager: &mut CollisionManager, arena: &mut ObjectArena, probe: Probe) -> ObjectKey {
        let key = arena.insert(Box::new(probe));
        manager.add_object(arena, key).unwrap();
        key
    }

    #[test]
    fn test_pair_is_order_independent() {
        let ab = CollisionPair::new(ObjectId(3), ObjectId(9));
        let ba = CollisionPair::new(ObjectId(9), ObjectId(3));
        assert_eq!(ab, ba);
        assert_eq!(ab.first, ObjectId(3));
        assert_eq!(ab.hash_key(), ba.hash_key());
        assert_eq!(CollisionPair::new(ObjectId(1), ObjectId(2)).hash_key(), 7);
        assert_eq!(CollisionPair::new(ObjectId(0), ObjectId(0)).hash_key(), 0);
        assert_ne!(
            CollisionPair::new(ObjectId(0), ObjectId(3)).hash_key(),
            CollisionPair::new(ObjectId(1), ObjectId(2)).hash_key()
        );
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = WorldConfig::default();
        config.collisions.area_height = 0.0;
        assert!(matches!(
            CollisionManager::new(&config),
            Err(CollisionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_add_object_registers_covering_areas() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (tile, _) = Probe::new(1, ObjectType::Tile, rect(50.0, 50.0, 100.0, 100.0));
        register(&mut manager, &mut arena, tile);

        let expected: BTreeSet<usize> = [0, 1, 10, 11].into_iter().collect();
        assert_eq!(manager.object_area_ids(ObjectId(1)), Some(&expected));
        for area_id in 0..manager.areas().len() {
            let members = manager.area_object_ids(area_id).unwrap();
            assert_eq!(members.contains(&ObjectId(1)), expected.contains(&area_id));
        }
        assert_eq!(manager.object_count(), 1);
    }

    #[test]
    fn test_add_object_rejects_duplicates_and_unknown_keys() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (first, _) = Probe::new(1, ObjectType::Tile, rect(0.0, 0.0, 10.0, 10.0));
        register(&mut manager, &mut arena, first);

        let (same_id, _) = Probe::new(1, ObjectType::Tile, rect(20.0, 0.0, 10.0, 10.0));
        let key = arena.insert(Box::new(same_id));
        assert_eq!(
            manager.add_object(&arena, key),
            Err(CollisionError::DuplicateObject(ObjectId(1)))
        );

        arena.remove(key);
        assert_eq!(manager.add_object(&arena, key), Err(CollisionError::UnknownObject));
        assert_eq!(manager.object_count(), 1);
    }

    #[test]
    fn test_pair_sharing_two_areas_is_handled_once() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (player, player_calls) = Probe::new(1, ObjectType::Player, rect(90.0, 10.0, 20.0, 20.0));
        let (tile, tile_calls) = Probe::new(2, ObjectType::Tile, rect(80.0, 25.0, 40.0, 10.0));
        register(&mut manager, &mut arena, player);
        register(&mut manager, &mut arena, tile);
        assert_eq!(manager.object_area_ids(ObjectId(1)).map(BTreeSet::len), Some(2));
        assert_eq!(manager.object_area_ids(ObjectId(2)).map(BTreeSet::len), Some(2));

        let report = manager.update(&mut arena);

        assert_eq!(player_calls.get(), 1);
        assert_eq!(tile_calls.get(), 0);
        assert_eq!(report.pairs_tested, 1);
        assert_eq!(report.collisions_handled, 1);
        assert_eq!(report.failures, 0);

        // The dedup set is per tick
        manager.update(&mut arena);
        assert_eq!(player_calls.get(), 2);
    }

    #[test]
    fn test_separated_pair_is_not_handled() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (player, calls) = Probe::new(1, ObjectType::Player, rect(0.0, 0.0, 10.0, 10.0));
        let (tile, _) = Probe::new(2, ObjectType::Tile, rect(0.0, 50.0, 10.0, 10.0));
        register(&mut manager, &mut arena, player);
        register(&mut manager, &mut arena, tile);

        let report = manager.update(&mut arena);

        assert_eq!(report.pairs_tested, 1);
        assert_eq!(report.collisions_handled, 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_non_interactive_pairs_are_skipped() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (mut player, calls) = Probe::new(1, ObjectType::Player, rect(0.0, 0.0, 10.0, 10.0));
        player.interactions = ObjectTypes::SPRITE;
        let (tile, _) = Probe::new(2, ObjectType::Tile, rect(5.0, 5.0, 10.0, 10.0));
        register(&mut manager, &mut arena, player);
        register(&mut manager, &mut arena, tile);

        let report = manager.update(&mut arena);

        assert_eq!(report.pairs_tested, 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_two_initiators_only_lower_id_reacts() {
        let mut config = WorldConfig::default();
        config.collisions.initiating_types = vec![ObjectType::Player, ObjectType::Mobile];
        let mut manager = CollisionManager::new(&config).unwrap();
        let mut arena = ObjectArena::with_key();

        let (mut player, player_calls) = Probe::new(1, ObjectType::Player, rect(0.0, 0.0, 10.0, 10.0));
        player.interactions = ObjectTypes::MOBILE;
        let (mut mobile, mobile_calls) = Probe::new(2, ObjectType::Mobile, rect(5.0, 5.0, 10.0, 10.0));
        mobile.interactions = ObjectTypes::PLAYER;
        register(&mut manager, &mut arena, mobile);
        register(&mut manager, &mut arena, player);

        manager.update(&mut arena);

        assert_eq!(player_calls.get(), 1);
        assert_eq!(mobile_calls.get(), 0);
    }

    #[test]
    fn test_failed_reaction_is_counted_and_processing_continues() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (mut player, calls) = Probe::new(1, ObjectType::Player, rect(90.0, 10.0, 20.0, 20.0));
        player.reject = true;
        let (left, _) = Probe::new(2, ObjectType::Tile, rect(80.0, 25.0, 40.0, 10.0));
        let (right, _) = Probe::new(3, ObjectType::Tile, rect(100.0, 0.0, 5.0, 15.0));
        register(&mut manager, &mut arena, player);
        register(&mut manager, &mut arena, left);
        register(&mut manager, &mut arena, right);

        let report = manager.update(&mut arena);

        assert_eq!(calls.get(), 2);
        assert_eq!(report.failures, 2);
        assert_eq!(report.collisions_handled, 0);
    }

    #[test]
    fn test_failed_pair_is_still_marked_processed() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (mut player, calls) = Probe::new(1, ObjectType::Player, rect(90.0, 10.0, 20.0, 20.0));
        player.reject = true;
        let (tile, _) = Probe::new(2, ObjectType::Tile, rect(80.0, 25.0, 40.0, 10.0));
        register(&mut manager, &mut arena, player);
        register(&mut manager, &mut arena, tile);
        assert_eq!(manager.object_area_ids(ObjectId(2)).map(BTreeSet::len), Some(2));

        let report = manager.update(&mut arena);

        // Shared by areas 0 and 10, rejected once, never retried
        assert_eq!(calls.get(), 1);
        assert_eq!(report.failures, 1);
        assert_eq!(report.pairs_tested, 1);
        assert_eq!(report.collisions_handled, 0);
    }

    #[test]
    fn test_clean_up_rebuckets_moved_initiators() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (player, _) = Probe::new(1, ObjectType::Player, rect(10.0, 10.0, 10.0, 10.0));
        let (tile, _) = Probe::new(2, ObjectType::Tile, rect(10.0, 10.0, 10.0, 10.0));
        let player_key = register(&mut manager, &mut arena, player);
        let tile_key = register(&mut manager, &mut arena, tile);

        assert_eq!(manager.clean_up(&arena), 0);

        arena[player_key].move_by(100.0, 0.0);
        arena[tile_key].move_by(500.0, 0.0);
        assert_eq!(manager.clean_up(&arena), 1);

        let player_areas: Vec<usize> = manager.object_area_ids(ObjectId(1)).unwrap().iter().copied().collect();
        assert_eq!(player_areas, vec![10]);
        assert!(!manager.area_object_ids(0).unwrap().contains(&ObjectId(1)));
        assert!(manager.area_object_ids(10).unwrap().contains(&ObjectId(1)));
        // Non-initiating objects keep their registration
        assert!(manager.area_object_ids(0).unwrap().contains(&ObjectId(2)));

        assert_eq!(manager.clean_up(&arena), 0);
    }

    #[test]
    fn test_stale_keys_are_skipped() {
        let mut manager = manager();
        let mut arena = ObjectArena::with_key();
        let (player, calls) = Probe::new(1, ObjectType::Player, rect(0.0, 0.0, 10.0, 10.0));
        let (tile, _) = Probe::new(2, ObjectType::Tile, rect(5.0, 5.0, 10.0, 10.0));
        let player_key = register(&mut manager, &mut arena, player);
        let tile_key = register(&mut manager, &mut arena, tile);

        arena.remove(tile_key);
        let report = manager.update(&mut arena);
        assert_eq!(report, UpdateReport::default());
        assert_eq!(calls.get(), 0);

        arena.remove(player_key);
        assert_eq!(manager.update(&mut arena), UpdateReport::default());
        assert_eq!(manager.clean_up(&arena), 0);
    }

    #[test]
    fn test_accessors_mirror_grid() {
        let manager = manager();
        assert_eq!(manager.number_areas_x(), 10);
        assert_eq!(manager.number_areas_y(), 10);
        assert_eq!(manager.areas().len(), 100);
        assert_eq!(manager.area(11).map(|a| a.x_min), Some(100.0));
        assert_eq!(manager.initiating_types(), ObjectTypes::PLAYER);
        assert!(manager.area_object_ids(100).is_none());
        assert!(manager.object_area_ids(ObjectId(1)).is_none());
    }
}
