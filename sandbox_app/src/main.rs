//! Collision sandbox
//!
//! Builds a small level (a floor of tiles, a wall and a ramp), drops a player
//! onto it and walks it right for a fixed number of ticks, logging what the
//! collision manager reports.
//!
//! Usage: `platformer_sandbox [world.ron|world.toml] [ticks]`

use platformer_collision::foundation::logging;
use platformer_collision::prelude::*;

const TILE_SIZE: f64 = 32.0;
const FLOOR_TILES: u64 = 24;
const FLOOR_Y: f64 = 640.0;
const PLAYER_PROFILE: u8 = 0;

/// Errors that stop the sandbox
#[derive(thiserror::Error, Debug)]
pub enum SandboxError {
    /// Collision core setup failed
    #[error("Collision setup failed: {0}")]
    Collision(#[from] CollisionError),

    /// World config could not be loaded
    #[error("Config load failed: {0}")]
    Config(#[from] ConfigError),

    /// Command line argument was not understood
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Level, player and collision manager for one sandbox run
pub struct SandboxApp {
    manager: CollisionManager,
    arena: ObjectArena,
    player: ObjectKey,
    landed_at: Option<u32>,
    rebucketed: usize,
}

impl SandboxApp {
    /// Build the level described in the module docs
    pub fn new(config: &WorldConfig) -> Result<Self, SandboxError> {
        log::info!("Creating collision manager...");
        let mut manager = CollisionManager::new(config)?;
        log::info!(
            "Grid has {}x{} areas",
            manager.number_areas_x(),
            manager.number_areas_y()
        );
        let mut arena = ObjectArena::with_key();

        let floor = TileShape::new(ShapeKind::Square).with_primary_edge(0, AxisDirection::Left);
        for i in 0..FLOOR_TILES {
            let position = Point::new(i as f64 * TILE_SIZE, FLOOR_Y);
            let tile = StaticObject::tile(ObjectId(100 + i), &floor, position, TILE_SIZE, TILE_SIZE)?;
            let key = arena.insert(Box::new(tile));
            manager.add_object(&arena, key)?;
        }

        // Ramp rising to the right, then a wall behind it
        let ramp = TileShape::new(ShapeKind::TriangleRight)
            .rotated(Rotation::Ninety)
            .with_primary_edge(2, AxisDirection::Left);
        let ramp = StaticObject::tile(
            ObjectId(200),
            &ramp,
            Point::new(12.0 * TILE_SIZE, FLOOR_Y - TILE_SIZE),
            TILE_SIZE,
            TILE_SIZE,
        )?;
        let wall = StaticObject::tile(
            ObjectId(201),
            &TileShape::new(ShapeKind::Square),
            Point::new(18.0 * TILE_SIZE, FLOOR_Y - 2.0 * TILE_SIZE),
            TILE_SIZE,
            2.0 * TILE_SIZE,
        )?;
        for object in [ramp, wall] {
            let key = arena.insert(Box::new(object));
            manager.add_object(&arena, key)?;
        }

        let mut player = MobileObject::from_polygon(
            ObjectId(1),
            ObjectType::Player,
            Polygon::rectangle(2.0 * TILE_SIZE, FLOOR_Y - 6.0 * TILE_SIZE, 24.0, 30.0)?,
        );
        player.add_profile(MobileProfile {
            id: PLAYER_PROFILE,
            accelerate_x: 0.5,
            decelerate_x: 0.5,
            velocity_max_x: 3.0,
            accelerate_y: 0.5,
            velocity_max_y: 12.0,
            gravity: true,
            ..MobileProfile::default()
        });
        player.set_active_profile(PLAYER_PROFILE)?;
        let player = arena.insert(Box::new(player));
        manager.add_object(&arena, player)?;

        log::info!("Level built with {} objects", manager.object_count());

        Ok(Self {
            manager,
            arena,
            player,
            landed_at: None,
            rebucketed: 0,
        })
    }

    fn player(&self) -> Option<&MobileObject> {
        object_as::<MobileObject>(&self.arena, self.player)
    }

    /// Run one tick: clear per-tick state, move, collide, re-bucket
    pub fn tick(&mut self, frame: u32) -> Result<UpdateReport, SandboxError> {
        for (_, object) in self.arena.iter_mut() {
            object.pre_update();
        }

        // Stand still while falling, then walk right
        let input_x = if self.landed_at.is_some() { 1.0 } else { 0.0 };
        if let Some(player) = object_as_mut::<MobileObject>(&mut self.arena, self.player) {
            player.move_with_profile(input_x, 0.0)?;
        }

        let report = self.manager.update(&mut self.arena);
        self.rebucketed += self.manager.clean_up(&self.arena);

        if let Some(player) = self.player() {
            log::debug!(
                "Frame {}: {} tested, {} handled, player at ({:.2}, {:.2}) grounded = {}",
                frame,
                report.pairs_tested,
                report.collisions_handled,
                player.polygon().x_min(),
                player.polygon().y_max(),
                player.is_grounded()
            );
            if self.landed_at.is_none() && player.is_grounded() {
                log::info!("Player landed on frame {}", frame);
                self.landed_at = Some(frame);
            }
        }
        if report.failures > 0 {
            log::warn!("Frame {}: {} collision failures", frame, report.failures);
        }
        Ok(report)
    }

    /// Run `ticks` ticks and log a summary
    pub fn run(&mut self, ticks: u32) -> Result<(), SandboxError> {
        log::info!("Running {} ticks...", ticks);
        let mut handled = 0;
        for frame in 0..ticks {
            handled += self.tick(frame)?.collisions_handled;
        }

        if let Some(player) = self.player() {
            log::info!(
                "Finished: {} collisions handled, {} re-buckets, player at {}",
                handled,
                self.rebucketed,
                player.polygon()
            );
        }
        Ok(())
    }
}

fn load_config(path: Option<&str>) -> Result<WorldConfig, SandboxError> {
    match path {
        Some(path) => {
            log::info!("Loading world config from {}", path);
            Ok(WorldConfig::load_from_file(path)?)
        }
        None => {
            log::info!("Using default world config");
            Ok(WorldConfig::default())
        }
    }
}

fn main() -> Result<(), SandboxError> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1).map(String::as_str))?;
    let ticks = match args.get(2) {
        Some(text) => text
            .parse()
            .map_err(|_| SandboxError::InvalidArgument(format!("ticks must be a number, got {text}")))?,
        None => 240,
    };

    log::info!("Starting platformer collision sandbox");
    let mut app = SandboxApp::new(&config)?;
    app.run(ticks)?;
    Ok(())
}
