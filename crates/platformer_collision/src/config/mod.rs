//! Configuration system
//!
//! World boundaries and collision grid settings, loadable from `.toml` or
//! `.ron` files.

pub use serde::{Serialize, Deserialize};

use crate::physics::{CollisionError, ObjectType, ObjectTypes};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;
        Self::from_str_for_path(&contents, path)
    }

    /// Parse configuration text, picking the format from the path's extension
    fn from_str_for_path(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Serialize configuration, picking the format from the path's extension
    fn to_string_for_path(&self, path: &str) -> Result<String, ConfigError> {
        if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = self.to_string_for_path(path)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// World boundary rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Left edge of the world
    pub x_min: f64,
    /// Right edge of the world
    pub x_max: f64,
    /// Top edge of the world
    pub y_min: f64,
    /// Bottom edge of the world
    pub y_max: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 3000.0,
            y_min: 0.0,
            y_max: 1000.0,
        }
    }
}

impl BoundaryConfig {
    /// World width
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// World height
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Broad-phase grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Width of one grid cell
    pub area_width: f64,
    /// Height of one grid cell
    pub area_height: f64,
    /// Types whose objects start collision tests each tick
    pub initiating_types: Vec<ObjectType>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            area_width: 256.0,
            area_height: 256.0,
            initiating_types: vec![ObjectType::Player],
        }
    }
}

impl CollisionConfig {
    /// The initiating types as a set
    pub fn initiating_set(&self) -> ObjectTypes {
        self.initiating_types.iter().copied().collect()
    }
}

/// Everything the collision manager needs at construction
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World boundaries
    pub boundaries: BoundaryConfig,
    /// Grid settings
    pub collisions: CollisionConfig,
}

impl Config for WorldConfig {}

impl WorldConfig {
    /// Check the preconditions the collision grid relies on
    pub fn validate(&self) -> Result<(), CollisionError> {
        let c = &self.collisions;
        if !(c.area_width > 0.0 && c.area_height > 0.0)
            || !c.area_width.is_finite()
            || !c.area_height.is_finite()
        {
            return Err(CollisionError::InvalidConfig(format!(
                "area size must be positive, got {} x {}",
                c.area_width, c.area_height
            )));
        }
        let b = &self.boundaries;
        if !(b.width() > 0.0 && b.height() > 0.0) || !b.width().is_finite() || !b.height().is_finite() {
            return Err(CollisionError::InvalidConfig(format!(
                "world boundary is empty: x [{}, {}], y [{}, {}]",
                b.x_min, b.x_max, b.y_min, b.y_max
            )));
        }
        Ok(())
    }
}
