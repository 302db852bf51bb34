//! Uniform grid broad phase
//!
//! The world boundary is divided into fixed `area_width` x `area_height`
//! cells. Cell ids are laid out column-major: `id = ix * number_areas_y + iy`.
//! Coordinates outside the world clamp into the edge cells.

use crate::config::{BoundaryConfig, WorldConfig};
use crate::physics::{CollisionError, Polygon};
use std::collections::BTreeSet;
use std::fmt;

/// Upper limit on the number of cells a grid may allocate
pub const MAX_AREAS: usize = 1 << 20;

/// One cell of the broad-phase grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionArea {
    /// Cell id
    pub id: usize,
    /// Inclusive left edge
    pub x_min: f64,
    /// Exclusive right edge
    pub x_max: f64,
    /// Inclusive top edge
    pub y_min: f64,
    /// Exclusive bottom edge
    pub y_max: f64,
}

impl CollisionArea {
    /// Whether `(x, y)` lies inside the half-open bounds
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }
}

impl fmt::Display for CollisionArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "area {}: x [{}, {}), y [{}, {})",
            self.id, self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

/// Fixed grid of collision areas covering the world boundary
#[derive(Debug, Clone)]
pub struct AreaGrid {
    boundary: BoundaryConfig,
    area_width: f64,
    area_height: f64,
    number_areas_x: usize,
    number_areas_y: usize,
    areas: Vec<CollisionArea>,
}

impl AreaGrid {
    /// Build the grid
    ///
    /// Fails on a non-positive cell size, an empty world, or a cell size so
    /// small the grid would exceed [`MAX_AREAS`] cells.
    pub fn new(config: &WorldConfig) -> Result<Self, CollisionError> {
        config.validate()?;

        let boundary = config.boundaries;
        let area_width = config.collisions.area_width;
        let area_height = config.collisions.area_height;
        let number_areas_x = cell_count(boundary.width(), area_width)?;
        let number_areas_y = cell_count(boundary.height(), area_height)?;
        let total = number_areas_x
            .checked_mul(number_areas_y)
            .filter(|&total| total <= MAX_AREAS)
            .ok_or_else(|| {
                CollisionError::InvalidConfig(format!(
                    "{}x{} areas exceeds the limit of {}",
                    number_areas_x, number_areas_y, MAX_AREAS
                ))
            })?;

        let mut areas = Vec::with_capacity(total);
        for ix in 0..number_areas_x {
            for iy in 0..number_areas_y {
                let x_min = boundary.x_min + ix as f64 * area_width;
                let y_min = boundary.y_min + iy as f64 * area_height;
                areas.push(CollisionArea {
                    id: ix * number_areas_y + iy,
                    x_min,
                    x_max: x_min + area_width,
                    y_min,
                    y_max: y_min + area_height,
                });
            }
        }

        log::debug!(
            "Collision grid: {}x{} areas of {}x{}",
            number_areas_x,
            number_areas_y,
            area_width,
            area_height
        );

        Ok(Self {
            boundary,
            area_width,
            area_height,
            number_areas_x,
            number_areas_y,
            areas,
        })
    }

    /// Number of columns
    pub fn number_areas_x(&self) -> usize {
        self.number_areas_x
    }

    /// Number of rows
    pub fn number_areas_y(&self) -> usize {
        self.number_areas_y
    }

    /// Column containing `x`, clamped into the grid
    pub fn area_index_x(&self, x: f64) -> usize {
        clamped_index(x - self.boundary.x_min, self.area_width, self.number_areas_x)
    }

    /// Row containing `y`, clamped into the grid
    pub fn area_index_y(&self, y: f64) -> usize {
        clamped_index(y - self.boundary.y_min, self.area_height, self.number_areas_y)
    }

    /// Cell id of column `ix`, row `iy`
    pub fn area_id(&self, ix: usize, iy: usize) -> usize {
        ix * self.number_areas_y + iy
    }

    /// Ids of every cell the polygon's bounding box touches
    pub fn collision_area_ids(&self, polygon: &Polygon) -> BTreeSet<usize> {
        let x_start = self.area_index_x(polygon.x_min());
        let x_end = self.area_index_x(polygon.x_max());
        let y_start = self.area_index_y(polygon.y_min());
        let y_end = self.area_index_y(polygon.y_max());

        (x_start..=x_end)
            .flat_map(|ix| (y_start..=y_end).map(move |iy| (ix, iy)))
            .map(|(ix, iy)| self.area_id(ix, iy))
            .collect()
    }

    /// Look up a cell by id
    pub fn area(&self, id: usize) -> Option<&CollisionArea> {
        self.areas.get(id)
    }

    /// Every cell, in id order
    pub fn areas(&self) -> &[CollisionArea] {
        &self.areas
    }
}

fn cell_count(extent: f64, cell_size: f64) -> Result<usize, CollisionError> {
    let count = (extent / cell_size).floor();
    if count > MAX_AREAS as f64 {
        return Err(CollisionError::InvalidConfig(format!(
            "cell size {} splits extent {} into more than {} areas",
            cell_size, extent, MAX_AREAS
        )));
    }
    Ok((count as usize).max(1))
}

fn clamped_index(offset: f64, cell_size: f64, count: usize) -> usize {
    let index = (offset / cell_size).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(count - 1)
    }
}
