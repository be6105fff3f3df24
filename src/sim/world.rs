//! Static world geometry
//!
//! The world is rebuilt only between frames (level load, editor changes).
//! During a frame resolvers borrow it immutably.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Aabb, Bounds};
use super::slope::DiagonalPlatform;
use crate::consts::{CONTACT_EPSILON, FLUSH_TOLERANCE, SUPPORT_PROBE};

/// Rejected geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("geometry contains a non-finite coordinate")]
    NonFinite,
    #[error("obstacle has no area ({width} x {height})")]
    ZeroArea { width: f64, height: f64 },
    #[error("diagonal segment length {length} is below the minimum {min}")]
    SegmentTooShort { length: f64, min: f64 },
    #[error("diagonal thickness must be positive, got {0}")]
    NonPositiveThickness(f64),
    #[error("level size must be positive ({width} x {height})")]
    InvalidLevelSize { width: f64, height: f64 },
}

/// Rectangle descriptor as supplied by level data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDesc {
    pub position: DVec2,
    pub size: DVec2,
}

/// Diagonal segment descriptor as supplied by level data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentDesc {
    pub start: DVec2,
    pub end: DVec2,
    pub thickness: f64,
}

impl TryFrom<SegmentDesc> for DiagonalPlatform {
    type Error = GeometryError;

    fn try_from(desc: SegmentDesc) -> Result<Self, Self::Error> {
        DiagonalPlatform::new(desc.start, desc.end, desc.thickness)
    }
}

impl From<DiagonalPlatform> for SegmentDesc {
    fn from(slope: DiagonalPlatform) -> Self {
        SegmentDesc {
            start: slope.start(),
            end: slope.end(),
            thickness: slope.thickness(),
        }
    }
}

/// Everything the level-data collaborator hands over at load time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    pub width: f64,
    pub height: f64,
    pub platforms: Vec<RectDesc>,
    pub solid_blocks: Vec<RectDesc>,
    pub diagonal_platforms: Vec<SegmentDesc>,
}

/// A single piece of static geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// One-way: standable from above only
    Platform(Aabb),
    /// Blocks on all four sides
    Solid(Aabb),
    /// Sloped standable surface
    Diagonal(DiagonalPlatform),
}

impl Obstacle {
    /// Box shape, if this obstacle has one
    pub fn aabb(&self) -> Option<&Aabb> {
        match self {
            Obstacle::Platform(aabb) | Obstacle::Solid(aabb) => Some(aabb),
            Obstacle::Diagonal(_) => None,
        }
    }

    pub fn is_one_way(&self) -> bool {
        matches!(self, Obstacle::Platform(_))
    }

    pub fn is_sloped(&self) -> bool {
        matches!(self, Obstacle::Diagonal(_))
    }

    /// Whether the underside and the sides block an actor
    pub fn is_solid(&self) -> bool {
        matches!(self, Obstacle::Solid(_))
    }
}

/// Collection of static obstacles plus level extents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    width: f64,
    height: f64,
    obstacles: Vec<Obstacle>,
}

impl World {
    pub fn new(width: f64, height: f64) -> Result<Self, GeometryError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::InvalidLevelSize { width, height });
        }
        Ok(Self {
            width,
            height,
            obstacles: Vec::new(),
        })
    }

    /// Build a world from level descriptors
    ///
    /// Degenerate descriptors are skipped with a warning; only an invalid
    /// level size fails the whole load.
    pub fn from_level(level: &LevelData) -> Result<Self, GeometryError> {
        let mut world = Self::new(level.width, level.height)?;

        for desc in &level.platforms {
            if let Err(err) = world.add_platform(desc.position, desc.size) {
                log::warn!("Skipping platform at {}: {}", desc.position, err);
            }
        }
        for desc in &level.solid_blocks {
            if let Err(err) = world.add_solid_block(desc.position, desc.size) {
                log::warn!("Skipping solid block at {}: {}", desc.position, err);
            }
        }
        for desc in &level.diagonal_platforms {
            if let Err(err) = world.add_diagonal_platform(desc.start, desc.end, desc.thickness) {
                log::warn!("Skipping diagonal platform at {}: {}", desc.start, err);
            }
        }

        log::info!(
            "World {}x{} built with {} obstacles",
            world.width,
            world.height,
            world.obstacles.len()
        );
        Ok(world)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn add_platform(&mut self, position: DVec2, size: DVec2) -> Result<(), GeometryError> {
        let aabb = Aabb::new(position, size)?;
        self.insert(Obstacle::Platform(aabb));
        Ok(())
    }

    pub fn add_solid_block(&mut self, position: DVec2, size: DVec2) -> Result<(), GeometryError> {
        let aabb = Aabb::new(position, size)?;
        self.insert(Obstacle::Solid(aabb));
        Ok(())
    }

    pub fn add_diagonal_platform(
        &mut self,
        start: DVec2,
        end: DVec2,
        thickness: f64,
    ) -> Result<(), GeometryError> {
        let slope = DiagonalPlatform::new(start, end, thickness)?;
        self.insert(Obstacle::Diagonal(slope));
        Ok(())
    }

    /// Insert an already validated obstacle (editor paste, level streaming)
    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Remove every obstacle matching `predicate` (editor deletes)
    pub fn retain(&mut self, predicate: impl FnMut(&Obstacle) -> bool) {
        self.obstacles.retain(predicate);
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Aabb> {
        self.obstacles.iter().filter_map(|o| match o {
            Obstacle::Platform(aabb) => Some(aabb),
            _ => None,
        })
    }

    pub fn solid_blocks(&self) -> impl Iterator<Item = &Aabb> {
        self.obstacles.iter().filter_map(|o| match o {
            Obstacle::Solid(aabb) => Some(aabb),
            _ => None,
        })
    }

    pub fn diagonal_platforms(&self) -> impl Iterator<Item = &DiagonalPlatform> {
        self.obstacles.iter().filter_map(|o| match o {
            Obstacle::Diagonal(slope) => Some(slope),
            _ => None,
        })
    }

    /// A platform with a solid block flush beneath it acts as a wall
    pub fn is_capped(&self, platform: &Aabb) -> bool {
        let top = platform.bounds();
        self.solid_blocks().any(|block| {
            let below = block.bounds();
            (below.top - top.bottom).abs() <= FLUSH_TOLERANCE && top.overlaps_x(&below)
        })
    }

    /// Surface supporting a point at `x` with feet at `bottom`, if any
    ///
    /// The level floor counts as support.
    pub fn support_at(&self, x: f64, bottom: f64) -> Option<f64> {
        let floor = ((self.height - bottom).abs() <= SUPPORT_PROBE).then_some(self.height);
        self.obstacles
            .iter()
            .filter_map(|obstacle| match obstacle {
                Obstacle::Platform(aabb) | Obstacle::Solid(aabb) => {
                    let b = aabb.bounds();
                    (x >= b.left && x <= b.right && (b.top - bottom).abs() <= SUPPORT_PROBE)
                        .then_some(b.top)
                }
                Obstacle::Diagonal(slope) => slope.is_on_surface(x, x, bottom),
            })
            .chain(floor)
            .reduce(f64::min)
    }

    /// "Would land here" query: the surface an actor with `bounds` would
    /// come to rest on when dropped at most `max_drop` straight down
    pub fn landing_below(&self, bounds: &Bounds, max_drop: f64) -> Option<f64> {
        let bottom = bounds.bottom;
        let next_bottom = bottom + max_drop.max(0.0);
        self.obstacles
            .iter()
            .filter_map(|obstacle| match obstacle {
                Obstacle::Platform(aabb) | Obstacle::Solid(aabb) => {
                    let b = aabb.bounds();
                    (bounds.overlaps_x(&b)
                        && bottom <= b.top + CONTACT_EPSILON
                        && next_bottom >= b.top)
                        .then_some(b.top)
                }
                Obstacle::Diagonal(slope) => {
                    slope.check_landing(bounds.left, bounds.right, bottom, next_bottom)
                }
            })
            .reduce(f64::min)
    }
}
