//! Axis-aligned geometry primitives
//!
//! `Bounds` is always derived from a position and size, never stored.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::CONTACT_EPSILON;
use crate::spans_overlap;

use super::world::{GeometryError, RectDesc};

/// Edges of a rectangle in Y-down space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn from_rect(position: DVec2, size: DVec2) -> Self {
        Self {
            left: position.x,
            right: position.x + size.x,
            top: position.y,
            bottom: position.y + size.y,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Horizontal overlap, edges touching do not count
    #[inline]
    pub fn overlaps_x(&self, other: &Bounds) -> bool {
        spans_overlap(self.left, self.right, other.left, other.right, 0.0)
    }

    /// Vertical overlap with contact slack (standing on top is not overlap)
    #[inline]
    pub fn overlaps_y(&self, other: &Bounds) -> bool {
        spans_overlap(self.top, self.bottom, other.top, other.bottom, CONTACT_EPSILON)
    }

    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// Axis-aligned box obstacle (platform or solid block)
///
/// Only constructible through [`Aabb::new`], which rejects zero-area boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectDesc", into = "RectDesc")]
pub struct Aabb {
    position: DVec2,
    size: DVec2,
}

impl Aabb {
    pub fn new(position: DVec2, size: DVec2) -> Result<Self, GeometryError> {
        if !position.is_finite() || !size.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(GeometryError::ZeroArea {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self { position, size })
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.size
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.position, self.size)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.y
    }
}

impl TryFrom<RectDesc> for Aabb {
    type Error = GeometryError;

    fn try_from(desc: RectDesc) -> Result<Self, Self::Error> {
        Aabb::new(desc.position, desc.size)
    }
}

impl From<Aabb> for RectDesc {
    fn from(aabb: Aabb) -> Self {
        RectDesc {
            position: aabb.position,
            size: aabb.size,
        }
    }
}
