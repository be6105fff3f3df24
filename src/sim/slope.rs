//! Diagonal (sloped) platform geometry
//!
//! A diagonal platform is a thick line segment, stored with its endpoints
//! ordered left to right. Its walkable surface is the centerline shifted
//! down (toward +Y) by half the thickness:
//! - surface_y: interpolated surface height at a world X
//! - check_landing: landing window for a falling actor
//! - is_on_surface: same window collapsed to one frame (slope glue)

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::world::{GeometryError, SegmentDesc};
use crate::consts::{MIN_DIAGONAL_LENGTH, SLOPE_EDGE_TOLERANCE, SLOPE_LANDING_MARGIN};
use crate::lerp;

/// A sloped standable segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SegmentDesc", into = "SegmentDesc")]
pub struct DiagonalPlatform {
    start: DVec2,
    end: DVec2,
    thickness: f64,
}

impl DiagonalPlatform {
    /// Endpoints may be given in either order; they are stored left to right
    pub fn new(start: DVec2, end: DVec2, thickness: f64) -> Result<Self, GeometryError> {
        if !start.is_finite() || !end.is_finite() || !thickness.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if thickness <= 0.0 {
            return Err(GeometryError::NonPositiveThickness(thickness));
        }
        let length = start.distance(end);
        if length < MIN_DIAGONAL_LENGTH {
            return Err(GeometryError::SegmentTooShort {
                length,
                min: MIN_DIAGONAL_LENGTH,
            });
        }
        let (start, end) = if end.x < start.x {
            (end, start)
        } else {
            (start, end)
        };
        Ok(Self {
            start,
            end,
            thickness,
        })
    }

    #[inline]
    pub fn start(&self) -> DVec2 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DVec2 {
        self.end
    }

    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[inline]
    pub fn half_thickness(&self) -> f64 {
        self.thickness / 2.0
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Rise over run, `None` for a vertical segment
    pub fn slope(&self) -> Option<f64> {
        let run = self.end.x - self.start.x;
        if run == 0.0 {
            None
        } else {
            Some((self.end.y - self.start.y) / run)
        }
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.start.x.max(self.end.x)
    }

    /// Half-width of the landing window around the surface
    #[inline]
    pub fn landing_tolerance(&self) -> f64 {
        self.half_thickness() + SLOPE_LANDING_MARGIN
    }

    /// Surface height at `x` with `x` clamped into the segment's span
    fn surface_y_clamped(&self, x: f64) -> f64 {
        match self.slope() {
            // Vertical segment: constant at its topmost end
            None => self.start.y.min(self.end.y),
            Some(_) => {
                let x = x.clamp(self.start.x, self.end.x);
                let t = (x - self.start.x) / (self.end.x - self.start.x);
                lerp(self.start.y, self.end.y, t) + self.half_thickness()
            }
        }
    }

    /// Whether `x` lies within the span, including the end tolerance
    #[inline]
    pub fn spans_x(&self, x: f64) -> bool {
        x >= self.min_x() - SLOPE_EDGE_TOLERANCE && x <= self.max_x() + SLOPE_EDGE_TOLERANCE
    }

    /// Surface Y at world `x`, or `None` outside the segment's span
    pub fn surface_y(&self, x: f64) -> Option<f64> {
        self.spans_x(x).then(|| self.surface_y_clamped(x))
    }

    /// Landing test for an actor spanning `left..right`
    ///
    /// Samples both actor edges and keeps the higher surface so the rising
    /// side of the slope is never clipped. Returns the surface Y to land on.
    pub fn check_landing(
        &self,
        left: f64,
        right: f64,
        bottom: f64,
        next_bottom: f64,
    ) -> Option<f64> {
        if right < self.min_x() - SLOPE_EDGE_TOLERANCE
            || left > self.max_x() + SLOPE_EDGE_TOLERANCE
        {
            return None;
        }

        let surface = self
            .surface_y_clamped(left)
            .min(self.surface_y_clamped(right));
        let tolerance = self.landing_tolerance();

        (bottom <= surface + tolerance && next_bottom >= surface - tolerance).then_some(surface)
    }

    /// Whether an actor with feet at `bottom` is standing on the slope
    pub fn is_on_surface(&self, left: f64, right: f64, bottom: f64) -> Option<f64> {
        self.check_landing(left, right, bottom, bottom)
    }
}
