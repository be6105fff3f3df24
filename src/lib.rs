//! Ledgewalk - movement and collision core for a 2D side-scroller
//!
//! Core modules:
//! - `sim`: Deterministic per-frame movement (geometry, resolvers, actor state)
//! - `tuning`: Data-driven movement constants
//!
//! Coordinates are screen space: Y grows downward, so a smaller Y is higher.

pub mod sim;
pub mod tuning;

pub use sim::{Actor, FrameInput, MotionEvent, World, step_actor, tick};
pub use tuning::{MovementTuning, TuningError};

/// Engine-wide constants
pub mod consts {
    /// Default fixed timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Float slack for "already touching" comparisons
    pub const CONTACT_EPSILON: f64 = 1e-6;

    /// How far a surface may sit from an actor's feet and still support it
    pub const SUPPORT_PROBE: f64 = 0.5;

    /// Max gap between a platform's bottom and a solid block's top for the
    /// platform to count as capped (acts as a wall)
    pub const FLUSH_TOLERANCE: f64 = 1.0;

    /// Diagonal segments shorter than this are rejected (editor minimum)
    pub const MIN_DIAGONAL_LENGTH: f64 = 10.0;
    /// Horizontal slack past a slope's ends before it stops reporting a surface
    pub const SLOPE_EDGE_TOLERANCE: f64 = 8.0;
    /// Added to half-thickness to form the slope landing window
    pub const SLOPE_LANDING_MARGIN: f64 = 3.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// True if the open intervals `(a_min, a_max)` and `(b_min, b_max)` overlap
/// by more than `skin`
///
/// Every overlap question in the resolvers goes through this, so touching
/// edges never count as overlap.
#[inline]
pub fn spans_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64, skin: f64) -> bool {
    a_min < b_max - skin && a_max > b_min + skin
}
