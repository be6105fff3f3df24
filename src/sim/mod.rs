//! Deterministic movement simulation
//!
//! All movement and collision logic lives here. This module must be pure and
//! deterministic:
//! - Time only advances through the `dt` passed in
//! - World geometry and input are explicit parameters, no global state
//! - Stable iteration order (obstacle insertion order, actor slice order)
//! - No rendering, input polling or I/O

pub mod collision;
pub mod geometry;
pub mod slope;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{HorizontalDecision, VerticalDecision, resolve_horizontal, resolve_vertical};
pub use geometry::{Aabb, Bounds};
pub use slope::DiagonalPlatform;
pub use state::{
    Actor, ActorId, Controller, Direction, JumpControl, MotionState, PatrolControl,
};
pub use tick::{FrameInput, MotionEvent, step_actor, tick};
pub use world::{GeometryError, LevelData, Obstacle, RectDesc, SegmentDesc, World};
