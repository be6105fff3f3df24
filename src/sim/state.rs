//! Actor types and the motion state machine
//!
//! Actors are mutated in place once per frame by the frame driver. The core
//! never creates or destroys them on its own.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Bounds;
use super::world::World;
use crate::tuning::MovementTuning;

/// Stable actor identifier assigned by the caller
pub type ActorId = u32;

/// Whether the actor is standing on something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    Grounded,
    #[default]
    Airborne,
}

/// Facing / walking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Jump state for player-controlled actors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpControl {
    /// Remaining coyote grace time (s)
    pub coyote_timer: f64,
    /// Jump input level last frame, for release-edge detection
    pub jump_was_held: bool,
    /// The early-release cut already fired for the current jump
    pub cut_applied: bool,
}

impl JumpControl {
    /// Arm or drain the coyote timer for this frame
    ///
    /// Grounded frames re-arm it to the full window; airborne frames drain it.
    pub fn advance(&mut self, motion: MotionState, dt: f64, coyote_time: f64) {
        match motion {
            MotionState::Grounded => self.coyote_timer = coyote_time,
            MotionState::Airborne => self.coyote_timer = (self.coyote_timer - dt).max(0.0),
        }
    }

    /// Grounded, or still inside the coyote window
    pub fn can_jump(&self, motion: MotionState) -> bool {
        motion == MotionState::Grounded || self.coyote_timer > 0.0
    }

    /// Start a jump if allowed. Returns true when the jump happened.
    pub fn request_jump(
        &mut self,
        motion: &mut MotionState,
        velocity: &mut DVec2,
        jump_velocity: f64,
    ) -> bool {
        if !self.can_jump(*motion) {
            return false;
        }
        velocity.y = -jump_velocity;
        *motion = MotionState::Airborne;
        // One jump per grace window
        self.coyote_timer = 0.0;
        self.cut_applied = false;
        true
    }

    /// Cut upward speed on the jump-release edge while still rising
    ///
    /// Returns true when the cut fired.
    pub fn update_jump_hold(
        &mut self,
        jump_held: bool,
        velocity: &mut DVec2,
        cut_factor: f64,
    ) -> bool {
        let released = self.jump_was_held && !jump_held;
        self.jump_was_held = jump_held;

        if released && velocity.y < 0.0 && !self.cut_applied {
            velocity.y *= cut_factor;
            self.cut_applied = true;
            return true;
        }
        false
    }

    /// Reset after touching down
    pub fn on_landed(&mut self, coyote_time: f64) {
        self.coyote_timer = coyote_time;
        self.cut_applied = false;
    }
}

/// Ground patrol behaviour for simple enemies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolControl {
    /// Walking speed override (pixels/s); `None` walks at the tuning default
    pub speed: Option<f64>,
}

impl PatrolControl {
    pub fn with_speed(speed: f64) -> Self {
        Self { speed: Some(speed) }
    }

    #[inline]
    pub fn speed(&self, tuning: &MovementTuning) -> f64 {
        self.speed.unwrap_or(tuning.patrol_speed)
    }

    /// True if a step of `step` pixels would carry the leading edge off its
    /// footing
    ///
    /// Projects ahead in the current direction rather than using the resolved
    /// motion, so the turn happens at the edge.
    pub fn edge_ahead(
        position: DVec2,
        size: DVec2,
        direction: Direction,
        step: f64,
        world: &World,
    ) -> bool {
        let lead = match direction {
            Direction::Right => position.x + size.x + step,
            Direction::Left => position.x - step,
        };
        world.support_at(lead, position.y + size.y).is_none()
    }
}

/// Per-kind control state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    /// Driven by frame input
    Player(JumpControl),
    /// Walks back and forth on its own
    Patrol(PatrolControl),
}

/// A moving body in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// Top-left corner
    pub position: DVec2,
    pub size: DVec2,
    pub velocity: DVec2,
    pub motion: MotionState,
    pub direction: Direction,
    pub controller: Controller,
}

impl Actor {
    pub fn player(id: ActorId, position: DVec2, size: DVec2) -> Self {
        Self {
            id,
            position,
            size,
            velocity: DVec2::ZERO,
            motion: MotionState::Airborne,
            direction: Direction::Right,
            controller: Controller::Player(JumpControl::default()),
        }
    }

    /// A ground patroller walking at the tuning's `patrol_speed`
    pub fn patroller(id: ActorId, position: DVec2, size: DVec2, direction: Direction) -> Self {
        Self {
            id,
            position,
            size,
            velocity: DVec2::ZERO,
            motion: MotionState::Airborne,
            direction,
            controller: Controller::Patrol(PatrolControl::default()),
        }
    }

    /// Override a patroller's walking speed; no effect on players
    pub fn with_patrol_speed(mut self, speed: f64) -> Self {
        if let Controller::Patrol(patrol) = &mut self.controller {
            *patrol = PatrolControl::with_speed(speed);
        }
        self
    }

    /// Start on the ground (spawn helpers, tests)
    pub fn grounded(mut self) -> Self {
        self.motion = MotionState::Grounded;
        self
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.position, self.size)
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    pub fn jump_control(&self) -> Option<&JumpControl> {
        match &self.controller {
            Controller::Player(jump) => Some(jump),
            Controller::Patrol(_) => None,
        }
    }
}
