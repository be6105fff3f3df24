//! Fixed-phase frame driver
//!
//! Advances every actor once per frame, in slice order:
//! intent → gravity → horizontal → vertical → state machine → level clamp.

use serde::{Deserialize, Serialize};

use super::collision::{
    HorizontalDecision, VerticalDecision, resolve_horizontal, resolve_vertical,
};
use super::state::{Actor, ActorId, Controller, Direction, MotionState, PatrolControl};
use super::world::World;
use crate::consts::SUPPORT_PROBE;
use crate::tuning::MovementTuning;

/// Resolved player intent for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump went down this frame (edge)
    pub jump_pressed: bool,
    /// Jump is currently held (level)
    pub jump_held: bool,
}

/// Things that happened to an actor this frame, for game-logic collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionEvent {
    Jumped,
    /// Jump released early, upward speed cut
    JumpCut,
    Landed,
    /// Walked or was carried off a surface without jumping
    LeftGround,
    BumpedCeiling,
    HitWall,
    /// Patroller reversed direction
    Turned,
    ReachedLevelEdge,
}

/// Advance all actors by one frame
///
/// Actors do not interact with each other here; order only matters for the
/// order of the returned events.
pub fn tick(
    actors: &mut [Actor],
    input: &FrameInput,
    world: &World,
    tuning: &MovementTuning,
    dt: f64,
) -> Vec<(ActorId, MotionEvent)> {
    let mut events = Vec::new();
    for actor in actors.iter_mut() {
        let id = actor.id;
        events.extend(
            step_actor(actor, input, world, tuning, dt)
                .into_iter()
                .map(|event| (id, event)),
        );
    }
    events
}

/// Advance a single actor by one frame
pub fn step_actor(
    actor: &mut Actor,
    input: &FrameInput,
    world: &World,
    tuning: &MovementTuning,
    dt: f64,
) -> Vec<MotionEvent> {
    let mut events = Vec::new();
    let started_grounded = actor.is_grounded();

    apply_intent(actor, input, world, tuning, dt, &mut events);

    actor.velocity.y += tuning.gravity * dt;

    // Horizontal first so walls hold even while falling past a corner
    let next_x = actor.position.x + actor.velocity.x * dt;
    match resolve_horizontal(actor.position, actor.size, next_x, world) {
        HorizontalDecision::Blocked { contact_x } => {
            actor.position.x = contact_x;
            actor.velocity.x = 0.0;
            events.push(MotionEvent::HitWall);
            turn_patroller(actor, &mut events);
        }
        HorizontalDecision::Allowed(x) => actor.position.x = x,
    }

    if started_grounded && actor.velocity.y >= 0.0 {
        glue_to_slope(actor, world);
    }

    let next_y = actor.position.y + actor.velocity.y * dt;
    let decision = with_level_floor(
        resolve_vertical(actor.position, actor.size, actor.velocity.y, next_y, world),
        actor.velocity.y,
        next_y + actor.size.y,
        world.height(),
    );
    apply_vertical(actor, decision, next_y, tuning, &mut events);

    clamp_to_level(actor, world, &mut events);

    if !events.is_empty() {
        log::debug!(
            "actor {} at ({:.1}, {:.1}): {:?}",
            actor.id,
            actor.position.x,
            actor.position.y,
            events
        );
    }
    events
}

/// Timers, horizontal intent, jump and jump cut
fn apply_intent(
    actor: &mut Actor,
    input: &FrameInput,
    world: &World,
    tuning: &MovementTuning,
    dt: f64,
    events: &mut Vec<MotionEvent>,
) {
    match &mut actor.controller {
        Controller::Player(jump) => {
            jump.advance(actor.motion, dt, tuning.coyote_time);

            let axis = input.move_right as i8 - input.move_left as i8;
            actor.velocity.x = f64::from(axis) * tuning.move_speed;
            if axis > 0 {
                actor.direction = Direction::Right;
            } else if axis < 0 {
                actor.direction = Direction::Left;
            }

            if input.jump_pressed
                && jump.request_jump(&mut actor.motion, &mut actor.velocity, tuning.jump_velocity)
            {
                events.push(MotionEvent::Jumped);
            }
            if jump.update_jump_hold(input.jump_held, &mut actor.velocity, tuning.jump_cut_factor) {
                events.push(MotionEvent::JumpCut);
            }
        }
        Controller::Patrol(patrol) => {
            let speed = patrol.speed(tuning);
            if actor.motion == MotionState::Grounded
                && PatrolControl::edge_ahead(
                    actor.position,
                    actor.size,
                    actor.direction,
                    speed * dt,
                    world,
                )
            {
                actor.direction = actor.direction.reversed();
                events.push(MotionEvent::Turned);
            }
            actor.velocity.x = actor.direction.sign() * speed;
        }
    }
}

fn turn_patroller(actor: &mut Actor, events: &mut Vec<MotionEvent>) {
    if let Controller::Patrol(_) = actor.controller {
        actor.direction = actor.direction.reversed();
        events.push(MotionEvent::Turned);
    }
}

/// Keep a grounded actor on a slope while it walks along it
///
/// Never pulls the feet down past a flat top or the level floor that sits
/// between them and the slope surface; that surface is the higher support.
fn glue_to_slope(actor: &mut Actor, world: &World) {
    let bounds = actor.bounds();
    let Some(surface_y) = world
        .diagonal_platforms()
        .filter_map(|slope| slope.is_on_surface(bounds.left, bounds.right, bounds.bottom))
        .reduce(f64::min)
    else {
        return;
    };

    let floor_above = surface_y > world.height();
    let flat_above = world
        .platforms()
        .chain(world.solid_blocks())
        .map(|aabb| aabb.bounds())
        .any(|b| {
            bounds.overlaps_x(&b) && b.top >= bounds.bottom - SUPPORT_PROBE && b.top < surface_y
        });
    if !floor_above && !flat_above {
        actor.position.y = surface_y - actor.size.y;
    }
}

/// The bottom of the level is an implicit floor
fn with_level_floor(
    decision: VerticalDecision,
    velocity_y: f64,
    next_bottom: f64,
    level_height: f64,
) -> VerticalDecision {
    match decision {
        VerticalDecision::Land { surface_y } if surface_y > level_height => VerticalDecision::Land {
            surface_y: level_height,
        },
        VerticalDecision::NoCollision if velocity_y > 0.0 && next_bottom >= level_height => {
            VerticalDecision::Land {
                surface_y: level_height,
            }
        }
        other => other,
    }
}

fn apply_vertical(
    actor: &mut Actor,
    decision: VerticalDecision,
    next_y: f64,
    tuning: &MovementTuning,
    events: &mut Vec<MotionEvent>,
) {
    match decision {
        VerticalDecision::Land { surface_y } => {
            actor.position.y = surface_y - actor.size.y;
            actor.velocity.y = 0.0;
            if actor.motion == MotionState::Airborne {
                events.push(MotionEvent::Landed);
            }
            actor.motion = MotionState::Grounded;
            if let Controller::Player(jump) = &mut actor.controller {
                jump.on_landed(tuning.coyote_time);
            }
        }
        VerticalDecision::HitCeiling { ceiling_y } => {
            // Snap the head to the ceiling's underside
            actor.position.y = ceiling_y;
            actor.velocity.y = 0.0;
            events.push(MotionEvent::BumpedCeiling);
        }
        VerticalDecision::NoCollision => {
            actor.position.y = next_y;
            if actor.motion == MotionState::Grounded {
                actor.motion = MotionState::Airborne;
                events.push(MotionEvent::LeftGround);
            }
        }
    }
}

fn clamp_to_level(actor: &mut Actor, world: &World, events: &mut Vec<MotionEvent>) {
    let max_x = (world.width() - actor.size.x).max(0.0);
    let heading_out = (actor.position.x <= 0.0 && actor.velocity.x < 0.0)
        || (actor.position.x >= max_x && actor.velocity.x > 0.0);

    actor.position.x = actor.position.x.clamp(0.0, max_x);
    if heading_out {
        actor.velocity.x = 0.0;
        events.push(MotionEvent::ReachedLevelEdge);
        turn_patroller(actor, events);
    }

    if actor.position.y < 0.0 {
        actor.position.y = 0.0;
        actor.velocity.y = actor.velocity.y.max(0.0);
    }
}
