//! Per-axis collision resolution against static geometry
//!
//! The tricky part of the core: moving an actor through one-way platforms,
//! solid blocks and slopes without tunneling, always picking one surface.
//! Horizontal resolution runs first and is independent of the vertical pass.

use glam::DVec2;

use super::geometry::Bounds;
use super::world::{Obstacle, World};
use crate::consts::CONTACT_EPSILON;

/// Outcome of the vertical pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalDecision {
    /// Come to rest with feet at `surface_y`
    Land { surface_y: f64 },
    /// Head struck the underside of a solid block at `ceiling_y`
    HitCeiling { ceiling_y: f64 },
    /// Move freely to the candidate Y
    NoCollision,
}

/// Outcome of the horizontal pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalDecision {
    /// Stopped flush against a wall at `contact_x`
    Blocked { contact_x: f64 },
    /// Free to move to this X
    Allowed(f64),
}

/// Resolve vertical motion for one frame
///
/// Falling actors only test landings, rising actors only test ceilings. When
/// several surfaces qualify the topmost one wins; for ceilings the lowest.
pub fn resolve_vertical(
    position: DVec2,
    size: DVec2,
    velocity_y: f64,
    next_y: f64,
    world: &World,
) -> VerticalDecision {
    if velocity_y > 0.0 {
        match find_landing(position, size, next_y, world) {
            Some(surface_y) => VerticalDecision::Land { surface_y },
            None => VerticalDecision::NoCollision,
        }
    } else if velocity_y < 0.0 {
        match find_ceiling(position, size, next_y, world) {
            Some(ceiling_y) => VerticalDecision::HitCeiling { ceiling_y },
            None => VerticalDecision::NoCollision,
        }
    } else {
        VerticalDecision::NoCollision
    }
}

/// Topmost surface crossed by the feet this frame
fn find_landing(position: DVec2, size: DVec2, next_y: f64, world: &World) -> Option<f64> {
    let actor = Bounds::from_rect(position, size);
    let bottom = actor.bottom;
    let next_bottom = next_y + size.y;

    world
        .obstacles()
        .iter()
        .filter_map(|obstacle| match obstacle {
            Obstacle::Platform(aabb) | Obstacle::Solid(aabb) => {
                let b = aabb.bounds();
                if !actor.overlaps_x(&b) {
                    return None;
                }
                let crossed_top = bottom <= b.top + CONTACT_EPSILON && next_bottom >= b.top;
                // Tunneling guard: the whole obstacle fits inside this frame's drop
                let straddled = position.y < b.top && next_bottom > b.bottom;
                (crossed_top || straddled).then_some(b.top)
            }
            Obstacle::Diagonal(slope) => {
                slope.check_landing(actor.left, actor.right, bottom, next_bottom)
            }
        })
        .reduce(f64::min)
}

/// Lowest solid-block underside crossed by the head this frame
fn find_ceiling(position: DVec2, size: DVec2, next_y: f64, world: &World) -> Option<f64> {
    let actor = Bounds::from_rect(position, size);
    let top = actor.top;
    let bottom = actor.bottom;

    world
        .solid_blocks()
        .filter_map(|aabb| {
            let b = aabb.bounds();
            if !actor.overlaps_x(&b) {
                return None;
            }
            let crossed_bottom = top >= b.bottom - CONTACT_EPSILON && next_y <= b.bottom;
            let straddled = bottom > b.bottom && next_y < b.top;
            (crossed_bottom || straddled).then_some(b.bottom)
        })
        .reduce(f64::max)
}

/// Resolve horizontal motion for one frame
///
/// Solid blocks and capped platforms block. The swept span between the
/// current and next X is tested so thin walls cannot be skipped; anything
/// the actor already overlaps is ignored so it can always walk free.
pub fn resolve_horizontal(
    position: DVec2,
    size: DVec2,
    next_x: f64,
    world: &World,
) -> HorizontalDecision {
    let dx = next_x - position.x;
    if dx == 0.0 {
        return HorizontalDecision::Allowed(next_x);
    }

    let current = Bounds::from_rect(position, size);
    let swept = Bounds {
        left: position.x.min(next_x),
        right: position.x.max(next_x) + size.x,
        top: current.top,
        bottom: current.bottom,
    };

    let blockers = world.obstacles().iter().filter_map(|obstacle| {
        let aabb = obstacle.aabb()?;
        let blocks_sides = match obstacle {
            Obstacle::Solid(_) => true,
            Obstacle::Platform(platform) => world.is_capped(platform),
            Obstacle::Diagonal(_) => false,
        };
        if !blocks_sides {
            return None;
        }
        let b = aabb.bounds();
        (swept.overlaps(&b) && !current.overlaps(&b)).then_some(b)
    });

    let contact = if dx > 0.0 {
        blockers
            .map(|b| b.left - size.x)
            .reduce(f64::min)
            .map(|x| x.max(position.x))
    } else {
        blockers
            .map(|b| b.right)
            .reduce(f64::max)
            .map(|x| x.min(position.x))
    };

    match contact {
        Some(contact_x) => HorizontalDecision::Blocked { contact_x },
        None => HorizontalDecision::Allowed(next_x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ACTOR: DVec2 = DVec2::new(32.0, 32.0);

    fn world() -> World {
        World::new(2000.0, 2000.0).unwrap()
    }

    #[test]
    fn test_topmost_landing_wins() {
        let mut w = world();
        w.add_platform(DVec2::new(0.0, 200.0), DVec2::new(100.0, 16.0))
            .unwrap();
        w.add_platform(DVec2::new(0.0, 100.0), DVec2::new(100.0, 16.0))
            .unwrap();

        let pos = DVec2::new(10.0, 0.0);
        let decision = resolve_vertical(pos, ACTOR, 3000.0, 250.0, &w);
        assert_eq!(decision, VerticalDecision::Land { surface_y: 100.0 });
    }

    #[test]
    fn test_tunneling_guard_catches_thin_platform() {
        let mut w = world();
        w.add_platform(DVec2::new(0.0, 60.0), DVec2::new(100.0, 16.0))
            .unwrap();

        let pos = DVec2::new(10.0, 0.0);
        let vy = 2000.0;
        let next_y = pos.y + vy * 0.05;
        assert_eq!(next_y, 100.0);
        let decision = resolve_vertical(pos, ACTOR, vy, next_y, &w);
        assert_eq!(decision, VerticalDecision::Land { surface_y: 60.0 });
    }

    #[test]
    fn test_straddle_only_case() {
        // Feet already slightly past the top edge, whole platform inside the drop
        let mut w = world();
        w.add_platform(DVec2::new(0.0, 30.0), DVec2::new(100.0, 4.0))
            .unwrap();
        let pos = DVec2::new(10.0, 0.0);
        let decision = resolve_vertical(pos, ACTOR, 500.0, 40.0, &w);
        assert_eq!(decision, VerticalDecision::Land { surface_y: 30.0 });
    }

    #[test]
    fn test_one_way_platform() {
        let mut w = world();
        w.add_platform(DVec2::new(0.0, 100.0), DVec2::new(100.0, 16.0))
            .unwrap();

        // Rising through it from below
        let below = DVec2::new(10.0, 120.0);
        assert_eq!(
            resolve_vertical(below, ACTOR, -400.0, 80.0, &w),
            VerticalDecision::NoCollision
        );

        // Falling onto it from above
        let above = DVec2::new(10.0, 60.0);
        assert_eq!(
            resolve_vertical(above, ACTOR, 400.0, 80.0, &w),
            VerticalDecision::Land { surface_y: 100.0 }
        );
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let mut w = world();
        w.add_platform(DVec2::new(0.0, 100.0), DVec2::new(100.0, 16.0))
            .unwrap();
        // Right edge exactly touches the platform's left edge
        let pos = DVec2::new(-32.0, 60.0);
        assert_eq!(
            resolve_vertical(pos, ACTOR, 400.0, 80.0, &w),
            VerticalDecision::NoCollision
        );
    }

    #[test]
    fn test_resting_actor_relands() {
        let mut w = world();
        w.add_solid_block(DVec2::new(0.0, 100.0), DVec2::new(100.0, 50.0))
            .unwrap();
        let pos = DVec2::new(10.0, 100.0 - ACTOR.y);
        let decision = resolve_vertical(pos, ACTOR, 10.0, pos.y + 10.0 / 60.0, &w);
        assert_eq!(decision, VerticalDecision::Land { surface_y: 100.0 });
    }

    #[test]
    fn test_ceiling_picks_lowest_solid() {
        let mut w = world();
        w.add_solid_block(DVec2::new(0.0, 0.0), DVec2::new(100.0, 40.0))
            .unwrap();
        w.add_solid_block(DVec2::new(0.0, 50.0), DVec2::new(100.0, 20.0))
            .unwrap();
        // Platforms never act as ceilings
        w.add_platform(DVec2::new(0.0, 80.0), DVec2::new(100.0, 5.0))
            .unwrap();

        let pos = DVec2::new(10.0, 90.0);
        let decision = resolve_vertical(pos, ACTOR, -900.0, 20.0, &w);
        assert_eq!(decision, VerticalDecision::HitCeiling { ceiling_y: 70.0 });
    }

    #[test]
    fn test_zero_velocity_is_no_collision() {
        let mut w = world();
        w.add_solid_block(DVec2::new(0.0, 32.0), DVec2::new(100.0, 50.0))
            .unwrap();
        assert_eq!(
            resolve_vertical(DVec2::new(10.0, 0.0), ACTOR, 0.0, 0.0, &w),
            VerticalDecision::NoCollision
        );
    }

    #[test]
    fn test_landing_on_diagonal() {
        let mut w = world();
        w.add_diagonal_platform(DVec2::new(0.0, 100.0), DVec2::new(100.0, 200.0), 16.0)
            .unwrap();
        // Actor spans x 20..52, surface at left edge is 128
        let pos = DVec2::new(20.0, 90.0);
        let decision = resolve_vertical(pos, ACTOR, 600.0, 100.0, &w);
        assert_eq!(decision, VerticalDecision::Land { surface_y: 128.0 });
    }

    #[test]
    fn test_platform_above_slope_wins() {
        let mut w = world();
        w.add_diagonal_platform(DVec2::new(0.0, 100.0), DVec2::new(100.0, 200.0), 16.0)
            .unwrap();
        w.add_platform(DVec2::new(0.0, 120.0), DVec2::new(100.0, 8.0))
            .unwrap();
        let pos = DVec2::new(20.0, 80.0);
        let decision = resolve_vertical(pos, ACTOR, 600.0, 100.0, &w);
        assert_eq!(decision, VerticalDecision::Land { surface_y: 120.0 });
    }

    #[test]
    fn test_wall_blocks_and_snaps_flush() {
        let mut w = world();
        w.add_solid_block(DVec2::new(100.0, 0.0), DVec2::new(20.0, 200.0))
            .unwrap();
        let pos = DVec2::new(50.0, 50.0);
        let decision = resolve_horizontal(pos, ACTOR, 80.0, &w);
        assert_eq!(decision, HorizontalDecision::Blocked { contact_x: 68.0 });

        let from_right = DVec2::new(150.0, 50.0);
        let decision = resolve_horizontal(from_right, ACTOR, 110.0, &w);
        assert_eq!(decision, HorizontalDecision::Blocked { contact_x: 120.0 });
    }

    #[test]
    fn test_fast_actor_cannot_skip_thin_wall() {
        let mut w = world();
        w.add_solid_block(DVec2::new(100.0, 0.0), DVec2::new(4.0, 200.0))
            .unwrap();
        let pos = DVec2::new(50.0, 50.0);
        let decision = resolve_horizontal(pos, ACTOR, 300.0, &w);
        assert_eq!(decision, HorizontalDecision::Blocked { contact_x: 68.0 });
    }

    #[test]
    fn test_standing_on_block_is_not_blocked() {
        let mut w = world();
        w.add_solid_block(DVec2::new(0.0, 100.0), DVec2::new(500.0, 50.0))
            .unwrap();
        let pos = DVec2::new(50.0, 100.0 - ACTOR.y);
        assert_eq!(
            resolve_horizontal(pos, ACTOR, 60.0, &w),
            HorizontalDecision::Allowed(60.0)
        );
    }

    #[test]
    fn test_capped_platform_blocks_but_plain_platform_does_not() {
        let mut w = world();
        // Plain platform at head height
        w.add_platform(DVec2::new(100.0, 40.0), DVec2::new(64.0, 16.0))
            .unwrap();
        let pos = DVec2::new(50.0, 30.0);
        assert_eq!(
            resolve_horizontal(pos, ACTOR, 80.0, &w),
            HorizontalDecision::Allowed(80.0)
        );

        // Back it with stone and it becomes a wall
        w.add_solid_block(DVec2::new(100.0, 56.0), DVec2::new(64.0, 200.0))
            .unwrap();
        assert_eq!(
            resolve_horizontal(pos, ACTOR, 80.0, &w),
            HorizontalDecision::Blocked { contact_x: 68.0 }
        );
    }

    #[test]
    fn test_already_overlapping_is_ignored() {
        let mut w = world();
        w.add_solid_block(DVec2::new(40.0, 40.0), DVec2::new(40.0, 40.0))
            .unwrap();
        let pos = DVec2::new(50.0, 50.0);
        assert_eq!(
            resolve_horizontal(pos, ACTOR, 60.0, &w),
            HorizontalDecision::Allowed(60.0)
        );
    }

    #[test]
    fn test_wall_and_fall_resolve_independently() {
        let mut w = world();
        w.add_solid_block(DVec2::new(100.0, 0.0), DVec2::new(20.0, 400.0))
            .unwrap();
        let pos = DVec2::new(60.0, 50.0);

        let horizontal = resolve_horizontal(pos, ACTOR, 75.0, &w);
        assert_eq!(horizontal, HorizontalDecision::Blocked { contact_x: 68.0 });

        let pos = DVec2::new(68.0, pos.y);
        let vertical = resolve_vertical(pos, ACTOR, 300.0, 55.0, &w);
        assert_eq!(vertical, VerticalDecision::NoCollision);
    }

    proptest! {
        #[test]
        fn falling_never_skips_a_platform(
            start_y in -200.0f64..0.0,
            top in 40.0f64..400.0,
            thickness in 1.0f64..32.0,
            drop in 0.0f64..2000.0,
        ) {
            let mut w = world();
            w.add_platform(DVec2::new(0.0, top), DVec2::new(100.0, thickness)).unwrap();
            let pos = DVec2::new(10.0, start_y);
            let next_y = start_y + drop;

            let decision = resolve_vertical(pos, ACTOR, 1.0, next_y, &w);
            if next_y + ACTOR.y >= top {
                prop_assert_eq!(decision, VerticalDecision::Land { surface_y: top });
            } else {
                prop_assert_eq!(decision, VerticalDecision::NoCollision);
            }
        }
    }
}
