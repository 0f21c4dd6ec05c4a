//! Collision tests between the actor circle and the world
//!
//! Gates are axis-aligned rectangle pairs, so everything reduces to a
//! circle-vs-rect overlap: clamp the circle center onto the rect to find the
//! nearest point, then compare squared distance against the radius.

use glam::Vec2;

use super::gates::Gate;
use super::state::{Actor, World};

/// Axis-aligned rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Nearest point of the rect to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }
}

/// Circle/rect overlap test (touching counts as overlap)
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let d = center - rect.closest_point(center);
    d.length_squared() <= radius * radius
}

/// The two barrier rectangles of a gate
pub fn gate_rects(gate: &Gate, world: &World) -> (Rect, Rect) {
    let top = Rect::new(gate.x, 0.0, world.gate_w, gate.top_h(world));
    let bottom = Rect::new(
        gate.x,
        gate.bottom_y(world),
        world.gate_w,
        gate.bottom_h(world),
    );
    (top, bottom)
}

/// Does the actor overlap either barrier of this gate?
pub fn actor_hits_gate(actor: &Actor, gate: &Gate, world: &World) -> bool {
    let (top, bottom) = gate_rects(gate, world);
    circle_rect_overlap(actor.pos, actor.radius, &top)
        || circle_rect_overlap(actor.pos, actor.radius, &bottom)
}

/// Ground contact is terminal (the ceiling, by contrast, only clamps)
pub fn actor_hits_ground(actor: &Actor, world: &World) -> bool {
    actor.pos.y + actor.radius > world.floor_y()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_from_each_side() {
        let rect = Rect::new(100.0, 100.0, 70.0, 200.0);
        // Left of the rect, touching
        assert!(circle_rect_overlap(Vec2::new(90.0, 150.0), 10.0, &rect));
        // Left of the rect, 1 unit clear
        assert!(!circle_rect_overlap(Vec2::new(89.0, 150.0), 10.0, &rect));
        // Above, clear of the corner
        assert!(!circle_rect_overlap(Vec2::new(92.0, 92.0), 10.0, &rect));
        // Center inside
        assert!(circle_rect_overlap(Vec2::new(120.0, 180.0), 5.0, &rect));
    }

    #[test]
    fn corner_distance_uses_both_axes() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // 8 units away on each axis: distance ~11.3, radius 10 misses
        assert!(!circle_rect_overlap(Vec2::new(18.0, 18.0), 10.0, &rect));
        // Radius 12 reaches the corner
        assert!(circle_rect_overlap(Vec2::new(18.0, 18.0), 12.0, &rect));
    }

    #[test]
    fn gate_barriers_bracket_the_gap() {
        let world = World::default();
        let gate = Gate {
            x: 200.0,
            gap_center: 300.0,
            passed: false,
        };
        let (top, bottom) = gate_rects(&gate, &world);
        assert_eq!(top.y, 0.0);
        assert_eq!(top.h, 225.0);
        assert_eq!(bottom.y, 375.0);
        assert_eq!(bottom.h, world.floor_y() - 375.0);

        let mut actor = Actor::new(&world);
        // Actor centered in the gap at the gate's x: no hit
        actor.pos = Vec2::new(235.0, 300.0);
        assert!(!actor_hits_gate(&actor, &gate, &world));
        // Actor level with the top barrier: hit
        actor.pos = Vec2::new(235.0, 200.0);
        assert!(actor_hits_gate(&actor, &gate, &world));
        // Actor in the gap but brushing the lower barrier edge: hit
        actor.pos = Vec2::new(235.0, 370.0);
        assert!(actor_hits_gate(&actor, &gate, &world));
    }

    #[test]
    fn ground_contact_is_strict() {
        let world = World::default();
        let mut actor = Actor::new(&world);
        // floor_y = 554; resting exactly on it is not yet contact
        actor.pos.y = world.floor_y() - actor.radius;
        assert!(!actor_hits_ground(&actor, &world));
        actor.pos.y += 0.1;
        assert!(actor_hits_ground(&actor, &world));
    }
}
