//! Procedural gate stream
//!
//! A sliding window of gates scrolls toward the actor. Recycling is strictly
//! one-in-one-out: when the front gate leaves the screen it is popped and
//! exactly one new gate is appended past the current tail, so the live count
//! never changes after `reset` and the window never runs out or leaks.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::rng::GapRng;
use super::state::World;

/// One gate: a pair of barriers with a passable gap between them
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gate {
    /// Left edge; decreases as the world scrolls
    pub x: f32,
    /// Vertical midpoint of the gap, fixed at creation
    pub gap_center: f32,
    /// Set once when the actor's leading edge clears this gate
    pub passed: bool,
}

impl Gate {
    pub fn right_edge(&self, world: &World) -> f32 {
        self.x + world.gate_w
    }

    /// Height of the upper barrier, measured from the world top
    pub fn top_h(&self, world: &World) -> f32 {
        self.gap_center - world.gate_gap / 2.0
    }

    /// Top of the lower barrier
    pub fn bottom_y(&self, world: &World) -> f32 {
        self.gap_center + world.gate_gap / 2.0
    }

    /// Height of the lower barrier, down to the ground band
    pub fn bottom_h(&self, world: &World) -> f32 {
        world.floor_y() - self.bottom_y(world)
    }
}

/// Ordered window of live gates, leftmost first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateStream {
    gates: VecDeque<Gate>,
}

impl GateStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a gap center uniformly from the legal range. Consumes exactly
    /// one RNG value.
    pub fn draw_gap_center(world: &World, rng: &mut GapRng) -> f32 {
        world.center_min() + rng.next() * (world.center_max() - world.center_min())
    }

    /// Repopulate the window for a fresh session: the first gate one screen
    /// width plus lead ahead, each following gate `gate_spacing` further out.
    pub fn reset(&mut self, world: &World, rng: &mut GapRng) {
        self.gates.clear();
        for i in 0..world.gate_count {
            let x = world.width + world.first_gate_lead + i as f32 * world.gate_spacing;
            self.push_gate(x, world, rng);
        }
    }

    fn push_gate(&mut self, x: f32, world: &World, rng: &mut GapRng) {
        self.gates.push_back(Gate {
            x,
            gap_center: Self::draw_gap_center(world, rng),
            passed: false,
        });
    }

    /// One tick of scrolling plus recycling. At most one gate is recycled
    /// per tick, which is always enough given `gate_spacing > gate_speed`.
    pub fn advance(&mut self, world: &World, rng: &mut GapRng) {
        for gate in &mut self.gates {
            gate.x -= world.gate_speed;
        }

        let front_gone = self
            .gates
            .front()
            .is_some_and(|g| g.right_edge(world) < -world.despawn_slack);
        if front_gone {
            self.gates.pop_front();
            // Window was non-empty before the pop, so a tail exists unless
            // the stream was configured with a single gate
            let tail_x = self.gates.back().map_or(world.width, |g| g.x);
            self.push_gate(tail_x + world.gate_spacing, world, rng);
        }
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Gate> {
        self.gates.iter_mut()
    }

    pub fn front(&self) -> Option<&Gate> {
        self.gates.front()
    }

    pub fn back(&self) -> Option<&Gate> {
        self.gates.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stream_with_seed(seed: u32) -> (World, GapRng, GateStream) {
        let world = World::default();
        let mut rng = GapRng::new(seed);
        let mut stream = GateStream::new();
        stream.reset(&world, &mut rng);
        (world, rng, stream)
    }

    #[test]
    fn reset_places_four_gates_at_spacing() {
        let (world, _, stream) = stream_with_seed(1);
        assert_eq!(stream.len(), 4);
        let xs: Vec<f32> = stream.iter().map(|g| g.x).collect();
        assert_eq!(xs[0], 620.0);
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - world.gate_spacing).abs() < 1e-3);
        }
    }

    #[test]
    fn front_gate_recycles_to_tail() {
        let (world, mut rng, mut stream) = stream_with_seed(7);
        let first_center = stream.front().unwrap().gap_center;

        // Scroll until the original front gate goes off screen: x starts at
        // 620, so right edge < -20 after ceil((620 + 70 + 20) / 2.55) ticks
        let mut ticks = 0u32;
        while (stream.front().unwrap().gap_center - first_center).abs() < f32::EPSILON {
            stream.advance(&world, &mut rng);
            ticks += 1;
            assert!(ticks < 400, "front gate never recycled");
        }
        assert_eq!(ticks, 279);
        assert_eq!(stream.len(), 4);

        // New tail sits one spacing past the previous tail
        let xs: Vec<f32> = stream.iter().map(|g| g.x).collect();
        assert!((xs[3] - xs[2] - world.gate_spacing).abs() < 1e-3);
    }

    #[test]
    fn recycled_gate_is_unpassed() {
        let (world, mut rng, mut stream) = stream_with_seed(3);
        for gate in stream.iter_mut() {
            gate.passed = true;
        }
        for _ in 0..300 {
            stream.advance(&world, &mut rng);
        }
        assert!(!stream.back().unwrap().passed);
    }

    proptest! {
        #[test]
        fn gap_centers_always_legal(seed in any::<u32>()) {
            let world = World::default();
            let mut rng = GapRng::new(seed);
            for _ in 0..200 {
                let center = GateStream::draw_gap_center(&world, &mut rng);
                prop_assert!(center >= world.center_min());
                prop_assert!(center <= world.center_max());
                let gate = Gate { x: 0.0, gap_center: center, passed: false };
                prop_assert!(gate.top_h(&world) >= 0.0);
                prop_assert!(gate.bottom_h(&world) >= 0.0);
            }
        }

        #[test]
        fn window_count_and_order_invariant(seed in any::<u32>(), ticks in 0usize..2000) {
            let (world, mut rng, mut stream) = stream_with_seed(seed);
            for _ in 0..ticks {
                stream.advance(&world, &mut rng);
            }
            prop_assert_eq!(stream.len(), 4);
            let xs: Vec<f32> = stream.iter().map(|g| g.x).collect();
            for pair in xs.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
