//! Read-only per-tick view handed to the render/UI collaborators
//!
//! Data flows one way: the simulation captures a snapshot after each tick
//! and rendering only ever reads it. Nothing in here can mutate `GameState`.

use serde::{Deserialize, Serialize};

use super::state::{GameState, Phase};

/// Actor as the renderer sees it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub rot: f32,
}

/// One gate with its derived barrier geometry precomputed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateView {
    pub x: f32,
    pub gap_center: f32,
    pub top_h: f32,
    pub bottom_y: f32,
    pub bottom_h: f32,
    pub passed: bool,
}

/// Static world geometry the renderer needs every frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldView {
    pub width: f32,
    pub height: f32,
    pub ground_h: f32,
    pub gate_w: f32,
    pub gate_gap: f32,
}

/// Immutable frame snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub ticks: u64,
    pub phase: Phase,
    pub score: u32,
    pub best: u32,
    pub world: WorldView,
    pub actor: ActorView,
    pub gates: Vec<GateView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.world;
        Self {
            ticks: state.ticks,
            phase: state.phase,
            score: state.score,
            best: state.best,
            world: WorldView {
                width: world.width,
                height: world.height,
                ground_h: world.ground_h,
                gate_w: world.gate_w,
                gate_gap: world.gate_gap,
            },
            actor: ActorView {
                x: state.actor.pos.x,
                y: state.actor.pos.y,
                radius: state.actor.radius,
                rot: state.actor.rot,
            },
            gates: state
                .stream
                .iter()
                .map(|g| GateView {
                    x: g.x,
                    gap_center: g.gap_center,
                    top_h: g.top_h(world),
                    bottom_y: g.bottom_y(world),
                    bottom_h: g.bottom_h(world),
                    passed: g.passed,
                })
                .collect(),
        }
    }
}
