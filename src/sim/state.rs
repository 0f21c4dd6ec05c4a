//! Game state and core simulation types
//!
//! Everything that must survive a tick (and serialize for inspection) lives
//! here. The `World` is an explicit, immutable context object passed into
//! every component call; there is no module-level mutable state.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gates::GateStream;
use super::rng::GapRng;
use crate::consts::*;

/// Invalid world configuration. Raised once at startup; a world that
/// validates can never produce an invalid tick.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("gate gap {gap} does not fit the playable height {playable}")]
    GapTooTall { gap: f32, playable: f32 },
    #[error("gate spacing {spacing} must exceed gate width {gate_w}")]
    SpacingTooNarrow { spacing: f32, gate_w: f32 },
    #[error("empty gap-center range [{min}, {max}] for the configured margins")]
    EmptyGapRange { min: f32, max: f32 },
}

/// Immutable per-session simulation constants
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub ground_h: f32,
    pub gravity: f32,
    pub flap_vy: f32,
    pub gate_speed: f32,
    pub gate_gap: f32,
    pub gate_w: f32,
    pub gate_spacing: f32,
    pub gate_count: usize,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub first_gate_lead: f32,
    pub despawn_slack: f32,
    pub actor_x: f32,
    pub actor_r: f32,
    pub actor_start_y_frac: f32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            width: WORLD_W,
            height: WORLD_H,
            ground_h: GROUND_H,
            gravity: GRAVITY,
            flap_vy: FLAP_VY,
            gate_speed: GATE_SPEED,
            gate_gap: GATE_GAP,
            gate_w: GATE_W,
            gate_spacing: GATE_SPACING,
            gate_count: GATE_COUNT,
            margin_top: GATE_MARGIN_TOP,
            margin_bottom: GATE_MARGIN_BOTTOM,
            first_gate_lead: FIRST_GATE_LEAD,
            despawn_slack: DESPAWN_SLACK,
            actor_x: ACTOR_X,
            actor_r: ACTOR_R,
            actor_start_y_frac: ACTOR_START_Y_FRAC,
        }
    }
}

impl World {
    /// Top of the ground band; contact at or below this line is terminal
    pub fn floor_y(&self) -> f32 {
        self.height - self.ground_h
    }

    /// Lowest legal gap center
    pub fn center_min(&self) -> f32 {
        self.margin_top + self.gate_gap / 2.0
    }

    /// Highest legal gap center
    pub fn center_max(&self) -> f32 {
        self.height - self.margin_bottom - self.gate_gap / 2.0
    }

    /// Actor spawn height
    pub fn actor_start_y(&self) -> f32 {
        self.height * self.actor_start_y_frac
    }

    /// Reject degenerate constants up front instead of clamping them into a
    /// nonsensical layout later.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.gate_gap >= self.floor_y() {
            return Err(WorldError::GapTooTall {
                gap: self.gate_gap,
                playable: self.floor_y(),
            });
        }
        if self.gate_spacing <= self.gate_w {
            return Err(WorldError::SpacingTooNarrow {
                spacing: self.gate_spacing,
                gate_w: self.gate_w,
            });
        }
        if self.center_min() > self.center_max() {
            return Err(WorldError::EmptyGapRange {
                min: self.center_min(),
                max: self.center_max(),
            });
        }
        Ok(())
    }
}

/// The player-controlled actor (a circle for collision purposes)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Actor {
    /// Center position; `x` never changes during play
    pub pos: Vec2,
    /// Vertical velocity, world units per tick
    pub vy: f32,
    /// Collision radius
    pub radius: f32,
    /// Display tilt in radians, derived from `vy`. Cosmetic only.
    pub rot: f32,
}

impl Actor {
    pub fn new(world: &World) -> Self {
        Self {
            pos: Vec2::new(world.actor_x, world.actor_start_y()),
            vy: 0.0,
            radius: world.actor_r,
            rot: 0.0,
        }
    }

    /// Put the actor back at its spawn position with zero velocity
    pub fn reset(&mut self, world: &World) {
        self.pos.y = world.actor_start_y();
        self.vy = 0.0;
        self.rot = 0.0;
    }

    /// One tick of vertical physics. Gravity accrues first; a flap requested
    /// this tick then overrides the velocity outright (an impulse sets
    /// `vy`, it does not add to it), and the position integrates last.
    pub fn integrate(&mut self, world: &World, flapped: bool) {
        self.vy += world.gravity;
        if flapped {
            self.vy = world.flap_vy;
        }
        self.pos.y += self.vy;
        self.rot = (self.vy / 12.0).clamp(-0.55, 1.0);
    }

    /// Ceiling clamp: the actor cannot leave the top of the world. Kills
    /// vertical velocity only; never terminal.
    pub fn clamp_to_ceiling(&mut self) {
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vy = 0.0;
        }
    }

    /// Leading edge used for gate-pass scoring
    pub fn leading_edge(&self) -> f32 {
        self.pos.x - self.radius
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first flap; physics frozen
    Ready,
    /// Active play
    Playing,
    /// Terminal until an explicit reset
    GameOver,
}

/// Observable things that happened during a tick, drained by the driver and
/// fanned out to the audio/status/leaderboard collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First flap of a session
    Started,
    /// A flap impulse was applied
    Flapped,
    /// A gate was cleared
    Scored { total: u32 },
    /// Terminal collision ended the session
    SessionEnded { score: u32, best: u32, new_best: bool },
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub world: World,
    /// Gap-placement RNG; continues its stream across resets so each
    /// session sees a fresh layout
    pub rng: GapRng,
    pub actor: Actor,
    pub stream: GateStream,
    pub score: u32,
    /// Best score across sessions; persisted by the driver
    pub best: u32,
    /// Monotonic tick counter, advances in every phase
    pub ticks: u64,
    pub phase: Phase,
    /// Events since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Validates the world before anything else; a bad configuration fails
    /// loudly here rather than clamping mid-game.
    pub fn new(world: World, seed: u32) -> Result<Self, WorldError> {
        world.validate()?;
        let mut rng = GapRng::new(seed);
        let mut stream = GateStream::new();
        stream.reset(&world, &mut rng);
        Ok(Self {
            world,
            rng,
            actor: Actor::new(&world),
            stream,
            score: 0,
            best: 0,
            ticks: 0,
            phase: Phase::Ready,
            events: Vec::new(),
        })
    }

    /// Back to a fresh `Ready` session. `best` and the RNG stream survive.
    pub fn reset(&mut self) {
        self.score = 0;
        self.ticks = 0;
        self.phase = Phase::Ready;
        self.actor.reset(&self.world);
        let world = self.world;
        self.stream.reset(&world, &mut self.rng);
        self.events.clear();
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_world_validates() {
        assert!(World::default().validate().is_ok());
    }

    #[test]
    fn oversized_gap_rejected() {
        let world = World {
            gate_gap: 600.0,
            ..World::default()
        };
        assert!(matches!(
            world.validate(),
            Err(WorldError::GapTooTall { .. })
        ));
    }

    #[test]
    fn narrow_spacing_rejected() {
        let world = World {
            gate_spacing: 50.0,
            ..World::default()
        };
        assert!(matches!(
            world.validate(),
            Err(WorldError::SpacingTooNarrow { .. })
        ));
    }

    #[test]
    fn degenerate_margins_rejected() {
        let world = World {
            margin_top: 300.0,
            margin_bottom: 300.0,
            ..World::default()
        };
        assert!(matches!(
            world.validate(),
            Err(WorldError::EmptyGapRange { .. })
        ));
    }

    #[test]
    fn ceiling_clamp_zeroes_velocity() {
        let world = World::default();
        let mut actor = Actor::new(&world);
        actor.pos.y = 5.0;
        actor.vy = -8.0;
        actor.clamp_to_ceiling();
        assert_eq!(actor.pos.y, actor.radius);
        assert_eq!(actor.vy, 0.0);
    }

    #[test]
    fn flap_overrides_gravity_in_same_tick() {
        let world = World::default();
        let mut actor = Actor::new(&world);
        assert_eq!(actor.pos.y, 288.0);
        actor.integrate(&world, true);
        assert_eq!(actor.vy, -8.3);
        assert!((actor.pos.y - 279.7).abs() < 1e-4);
    }
}
