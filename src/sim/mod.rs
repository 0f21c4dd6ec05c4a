//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per visual frame, no wall-clock reads
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - Ticks are infallible; configuration is validated once at startup

pub mod collision;
pub mod gates;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Rect, actor_hits_gate, actor_hits_ground, circle_rect_overlap};
pub use gates::{Gate, GateStream};
pub use rng::GapRng;
pub use snapshot::{ActorView, GateView, Snapshot, WorldView};
pub use state::{Actor, GameEvent, GameState, Phase, World, WorldError};
pub use tick::{FrameInput, tick};
