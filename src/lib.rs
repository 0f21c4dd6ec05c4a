//! Flapurr - a one-button gravity-and-gates arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, gate stream, collisions, state machine)
//! - `leaderboard`: Remote score store boundary + local top-10 fallback
//! - `persistence`: Best score / player name storage
//! - `settings`: User preferences
//! - `platform`: Browser/native glue helpers

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use leaderboard::LocalScoreStore;
pub use settings::Settings;

/// Game tuning constants (world units; one tick is one display frame at the
/// nominal 60 Hz refresh)
pub mod consts {
    /// Fixed game world width
    pub const WORLD_W: f32 = 420.0;
    /// Fixed game world height
    pub const WORLD_H: f32 = 640.0;
    /// Ground band thickness at the bottom of the world
    pub const GROUND_H: f32 = 86.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.45;
    /// Velocity set (not added) by a flap impulse
    pub const FLAP_VY: f32 = -8.3;

    /// Horizontal gate scroll speed per tick
    pub const GATE_SPEED: f32 = 2.55;
    /// Vertical size of the passable gap
    pub const GATE_GAP: f32 = 150.0;
    /// Gate barrier width
    pub const GATE_W: f32 = 70.0;
    /// Horizontal distance between successive gate left edges
    pub const GATE_SPACING: f32 = 210.0;
    /// Live gates kept ahead of the player at steady state
    pub const GATE_COUNT: usize = 4;
    /// Gap centers stay at least this far from the world top
    pub const GATE_MARGIN_TOP: f32 = 70.0;
    /// Gap centers stay at least this far above the world bottom
    pub const GATE_MARGIN_BOTTOM: f32 = GROUND_H + 70.0;
    /// First gate spawns this far past the right world edge
    pub const FIRST_GATE_LEAD: f32 = 200.0;
    /// A gate is recycled once its right edge is this far off-screen left
    pub const DESPAWN_SLACK: f32 = 20.0;

    /// Actor defaults
    pub const ACTOR_X: f32 = 120.0;
    pub const ACTOR_R: f32 = 18.0;
    /// Actor start height as a fraction of world height
    pub const ACTOR_START_Y_FRAC: f32 = 0.45;
}
