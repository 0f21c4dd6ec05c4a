//! Per-tick state machine
//!
//! One `tick` per display frame, in every phase. Requests arrive as a
//! `FrameInput` collected by the driver between frames; reset applies before
//! impulse, so a reset+flap in the same frame restarts and immediately
//! re-enters play. A flap during `GameOver` is ignored by the simulation;
//! restarting is always an explicit reset request.

use super::collision;
use super::state::{GameEvent, GameState, Phase};

/// Input requests for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Upward impulse requested (tap / Space)
    pub flap: bool,
    /// Session reset requested
    pub reset: bool,
}

/// Advance the game by one tick. Infallible: any reachable state plus any
/// input produces a valid next state.
pub fn tick(state: &mut GameState, input: &FrameInput) {
    if input.reset {
        state.reset();
    }

    state.ticks += 1;

    if input.flap && state.phase == Phase::Ready {
        state.phase = Phase::Playing;
        state.push_event(GameEvent::Started);
    }

    if state.phase == Phase::Playing {
        step_playing(state, input.flap);
    }
}

/// One tick of active play: physics, scrolling, scoring, then terminal
/// checks. Order matches the scoring-before-collision contract: a gate that
/// was just cleared is already behind the actor and cannot also collide.
fn step_playing(state: &mut GameState, flapped: bool) {
    let world = state.world;

    if flapped {
        state.push_event(GameEvent::Flapped);
    }

    state.actor.integrate(&world, flapped);
    state.stream.advance(&world, &mut state.rng);

    // Score every gate whose trailing edge just cleared the actor's leading
    // edge. Normally at most one fires per tick, but all gates are checked.
    let leading = state.actor.leading_edge();
    let mut newly_passed = 0u32;
    for gate in state.stream.iter_mut() {
        if !gate.passed && gate.right_edge(&world) < leading {
            gate.passed = true;
            newly_passed += 1;
        }
    }
    for _ in 0..newly_passed {
        state.score += 1;
        let total = state.score;
        state.push_event(GameEvent::Scored { total });
    }

    state.actor.clamp_to_ceiling();

    let grounded = collision::actor_hits_ground(&state.actor, &world);
    let gated = state
        .stream
        .iter()
        .any(|g| collision::actor_hits_gate(&state.actor, g, &world));
    if grounded || gated {
        enter_game_over(state);
    }
}

/// `Playing -> GameOver`. Idempotent: simultaneous collisions fire this at
/// most once.
fn enter_game_over(state: &mut GameState) {
    if state.phase == Phase::GameOver {
        return;
    }
    state.phase = Phase::GameOver;

    let new_best = state.score > state.best;
    if new_best {
        state.best = state.score;
    }
    state.push_event(GameEvent::SessionEnded {
        score: state.score,
        best: state.best,
        new_best,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::World;

    fn new_state(seed: u32) -> GameState {
        GameState::new(World::default(), seed).unwrap()
    }

    const FLAP: FrameInput = FrameInput {
        flap: true,
        reset: false,
    };
    const RESET: FrameInput = FrameInput {
        flap: false,
        reset: true,
    };

    /// Force a terminal ground collision on the next tick
    fn sink_actor(state: &mut GameState) {
        state.actor.pos.y = state.world.floor_y() + 10.0;
    }

    #[test]
    fn ready_freezes_physics() {
        let mut state = new_state(1);
        let y0 = state.actor.pos.y;
        let gate_x0 = state.stream.front().unwrap().x;
        for _ in 0..30 {
            tick(&mut state, &FrameInput::default());
        }
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.actor.pos.y, y0);
        assert_eq!(state.stream.front().unwrap().x, gate_x0);
        assert_eq!(state.ticks, 30);
    }

    #[test]
    fn first_flap_starts_and_impulses() {
        let mut state = new_state(1);
        assert_eq!(state.actor.pos.y, 288.0);

        tick(&mut state, &FLAP);

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.actor.vy, -8.3);
        assert!((state.actor.pos.y - 279.7).abs() < 1e-4);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Started));
        assert!(events.contains(&GameEvent::Flapped));
    }

    #[test]
    fn gate_pass_scores_exactly_once() {
        let mut state = new_state(1);
        state.phase = Phase::Playing;
        // Park a gate just short of the scoring line: right edge 100 is
        // inside the actor's leading edge at 120 - 18 = 102
        state.stream.iter_mut().next().unwrap().x = 30.0;

        tick(&mut state, &FLAP);
        assert_eq!(state.score, 1);
        assert!(state.stream.front().unwrap().passed);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Scored { total: 1 })
        );

        tick(&mut state, &FLAP);
        assert_eq!(state.score, 1, "a gate scores at most once");
    }

    #[test]
    fn score_monotonic_over_session() {
        let mut state = new_state(99);
        let mut last_score = 0;
        for i in 0..3000 {
            let input = FrameInput {
                flap: i % 18 == 0,
                reset: false,
            };
            tick(&mut state, &input);
            assert!(state.score >= last_score);
            last_score = state.score;
            if state.phase == Phase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn ground_contact_ends_session() {
        let mut state = new_state(1);
        tick(&mut state, &FLAP);
        sink_actor(&mut state);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, Phase::GameOver);
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::SessionEnded { .. })
        ));
    }

    #[test]
    fn game_over_is_frozen_and_idempotent() {
        let mut state = new_state(1);
        tick(&mut state, &FLAP);
        sink_actor(&mut state);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, Phase::GameOver);
        state.drain_events();

        let score = state.score;
        let best = state.best;
        let y = state.actor.pos.y;
        let xs: Vec<f32> = state.stream.iter().map(|g| g.x).collect();

        // Flaps are ignored; nothing observable moves
        for _ in 0..60 {
            tick(&mut state, &FLAP);
        }
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.score, score);
        assert_eq!(state.best, best);
        assert_eq!(state.actor.pos.y, y);
        let xs_after: Vec<f32> = state.stream.iter().map(|g| g.x).collect();
        assert_eq!(xs, xs_after);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn best_updates_only_on_improvement() {
        let mut state = new_state(1);
        state.best = 10;

        // Session ending at 7 leaves best alone
        state.phase = Phase::Playing;
        state.score = 7;
        sink_actor(&mut state);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.best, 10);
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::SessionEnded {
                score: 7,
                best: 10,
                new_best: false
            })
        ));

        // Session ending at 12 becomes the new best
        tick(&mut state, &RESET);
        state.phase = Phase::Playing;
        state.score = 12;
        sink_actor(&mut state);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.best, 12);
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::SessionEnded {
                score: 12,
                best: 12,
                new_best: true
            })
        ));
    }

    #[test]
    fn reset_restores_fresh_session() {
        let mut state = new_state(1);
        for i in 0..200 {
            let input = FrameInput {
                flap: i % 15 == 0,
                reset: false,
            };
            tick(&mut state, &input);
        }
        state.best = 3;

        tick(&mut state, &RESET);

        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 1, "reset restarts the tick counter");
        assert_eq!(state.actor.pos.y, 288.0);
        assert_eq!(state.actor.vy, 0.0);
        assert_eq!(state.stream.len(), 4);
        let xs: Vec<f32> = state.stream.iter().map(|g| g.x).collect();
        assert_eq!(xs[0], 620.0);
        assert!((xs[1] - xs[0] - 210.0).abs() < 1e-3);
        assert_eq!(state.best, 3, "best survives reset");
    }

    #[test]
    fn reset_plus_flap_restarts_into_play() {
        let mut state = new_state(1);
        tick(&mut state, &FLAP);
        sink_actor(&mut state);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, Phase::GameOver);

        // A tap during game over maps to reset + flap in one frame: the
        // reset applies first, then the flap starts the new session
        tick(
            &mut state,
            &FrameInput {
                flap: true,
                reset: true,
            },
        );
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.actor.vy, -8.3);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn same_seed_same_session() {
        let mut a = new_state(4242);
        let mut b = new_state(4242);
        for i in 0..2500 {
            let input = FrameInput {
                flap: i % 17 == 0,
                reset: i == 1200,
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.ticks, b.ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.actor.pos.y, b.actor.pos.y);
        let xa: Vec<f32> = a.stream.iter().map(|g| g.x).collect();
        let xb: Vec<f32> = b.stream.iter().map(|g| g.x).collect();
        assert_eq!(xa, xb);
    }
}
