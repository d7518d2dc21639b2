//! Per-frame game loop
//!
//! Order matters and is fixed: input, prune, generation, drift, lose/win
//! evaluation, camera advance, physics step, contact reconciliation. The
//! whole frame mutates one `GameState` and nothing else.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use crate::consts::*;
use crate::meters_to_pixels;
use crate::pixels_to_meters;
use crate::sim::builder::CourseBuilder;
use crate::sim::registry::{EntityKind, EntityRegistry};
use crate::sim::state::{GameEvent, GamePhase, GameState};

/// Thrust keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
}

/// Input events observed since the previous frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    /// The shell decides when to stop looping; the simulation ignores this.
    WindowClosed,
}

/// One frame's worth of input
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    pub fn pressed(key: Key) -> Self {
        Self {
            events: vec![InputEvent::KeyPressed(key)],
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            events: vec![InputEvent::KeyReleased(key)],
        }
    }
}

/// Advance the game by one fixed frame.
pub fn tick(state: &mut GameState, input: &FrameInput) {
    handle_input(state, input);
    prune_behind_camera(state);
    let frontier = state.rightmost_entity_x();
    generate_ahead(state, frontier);
    steer(state);
    evaluate_phase(state);
    if state.phase == GamePhase::Active {
        state.camera.advance(state.settings.camera_step_px);
    }

    let contacts = state.physics.step(FIXED_TIMESTEP);
    let collected = collect_coins(&state.entities, &contacts);
    state.score += collected.len() as u32;
    apply_collection(state, collected);
}

fn handle_input(state: &mut GameState, input: &FrameInput) {
    for event in &input.events {
        match event {
            InputEvent::KeyPressed(Key::Up) => {
                if state.phase == GamePhase::NotReady {
                    state.phase = GamePhase::Active;
                    log::info!("run started");
                }
                state.drifting = false;
                state
                    .physics
                    .set_linear_velocity(state.character, Vec2::new(0.0, THRUST_SPEED));
                state.physics.set_gravity(Vec2::new(0.0, THRUST_GRAVITY));
            }
            InputEvent::KeyPressed(Key::Down) => {
                state.drifting = false;
                state
                    .physics
                    .set_linear_velocity(state.character, Vec2::new(0.0, -THRUST_SPEED));
                state.physics.set_gravity(Vec2::new(0.0, -THRUST_GRAVITY));
            }
            InputEvent::KeyReleased(_) => state.drifting = true,
            InputEvent::WindowClosed => {}
        }
    }
}

/// Drop every non-character entity that fell far enough behind the camera.
fn prune_behind_camera(state: &mut GameState) {
    let camera_x = state.camera.center_x_meters();
    let doomed: Vec<RigidBodyHandle> = state
        .entities
        .iter()
        .filter(|e| e.kind != EntityKind::Character)
        .filter_map(|e| {
            let position = state.physics.position(e.body)?;
            (camera_x - position.x > state.settings.prune_distance).then_some(e.body)
        })
        .collect();

    for body in doomed {
        state.physics.destroy_body(body);
        state.entities.remove_by_body(body);
    }
}

/// Stream a new batch when the frontier gets close to the view, or place the
/// one-shot ending once the character is near the goal.
fn generate_ahead(state: &mut GameState, frontier: f32) {
    let Some(character) = state.physics.position(state.character) else {
        log::error!("generate_ahead: character body is missing");
        return;
    };

    if meters_to_pixels(frontier) - state.camera.center.x <= state.settings.stream_trigger_px
        && character.x < state.settings.ending_threshold
    {
        let mut course = CourseBuilder::new(&mut state.physics, &mut state.entities);
        course.batch(&mut state.rng, frontier);
        log::debug!("streamed batch ahead of x={frontier:.1}");
    } else if character.x >= state.settings.ending_threshold && !state.ending_spawned {
        state.ending_spawned = true;
        CourseBuilder::new(&mut state.physics, &mut state.entities).ending(frontier);
        log::info!("ending composition placed at x={frontier:.1}");
    }
}

/// Rightward drift while live; once the run ends, hold the character still
/// under a gentle restoring gravity.
fn steer(state: &mut GameState) {
    if state.phase.is_terminal() {
        state.physics.set_linear_velocity(state.character, Vec2::ZERO);
        state.physics.set_gravity(GRAVITY);
    } else if state.drifting {
        state
            .physics
            .set_linear_velocity(state.character, Vec2::new(DRIFT_SPEED, 0.0));
    }
}

/// Lose conditions first, then the win condition; terminal phases absorb.
fn evaluate_phase(state: &mut GameState) {
    if state.phase.is_terminal() {
        return;
    }
    let Some(character) = state.physics.position(state.character) else {
        log::error!("evaluate_phase: character body is missing");
        return;
    };

    if character.y >= state.settings.lose_ceiling || character.y <= state.settings.lose_floor {
        state.phase = GamePhase::Lost;
        log::info!("run lost: out of bounds at y={:.1}", character.y);
        return;
    }

    let camera_x = state.camera.center_x_meters();
    let max_lag = pixels_to_meters(state.camera.size.x / 2.0) + state.settings.camera_lag_margin;
    if camera_x - character.x > max_lag {
        state.phase = GamePhase::Lost;
        log::info!("run lost: camera outran the character");
        return;
    }

    if character.x >= state.settings.win_threshold {
        state.phase = GamePhase::Won;
        state.events.push(GameEvent::Victory);
        log::info!("run won with score {}", state.score);
    }
}

/// Match contact-begin pairs against coin records. Every touched coin is
/// queued exactly once, so several coins in one step all count.
fn collect_coins(
    entities: &EntityRegistry,
    contacts: &[(RigidBodyHandle, RigidBodyHandle)],
) -> Vec<RigidBodyHandle> {
    let mut pending = Vec::new();
    for &(a, b) in contacts {
        for body in [a, b] {
            if pending.contains(&body) {
                continue;
            }
            if entities
                .get_by_body(body)
                .is_some_and(|e| e.kind == EntityKind::Coin)
            {
                pending.push(body);
            }
        }
    }
    pending
}

/// Destroy queued coins and drop their records in the same frame.
fn apply_collection(state: &mut GameState, pending: Vec<RigidBodyHandle>) {
    for body in pending {
        state.physics.destroy_body(body);
        if state.entities.remove_by_body(body) {
            state.events.push(GameEvent::CoinCollected);
        } else {
            log::warn!("collected coin had no registry record");
        }
    }
}
