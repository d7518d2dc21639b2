//! drift-runner entry point
//!
//! No windowed frontend ships with this crate: running the binary performs a
//! headless soak of the simulation with a scripted pilot, then reports the
//! outcome and the frame's draw-call count.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use drift_runner::Settings;
use drift_runner::audio::{self, NullAudio};
use drift_runner::render::{RecordingCanvas, draw_scene};
use drift_runner::sim::{EntityKind, FrameInput, GameState, InputEvent, Key, tick};

/// Ten minutes of simulated play at 60 Hz
const SOAK_FRAME_LIMIT: u32 = 36_000;

fn main() {
    env_logger::init();
    log::info!("drift-runner starting");

    if let Err(err) = drift_runner::assets::verify_manifest(Path::new(".")) {
        log::warn!("{err}; a rendering frontend must treat this as fatal");
    }

    let settings = Settings::load();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());

    let mut state = GameState::new(seed, settings);
    let mut audio_sink = NullAudio;
    let mut pilot = Pilot::default();
    let mut frames = 0;

    for frame in 0..SOAK_FRAME_LIMIT {
        let input = pilot.decide(&state, frame);
        tick(&mut state, &input);
        let events = state.take_events();
        audio::dispatch(&events, &mut audio_sink);
        frames = frame + 1;
        if state.phase.is_terminal() {
            break;
        }
    }

    let mut canvas = RecordingCanvas::default();
    draw_scene(&state, &mut canvas);

    log::info!(
        "soak finished after {frames} frames: phase={:?} score={} entities={} coins_left={} draw_calls={}",
        state.phase,
        state.score,
        state.entities.len(),
        state.entities.count_of(EntityKind::Coin),
        canvas.commands.len(),
    );
}

/// Bang-bang altitude pilot: a short upward thrust when sinking low, a short
/// downward one when floating high, released on the following frame.
#[derive(Default)]
struct Pilot {
    pending_release: Option<Key>,
}

impl Pilot {
    const LOW_WATER: f32 = 9.0;
    const HIGH_WATER: f32 = 16.0;

    fn decide(&mut self, state: &GameState, frame: u32) -> FrameInput {
        let mut input = FrameInput::default();

        if let Some(key) = self.pending_release.take() {
            input.events.push(InputEvent::KeyReleased(key));
            return input;
        }

        if frame == 0 {
            self.pending_release = Some(Key::Up);
            input.events.push(InputEvent::KeyPressed(Key::Up));
            return input;
        }

        let Some(position) = state.character_position() else {
            return input;
        };
        if position.y < Self::LOW_WATER {
            self.pending_release = Some(Key::Up);
            input.events.push(InputEvent::KeyPressed(Key::Up));
        } else if position.y > Self::HIGH_WATER {
            self.pending_release = Some(Key::Down);
            input.events.push(InputEvent::KeyPressed(Key::Down));
        }
        input
    }
}
