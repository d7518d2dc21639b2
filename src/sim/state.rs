//! Game state and phase machine
//!
//! Everything the per-frame loop mutates lives here, passed by reference down
//! the tick path: no globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rapier2d::prelude::RigidBodyHandle;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::builder::CourseBuilder;
use crate::sim::physics::PhysicsWorld;
use crate::sim::registry::EntityRegistry;
use crate::{meters_to_pixels, pixels_to_meters};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first upward input; the camera holds still
    NotReady,
    /// Camera advancing, course streaming
    Active,
    /// Terminal: the character reached the course end
    Won,
    /// Terminal: the character left the bounds or fell behind the camera
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// One-shot notifications drained by the shell each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected,
    Victory,
}

/// Scrolling view. The center doubles as the render offset and as the
/// reference point for generation and pruning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Center in pixels
    pub center: Vec2,
    /// View size in pixels
    pub size: Vec2,
}

impl Camera {
    /// Frame the opening field: half a view in, nudged 450 px left and 200 px
    /// below the ground band.
    pub fn new(size: Vec2) -> Self {
        let center = Vec2::new(
            size.x / 2.0 - 450.0,
            size.y / 2.0 + 200.0 - meters_to_pixels(GROUND_HEIGHT) / 2.0,
        );
        Self { center, size }
    }

    pub fn advance(&mut self, step_px: f32) {
        self.center.x += step_px;
    }

    pub fn center_x_meters(&self) -> f32 {
        pixels_to_meters(self.center.x)
    }
}

/// Complete game state for one run
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    pub camera: Camera,
    pub physics: PhysicsWorld,
    pub entities: EntityRegistry,
    pub character: RigidBodyHandle,
    /// Rightward-drift mode; cleared while a thrust key is held
    pub drifting: bool,
    /// The closing composition is placed at most once
    pub ending_spawned: bool,
    pub settings: Settings,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build the opening course and a fresh state around it.
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut physics = PhysicsWorld::new(GRAVITY);
        let mut entities = EntityRegistry::new();
        let character = CourseBuilder::new(&mut physics, &mut entities).initial_course();
        log::info!("new run: seed={seed}");

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotReady,
            score: 0,
            camera: Camera::new(Vec2::new(VIEW_WIDTH, VIEW_HEIGHT)),
            physics,
            entities,
            character,
            drifting: true,
            ending_spawned: false,
            settings,
            events: Vec::new(),
        }
    }

    pub fn character_position(&self) -> Option<Vec2> {
        self.physics.position(self.character)
    }

    /// Rightmost x over all live bodies: the streaming frontier.
    pub fn rightmost_entity_x(&self) -> f32 {
        self.entities
            .iter()
            .filter_map(|e| self.physics.position(e.body))
            .fold(0.0, |acc, p| acc.max(p.x))
    }

    /// HUD banner for terminal phases
    pub fn banner(&self) -> Option<String> {
        match self.phase {
            GamePhase::Won => Some(format!("YOU WON! {}", self.score)),
            GamePhase::Lost => Some("YOU LOST!".to_string()),
            _ => None,
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::EntityKind;

    #[test]
    fn new_state_starts_idle() {
        let state = GameState::new(1, Settings::default());
        assert_eq!(state.phase, GamePhase::NotReady);
        assert!(state.drifting);
        assert!(!state.ending_spawned);
        assert_eq!(state.score, 0);
        assert!(state.banner().is_none());
    }

    #[test]
    fn opening_course_layout() {
        let state = GameState::new(1, Settings::default());
        // Two ground strips, one character, the 5-step staircase, two wide
        // closers, and five block groups. No coins until streaming begins.
        assert_eq!(state.entities.count_of(EntityKind::Ground), 2);
        assert_eq!(state.entities.count_of(EntityKind::Character), 1);
        assert_eq!(state.entities.count_of(EntityKind::StoneBlock), 12);
        assert_eq!(state.entities.count_of(EntityKind::Coin), 0);

        let character = state.character_position().expect("character exists");
        assert!((character.x + 9.0).abs() < 1e-6);
        assert!((character.y - 10.0).abs() < 1e-6);

        // The frontier is the round-2 block group at x = 30 + 10.
        assert!((state.rightmost_entity_x() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn camera_starts_left_of_view_center() {
        let state = GameState::new(1, Settings::default());
        assert!((state.camera.center.x - (VIEW_WIDTH / 2.0 - 450.0)).abs() < 1e-3);
        assert!(
            (state.camera.center_x_meters() - pixels_to_meters(state.camera.center.x)).abs() < 1e-6
        );
    }

    #[test]
    fn banner_reports_terminal_phases() {
        let mut state = GameState::new(1, Settings::default());
        state.score = 7;
        state.phase = GamePhase::Won;
        assert_eq!(state.banner().as_deref(), Some("YOU WON! 7"));
        state.phase = GamePhase::Lost;
        assert_eq!(state.banner().as_deref(), Some("YOU LOST!"));
    }

    #[test]
    fn take_events_drains() {
        let mut state = GameState::new(1, Settings::default());
        state.events.push(GameEvent::CoinCollected);
        assert_eq!(state.take_events(), vec![GameEvent::CoinCollected]);
        assert!(state.take_events().is_empty());
    }
}
