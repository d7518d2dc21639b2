//! Deterministic game simulation
//!
//! All gameplay logic lives here. The module is single-threaded and
//! deterministic: fixed timestep, seeded RNG, and no rendering or platform
//! dependencies.

pub mod builder;
pub mod physics;
pub mod registry;
pub mod state;
pub mod tick;

pub use builder::CourseBuilder;
pub use physics::{BodyKind, BodySpec, PhysicsWorld, ShapeSpec};
pub use registry::{Entity, EntityKind, EntityRegistry};
pub use state::{Camera, GameEvent, GamePhase, GameState};
pub use tick::{FrameInput, InputEvent, Key, tick};
