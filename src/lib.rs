//! Drift Runner - a side-scrolling gravity-flip platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics world, streaming course builder, game loop)
//! - `render`: Draw-call contract consumed by a rendering frontend
//! - `audio`: Sound-effect contract consumed by an audio frontend
//! - `assets`: Asset manifest shared with frontends
//! - `settings`: Tunable gameplay thresholds

pub mod assets;
pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Renderer scale factor: pixels per physics meter
    pub const PIXELS_PER_METER: f32 = 32.0;

    /// Fixed view size in pixels; the height doubles as the vertical-flip reference
    pub const VIEW_WIDTH: f32 = 1600.0;
    pub const VIEW_HEIGHT: f32 = 900.0;

    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
    /// Velocity solver iterations per step
    pub const SOLVER_ITERATIONS: usize = 6;

    /// Resting gravity, also restored once a run ends
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -10.0);
    /// Gravity magnitude while a thrust key is held
    pub const THRUST_GRAVITY: f32 = 200.0;
    /// Vertical kick applied on a thrust keypress
    pub const THRUST_SPEED: f32 = 10.0;
    /// Horizontal speed while drifting rightward
    pub const DRIFT_SPEED: f32 = 10.0;

    /// Ground strip size in meters
    pub const GROUND_WIDTH: f32 = 20.0;
    pub const GROUND_HEIGHT: f32 = 10.0;
    /// Height of the upper ground band above the lower one
    pub const GROUND_BAND_OFFSET: f32 = 25.0;

    pub const STONE_BLOCK_WIDTH: f32 = 4.0;
    pub const STONE_BLOCK_HEIGHT: f32 = 2.0;
    pub const CHARACTER_WIDTH: f32 = 2.0;
    pub const CHARACTER_HEIGHT: f32 = 4.0;
    pub const COIN_SIZE: f32 = 1.0;

    pub const CHARACTER_DENSITY: f32 = 3.0;
    pub const COIN_DENSITY: f32 = 3.0;
    pub const GROUND_FRICTION: f32 = 0.2;

    /// Wide platform segment of an obstacle pair
    pub const OBSTACLE_PLATFORM_WIDTH: f32 = 12.0;
    /// Narrow capstone of an obstacle pair
    pub const OBSTACLE_CAP_WIDTH: f32 = 2.0;
    /// Vertical offset of the capstone, signed by the top flag
    pub const OBSTACLE_CAP_RISE: f32 = 2.0;
    /// Platform used by `block_group`
    pub const BLOCK_GROUP_WIDTH: f32 = 10.0;

    /// Obstacle lane heights, in meters
    pub const TOP_LANE_Y: f32 = 23.0;
    pub const MID_HIGH_LANE_Y: f32 = 14.0;
    pub const MID_LOW_LANE_Y: f32 = 11.0;
    pub const BOTTOM_LANE_Y: f32 = 1.0;

    pub const COIN_ROW_LEN: usize = 5;
    pub const COIN_SPACING: f32 = 2.0;
    /// Coin rows sit this far above or below their obstacle lane
    pub const COIN_ROW_OFFSET: f32 = 2.0;

    /// Obstacle-pair iterations per streamed batch
    pub const STREAM_ITERATIONS: usize = 10;
    /// Horizontal pitch between batch iterations
    pub const STREAM_PITCH: f32 = 12.0;
    /// Extra x offset of the mid-lane pairs inside an iteration
    pub const MID_LANE_NUDGE: f32 = 8.0;

    pub const STAIR_STEPS: usize = 5;

    /// HUD character size in pixels
    pub const HUD_TEXT_SIZE: f32 = 220.0;
}

/// Convert a pixel distance to physics meters
#[inline]
pub fn pixels_to_meters(pixels: f32) -> f32 {
    pixels / consts::PIXELS_PER_METER
}

/// Convert a physics-meter distance to pixels
#[inline]
pub fn meters_to_pixels(meters: f32) -> f32 {
    meters * consts::PIXELS_PER_METER
}

/// Map a vertical coordinate between the physics Y-up frame and the screen
/// Y-down frame. The reference height is constant, so the same formula works
/// in both directions.
#[inline]
pub fn flip_y(v: f32) -> f32 {
    pixels_to_meters(consts::VIEW_HEIGHT) - v
}

#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * (180.0 / std::f32::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn flip_y_is_involution() {
        for v in [0.0, 5.0, 14.0625, 28.125, -3.0, 100.0] {
            assert!((flip_y(flip_y(v)) - v).abs() < 1e-3);
        }
    }

    #[test]
    fn flip_y_maps_floor_to_screen_bottom() {
        // Physics y = 0 lands at the bottom edge of the fixed view.
        assert!((meters_to_pixels(flip_y(0.0)) - consts::VIEW_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn radians_to_degrees_quarter_turn() {
        assert!((radians_to_degrees(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn meters_pixels_round_trip(x in -1.0e6f32..1.0e6f32) {
            let round_trip = meters_to_pixels(pixels_to_meters(x));
            prop_assert!((round_trip - x).abs() <= x.abs().max(1.0) * 1e-6);
        }

        #[test]
        fn pixels_meters_round_trip(p in -1.0e6f32..1.0e6f32) {
            let round_trip = pixels_to_meters(meters_to_pixels(p));
            prop_assert!((round_trip - p).abs() <= p.abs().max(1.0) * 1e-6);
        }
    }
}
