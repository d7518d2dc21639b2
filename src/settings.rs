//! Gameplay tuning
//!
//! The thresholds that drive camera advance, streaming, pruning, and the
//! win/lose rules. Defaults reproduce the game's canonical values; a JSON
//! file can override them for testing and balancing.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera advance per frame, in pixels
    pub camera_step_px: f32,
    /// Stream a new batch when the frontier is at most this many pixels
    /// ahead of the camera center
    pub stream_trigger_px: f32,
    /// Drop entities this many meters behind the camera center
    pub prune_distance: f32,
    /// Character x (meters) past which streaming stops and the ending spawns
    pub ending_threshold: f32,
    /// Character x (meters) that wins the run
    pub win_threshold: f32,
    /// Losing bounds on character y (meters)
    pub lose_ceiling: f32,
    pub lose_floor: f32,
    /// Extra slack (meters) beyond half a view before the camera-outran rule
    /// loses the run
    pub camera_lag_margin: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_step_px: 4.3,
            stream_trigger_px: 720.0,
            prune_distance: 62.5,
            ending_threshold: 500.0,
            win_threshold: 574.0,
            lose_ceiling: 30.0,
            lose_floor: 0.0,
            camera_lag_margin: 2.0,
        }
    }
}

impl Settings {
    const FILE: &'static str = "drift-runner.settings.json";

    /// Load from the default settings file, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE))
    }

    /// Load from `path`. A missing or unreadable file is not an error: the
    /// defaults always work.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!(
                        "settings file {} is malformed ({err}); using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_canonical_literals() {
        let settings = Settings::default();
        assert_eq!(settings.camera_step_px, 4.3);
        assert_eq!(settings.stream_trigger_px, 720.0);
        assert_eq!(settings.prune_distance, 62.5);
        assert_eq!(settings.ending_threshold, 500.0);
        assert_eq!(settings.win_threshold, 574.0);
        assert_eq!(settings.lose_ceiling, 30.0);
        assert_eq!(settings.lose_floor, 0.0);
        assert_eq!(settings.camera_lag_margin, 2.0);
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings {
            win_threshold: 100.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).expect("serialize");
        let back: Settings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, settings);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let back: Settings = serde_json::from_str(r#"{"win_threshold": 50.0}"#).expect("parse");
        assert_eq!(back.win_threshold, 50.0);
        assert_eq!(back.camera_step_px, 4.3);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/drift-runner.json"));
        assert_eq!(settings, Settings::default());
    }
}
