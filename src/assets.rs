//! Asset manifest shared with rendering/audio frontends
//!
//! The simulation never opens these files; frontends resolve keys to paths,
//! preload everything up front, and treat a missing asset as fatal rather
//! than limping into a garbage state.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKey {
    Ground,
    Stone,
    Character,
}

impl TextureKey {
    pub const fn path(self) -> &'static str {
        match self {
            TextureKey::Ground => "Assets/blue_box.png",
            TextureKey::Stone => "Assets/horizontal_box.png",
            TextureKey::Character => "Assets/astronaut.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKey {
    Coin,
    Victory,
}

impl SoundKey {
    pub const fn path(self) -> &'static str {
        match self {
            SoundKey::Coin => "Assets/coins.wav",
            SoundKey::Victory => "Assets/victory.ogg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKey {
    Hud,
}

impl FontKey {
    pub const fn path(self) -> &'static str {
        match self {
            FontKey::Hud => "Font/Changa-VariableFont_wght.ttf",
        }
    }
}

/// Every file a frontend must be able to load before the game starts.
pub fn manifest() -> [&'static str; 6] {
    [
        TextureKey::Ground.path(),
        TextureKey::Stone.path(),
        TextureKey::Character.path(),
        SoundKey::Coin.path(),
        SoundKey::Victory.path(),
        FontKey::Hud.path(),
    ]
}

/// Asset loading failure. Fatal at startup for any frontend that consumes
/// the asset in question.
#[derive(Debug)]
pub enum AssetError {
    Missing(PathBuf),
    Undecodable { path: PathBuf, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing(path) => write!(f, "asset not found: {}", path.display()),
            AssetError::Undecodable { path, reason } => {
                write!(f, "asset {} could not be decoded: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Check that every manifest entry exists under `root`.
pub fn verify_manifest(root: &Path) -> Result<(), AssetError> {
    for relative in manifest() {
        let path = root.join(relative);
        if !path.is_file() {
            return Err(AssetError::Missing(path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_paths_are_unique() {
        let paths = manifest();
        for (i, a) in paths.iter().enumerate() {
            for b in &paths[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn missing_asset_is_reported_with_its_path() {
        let err = verify_manifest(Path::new("/nonexistent/drift-runner-assets"))
            .expect_err("no assets there");
        let text = err.to_string();
        assert!(text.contains("asset not found"));
        assert!(text.contains("blue_box.png"));
    }

    #[test]
    fn undecodable_reports_reason() {
        let err = AssetError::Undecodable {
            path: PathBuf::from("Assets/coins.wav"),
            reason: "bad RIFF header".to_string(),
        };
        assert!(err.to_string().contains("bad RIFF header"));
    }
}
