use std::fs;
use std::path::PathBuf;

use crate::error::StoreError;

/// Catalog location relative to the working directory. The game data layout
/// puts the music list under `data/info/0`.
pub const CATALOG_PATH: &str = "data/info/0/video_music_list.xml";
/// Flat directory holding one JSON document per playlist.
pub const PLAYLIST_DIR: &str = "playlists";

/// Filesystem locations the editor works with. There are no flags or
/// environment overrides; `Default` is what the binary uses and tests build
/// their own pointing at temporary directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub playlist_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(CATALOG_PATH),
            playlist_dir: PathBuf::from(PLAYLIST_DIR),
        }
    }
}

impl Config {
    pub fn new(catalog_path: impl Into<PathBuf>, playlist_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            playlist_dir: playlist_dir.into(),
        }
    }

    /// Create the playlist directory if it does not exist yet, so a fresh
    /// install can still create its first playlist.
    pub fn ensure_playlist_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.playlist_dir).map_err(|source| StoreError::CreateDir {
            path: self.playlist_dir.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_game_layout() {
        let config = Config::default();
        assert_eq!(config.catalog_path, PathBuf::from(CATALOG_PATH));
        assert_eq!(config.playlist_dir, PathBuf::from(PLAYLIST_DIR));
    }

    #[test]
    fn ensure_playlist_dir_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("playlists");
        let config = Config::new(temp.path().join("catalog.xml"), &dir);

        config.ensure_playlist_dir().unwrap();
        assert!(dir.is_dir());
        // Second call is a no-op.
        config.ensure_playlist_dir().unwrap();
    }
}
