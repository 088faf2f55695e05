//! Editor for beatmania IIDX favourite-song playlists.
//!
//! The song catalog is loaded once from the game's music list; playlists are
//! JSON documents in a flat directory, reloaded for every command and written
//! back after every edit.
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod ui;

pub use config::Config;
pub use error::{CatalogError, StoreError};
pub use models::{Chart, Difficulty, Folder, PlaylistFile, PlaylistSet, SkippedFile, Song};
pub use store::{load_catalog, load_playlists, save_playlist, Catalog};

/// The interactive application entry point and state container.
pub use ui::{App, Console};
