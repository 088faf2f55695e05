//! Persistence: the read-only song catalog and the directory of playlist
//! documents.

mod catalog;
mod playlists;

pub use catalog::{load_catalog, parse_catalog, Catalog};
pub use playlists::{
    create_folder, create_playlist_file, enrich, load_playlist_file, load_playlists,
    save_playlist, timestamp,
};
