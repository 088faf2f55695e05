use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::CatalogError;
use crate::models::Song;

/// Root of the music list document. The element name itself is not checked,
/// and other elements may sit between the `<music>` entries.
#[derive(Debug, Deserialize)]
struct MusicList {
    #[serde(rename = "music", default)]
    music: Vec<MusicEntry>,
}

#[derive(Debug, Deserialize)]
struct MusicEntry {
    #[serde(rename = "@id")]
    id: i64,
    /// A missing `<info>` leaves title and artist empty.
    #[serde(default)]
    info: MusicInfo,
}

#[derive(Debug, Default, Deserialize)]
struct MusicInfo {
    #[serde(default)]
    title_name: String,
    #[serde(default)]
    artist_name: String,
}

/// Read-only song table: insertion order for listing and search, plus an id
/// index for lookups. Every id in the index points at exactly one entry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    by_id: HashMap<i64, usize>,
}

impl Catalog {
    /// Build the table in one pass. A repeated id replaces the earlier song in
    /// place so the index and the sequence stay the same size.
    pub fn from_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        let mut catalog = Self::default();
        for song in songs {
            match catalog.by_id.get(&song.id) {
                Some(&pos) => {
                    warn!("duplicate music id {} in catalog, keeping the later entry", song.id);
                    catalog.songs[pos] = song;
                }
                None => {
                    catalog.by_id.insert(song.id, catalog.songs.len());
                    catalog.songs.push(song);
                }
            }
        }
        catalog
    }

    /// Song with catalog id `id`, if there is one.
    pub fn get(&self, id: i64) -> Option<&Song> {
        self.by_id.get(&id).map(|&pos| &self.songs[pos])
    }

    /// Look up `id`, substituting an "unknown" song when it is missing. A miss
    /// is logged but never an error.
    pub fn resolve(&self, id: i64) -> Song {
        match self.get(id) {
            Some(song) => song.clone(),
            None => {
                warn!("{id} not found in music list");
                Song::unknown(id)
            }
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Song used to seed freshly created folders: the lowest catalog id.
    pub fn seed_song(&self) -> Option<&Song> {
        self.songs.iter().min_by_key(|song| song.id)
    }
}

/// Parse a music list document.
pub fn parse_catalog(xml: &str) -> Result<Catalog, quick_xml::DeError> {
    let list: MusicList = quick_xml::de::from_str(xml)?;
    Ok(Catalog::from_songs(list.music.into_iter().map(|entry| Song {
        id: entry.id,
        title: entry.info.title_name,
        artist: entry.info.artist_name,
    })))
}

/// Load the catalog from disk. Any failure here is fatal to the program.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let xml = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&xml).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("music list loaded {} songs", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<data>
  <music id="2">
    <info>
      <title_name>Song B</title_name>
      <artist_name>Artist Y</artist_name>
      <genre_name>TRANCE</genre_name>
    </info>
  </music>
  <music id="1">
    <info>
      <title_name>Song A</title_name>
      <artist_name>Artist X</artist_name>
    </info>
  </music>
</data>
"#;

    #[test]
    fn parses_entries_in_document_order() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let ids: Vec<i64> = catalog.songs().iter().map(|song| song.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(catalog.get(1).unwrap().title, "Song A");
        assert_eq!(catalog.get(2).unwrap().artist, "Artist Y");
    }

    #[test]
    fn every_song_is_reachable_by_id() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        for song in catalog.songs() {
            assert_eq!(catalog.get(song.id), Some(song));
        }
        assert_eq!(catalog.by_id.len(), catalog.songs().len());
    }

    #[test]
    fn duplicate_ids_keep_one_entry() {
        let song = |id, title: &str| Song {
            id,
            title: title.to_string(),
            artist: "a".to_string(),
        };
        let catalog = Catalog::from_songs(vec![song(5, "old"), song(6, "other"), song(5, "new")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.by_id.len(), 2);
        assert_eq!(catalog.songs()[0].title, "new");
        assert_eq!(catalog.get(5).unwrap().title, "new");
    }

    #[test]
    fn other_elements_between_entries_are_ignored() {
        let xml = r#"<data>
  <music id="1">
    <info><title_name>Song A</title_name><artist_name>Artist X</artist_name></info>
  </music>
  <note/>
  <revision>3</revision>
  <music id="2">
    <info><title_name>Song B</title_name><artist_name>Artist Y</artist_name></info>
  </music>
</data>"#;
        let catalog = parse_catalog(xml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(2).unwrap().title, "Song B");
    }

    #[test]
    fn entry_without_info_has_empty_fields() {
        let xml = r#"<data>
  <music id="7"/>
  <music id="8">
    <info><title_name>Song C</title_name><artist_name>Artist Z</artist_name></info>
  </music>
</data>"#;
        let catalog = parse_catalog(xml).unwrap();
        assert_eq!(catalog.len(), 2);
        let bare = catalog.get(7).unwrap();
        assert!(bare.title.is_empty());
        assert!(bare.artist.is_empty());
        assert_eq!(catalog.get(8).unwrap().artist, "Artist Z");
    }

    #[test]
    fn resolve_substitutes_unknown_song() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.resolve(1).title, "Song A");
        assert_eq!(catalog.resolve(99), Song::unknown(99));
    }

    #[test]
    fn seed_song_is_lowest_id() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.seed_song().map(|song| song.id), Some(1));
        assert!(Catalog::default().seed_song().is_none());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let err = load_catalog(&temp.path().join("absent.xml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.xml");
        fs::write(&path, "<data><music id=\"x\"><info></music>").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("video_music_list.xml");
        fs::write(&path, SAMPLE).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
