//! Linear search over the catalog and the loaded playlists. Both searches
//! report one hit per matching field, so a song whose title and artist both
//! contain the term shows up twice.

use std::path::Path;

use crate::models::{Chart, Folder, PlaylistSet, Song};
use crate::store::Catalog;

/// Which field of a song or chart matched the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Id,
    Title,
    Artist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHit<'a> {
    pub song: &'a Song,
    pub field: MatchField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistHit<'a> {
    pub file: &'a Path,
    pub folder: &'a Folder,
    pub chart: &'a Chart,
    pub field: MatchField,
}

/// Search the catalog. A numeric term is first tried as an id, then every song
/// is checked for a case-insensitive substring match on artist and on title.
/// A blank term yields nothing.
pub fn search_catalog<'a>(catalog: &'a Catalog, term: &str) -> Vec<CatalogHit<'a>> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    if let Some(song) = term.parse::<i64>().ok().and_then(|id| catalog.get(id)) {
        hits.push(CatalogHit {
            song,
            field: MatchField::Id,
        });
    }

    let needle = term.to_lowercase();
    for song in catalog.songs() {
        for field in text_matches(&song.title, &song.artist, &needle) {
            hits.push(CatalogHit { song, field });
        }
    }
    hits
}

/// Search every chart of every loaded playlist. A chart matches on its id when
/// the term is a number, and on artist or title by case-insensitive substring.
/// A blank term yields nothing.
pub fn search_playlists<'a>(playlists: &'a PlaylistSet, term: &str) -> Vec<PlaylistHit<'a>> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let id = term.parse::<i64>().ok();
    let needle = term.to_lowercase();
    let mut hits = Vec::new();
    for file in &playlists.files {
        for folder in &file.folders {
            for chart in &folder.charts {
                let id_hit = (id == Some(chart.entry_id)).then_some(MatchField::Id);
                for field in id_hit
                    .into_iter()
                    .chain(text_matches(&chart.title, &chart.artist, &needle))
                {
                    hits.push(PlaylistHit {
                        file: &file.path,
                        folder,
                        chart,
                        field,
                    });
                }
            }
        }
    }
    hits
}

/// Artist is checked before title so the output order is stable.
fn text_matches(title: &str, artist: &str, needle: &str) -> Vec<MatchField> {
    let mut fields = Vec::with_capacity(2);
    if artist.to_lowercase().contains(needle) {
        fields.push(MatchField::Artist);
    }
    if title.to_lowercase().contains(needle) {
        fields.push(MatchField::Title);
    }
    fields
}
