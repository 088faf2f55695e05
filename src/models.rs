//! Domain models shared by the store, search, and terminal layers. These stay
//! plain data holders; the only behaviour kept here is the bookkeeping that must
//! hold after every mutation (chart counts and catalog-derived display fields).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Display value used for charts whose id is missing from the catalog.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of the song catalog. Loaded once at startup and never mutated.
pub struct Song {
    /// Catalog primary key, also the `entry_id` that charts reference.
    pub id: i64,
    pub title: String,
    pub artist: String,
}

impl Song {
    /// Stand-in for an id the catalog does not know. Charts pointing at such
    /// ids are still valid and can be inserted.
    pub fn unknown(id: i64) -> Self {
        Self {
            id,
            title: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.title, self.artist)
    }
}

/// Chart difficulty as stored in playlist documents.
///
/// Values outside the five known levels are kept verbatim in `Other` so that
/// rewriting a file never loses what another tool put there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Beginner,
    Normal,
    Hyper,
    Another,
    Leggendaria,
    Other(String),
}

impl Difficulty {
    /// Ordered list of the selectable levels, matching the 1-5 menu numbers.
    pub const LEVELS: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Normal,
        Difficulty::Hyper,
        Difficulty::Another,
        Difficulty::Leggendaria,
    ];

    /// Map a menu number onto a level. Anything outside 1-5 falls back to
    /// `another`, which is also what a blank answer parses to.
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Difficulty::Beginner,
            2 => Difficulty::Normal,
            3 => Difficulty::Hyper,
            5 => Difficulty::Leggendaria,
            _ => Difficulty::Another,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Normal => "normal",
            Difficulty::Hyper => "hyper",
            Difficulty::Another => "another",
            Difficulty::Leggendaria => "leggendaria",
            Difficulty::Other(raw) => raw,
        }
    }
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "beginner" => Difficulty::Beginner,
            "normal" => Difficulty::Normal,
            "hyper" => Difficulty::Hyper,
            "another" => Difficulty::Another,
            "leggendaria" => Difficulty::Leggendaria,
            _ => Difficulty::Other(raw),
        }
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A difficulty-tagged reference to a catalog song inside a folder.
pub struct Chart {
    pub entry_id: i64,
    pub difficulty: Difficulty,
    /// Filled from the catalog on every load; never read from or written to
    /// disk.
    #[serde(skip)]
    pub title: String,
    #[serde(skip)]
    pub artist: String,
}

impl Chart {
    pub fn from_song(song: &Song, difficulty: Difficulty) -> Self {
        Self {
            entry_id: song.id,
            difficulty,
            title: song.title.clone(),
            artist: song.artist.clone(),
        }
    }

    /// Overwrite the display fields with the catalog's view of this chart.
    pub fn enrich(&mut self, song: &Song) {
        self.title = song.title.clone();
        self.artist = song.artist.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Named group of charts. `play_style` is "SP" or "DP" by convention only.
pub struct Folder {
    pub name: String,
    pub play_style: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub charts: Vec<Chart>,
}

/// Older writers emitted `"charts": null` for empty folders.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One playlist document on disk. The path is both its identity and the
/// target every save overwrites.
pub struct PlaylistFile {
    pub path: PathBuf,
    pub folders: Vec<Folder>,
    /// Total charts across all folders; recomputed after every mutation.
    pub chart_count: usize,
}

impl PlaylistFile {
    pub fn new(path: impl Into<PathBuf>, folders: Vec<Folder>) -> Self {
        let mut file = Self {
            path: path.into(),
            folders,
            chart_count: 0,
        };
        file.recount();
        file
    }

    /// Recompute `chart_count` from the folders.
    pub fn recount(&mut self) {
        self.chart_count = self.folders.iter().map(|folder| folder.charts.len()).sum();
    }

    /// Path as shown in listings and search hits.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    /// Position of the first chart in `folder` referencing `entry_id`.
    pub fn find_chart(&self, folder: usize, entry_id: i64) -> Option<usize> {
        self.folders
            .get(folder)?
            .charts
            .iter()
            .position(|chart| chart.entry_id == entry_id)
    }

    /// Point an existing chart at `song` with a new difficulty. Returns false
    /// when either index is out of range.
    pub fn replace_chart(
        &mut self,
        folder: usize,
        chart: usize,
        song: &Song,
        difficulty: Difficulty,
    ) -> bool {
        let Some(slot) = self
            .folders
            .get_mut(folder)
            .and_then(|folder| folder.charts.get_mut(chart))
        else {
            return false;
        };
        *slot = Chart::from_song(song, difficulty);
        true
    }

    /// Append a chart for `song` to `folder`. Returns false when the folder
    /// index is out of range.
    pub fn push_chart(&mut self, folder: usize, song: &Song, difficulty: Difficulty) -> bool {
        let Some(target) = self.folders.get_mut(folder) else {
            return false;
        };
        target.charts.push(Chart::from_song(song, difficulty));
        self.recount();
        true
    }

    /// Remove and return the chart at `chart` in `folder`, or `None` when
    /// either index is out of range.
    pub fn remove_chart(&mut self, folder: usize, chart: usize) -> Option<Chart> {
        let target = self.folders.get_mut(folder)?;
        if chart >= target.charts.len() {
            return None;
        }
        let removed = target.charts.remove(chart);
        self.recount();
        Some(removed)
    }

    pub fn push_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
        self.recount();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A playlist document that could not be loaded, kept so the listing can tell
/// the user why it is missing.
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Every playlist found in the playlist directory, rebuilt from disk for each
/// top-level command.
pub struct PlaylistSet {
    pub files: Vec<PlaylistFile>,
    pub skipped: Vec<SkippedFile>,
}

impl PlaylistSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64, title: &str, artist: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }

    fn sample_file() -> PlaylistFile {
        let charts = vec![Chart::from_song(&song(1, "Song A", "Artist X"), Difficulty::Another)];
        PlaylistFile::new(
            "p.json",
            vec![
                Folder {
                    name: "F1".into(),
                    play_style: "SP".into(),
                    charts,
                },
                Folder {
                    name: "F2".into(),
                    play_style: "DP".into(),
                    charts: Vec::new(),
                },
            ],
        )
    }

    #[test]
    fn level_numbers_outside_range_default_to_another() {
        assert_eq!(Difficulty::from_level(1), Difficulty::Beginner);
        assert_eq!(Difficulty::from_level(2), Difficulty::Normal);
        assert_eq!(Difficulty::from_level(5), Difficulty::Leggendaria);
        assert_eq!(Difficulty::from_level(0), Difficulty::Another);
        assert_eq!(Difficulty::from_level(6), Difficulty::Another);
        assert_eq!(Difficulty::from_level(-3), Difficulty::Another);
    }

    #[test]
    fn unrecognised_difficulty_survives_serialization() {
        let chart: Chart = serde_json::from_str(r#"{"entry_id":7,"difficulty":"basic"}"#).unwrap();
        assert_eq!(chart.difficulty, Difficulty::Other("basic".into()));
        let written = serde_json::to_string(&chart).unwrap();
        assert_eq!(written, r#"{"entry_id":7,"difficulty":"basic"}"#);
    }

    #[test]
    fn derived_fields_are_ignored_on_read() {
        let chart: Chart = serde_json::from_str(
            r#"{"entry_id":1,"difficulty":"hyper","title":"stale","artist":"stale"}"#,
        )
        .unwrap();
        assert!(chart.title.is_empty());
        assert!(chart.artist.is_empty());
    }

    #[test]
    fn null_charts_read_as_empty_folder() {
        let folder: Folder =
            serde_json::from_str(r#"{"name":"F","play_style":"DP","charts":null}"#).unwrap();
        assert!(folder.charts.is_empty());
    }

    #[test]
    fn chart_count_tracks_mutations() {
        let mut file = sample_file();
        assert_eq!(file.chart_count, 1);

        assert!(file.push_chart(1, &song(2, "Song B", "Artist Y"), Difficulty::Normal));
        assert_eq!(file.chart_count, 2);

        assert!(file.replace_chart(0, 0, &Song::unknown(99), Difficulty::Hyper));
        assert_eq!(file.chart_count, 2);
        assert_eq!(file.folders[0].charts[0].title, UNKNOWN);

        assert!(file.remove_chart(1, 0).is_some());
        assert_eq!(file.chart_count, 1);

        file.push_folder(Folder {
            name: "F3".into(),
            play_style: "SP".into(),
            charts: vec![Chart::from_song(&song(2, "Song B", "Artist Y"), Difficulty::Another)],
        });
        assert_eq!(file.chart_count, 2);
    }

    #[test]
    fn out_of_range_mutations_are_rejected() {
        let mut file = sample_file();
        assert!(!file.push_chart(5, &Song::unknown(1), Difficulty::Another));
        assert!(!file.replace_chart(0, 3, &Song::unknown(1), Difficulty::Another));
        assert!(file.remove_chart(1, 0).is_none());
        assert_eq!(file.chart_count, 1);
    }

    #[test]
    fn find_chart_returns_first_match() {
        let mut file = sample_file();
        file.push_chart(0, &song(1, "Song A", "Artist X"), Difficulty::Leggendaria);
        assert_eq!(file.find_chart(0, 1), Some(0));
        assert_eq!(file.find_chart(0, 2), None);
        assert_eq!(file.find_chart(4, 1), None);
    }
}
