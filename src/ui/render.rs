//! Text formatting for everything the editor prints. Nothing here touches the
//! terminal; callers hand the returned lines to the console.

use std::fmt::Display;

use crossterm::style::{Color, Stylize};

use crate::models::{Difficulty, Folder, PlaylistFile, PlaylistSet};
use crate::search::{CatalogHit, MatchField, PlaylistHit};

/// Which levels of the playlist tree a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    pub files: bool,
    pub folders: bool,
    pub charts: bool,
}

impl Levels {
    pub const FILES: Levels = Levels {
        files: true,
        folders: false,
        charts: false,
    };
    pub const ALL: Levels = Levels {
        files: true,
        folders: true,
        charts: true,
    };
}

/// Background color for a difficulty; `None` leaves the terminal default.
pub fn difficulty_color(difficulty: &Difficulty) -> Option<Color> {
    match difficulty {
        Difficulty::Beginner => Some(Color::Green),
        Difficulty::Normal => Some(Color::Blue),
        Difficulty::Hyper => Some(Color::Yellow),
        Difficulty::Another => Some(Color::Red),
        Difficulty::Leggendaria => Some(Color::Magenta),
        Difficulty::Other(_) => None,
    }
}

/// Render `text` in the color of `difficulty`.
pub fn level_label(difficulty: &Difficulty, text: &str) -> String {
    match difficulty_color(difficulty) {
        Some(color) => text.black().on(color).to_string(),
        None => text.to_string(),
    }
}

/// Like `level_label`, but marks `text` as the matched part of a search hit.
fn matched_level_label(difficulty: &Difficulty, text: &str) -> String {
    let styled = text.red().underlined();
    match difficulty_color(difficulty) {
        Some(color) => styled.on(color).to_string(),
        None => styled.to_string(),
    }
}

fn badge(value: impl Display, background: Color) -> String {
    value.to_string().black().on(background).to_string()
}

fn highlight(text: &str) -> String {
    text.red().to_string()
}

/// Menu text for the difficulty prompt, e.g. `beginner(1),normal(2),...`.
pub fn level_menu() -> String {
    Difficulty::LEVELS
        .iter()
        .enumerate()
        .map(|(pos, level)| format!("{level}({})", pos + 1))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn help_lines() -> Vec<String> {
    let key = |k: &str| k.with(Color::Red).to_string();
    vec![
        "-----------beatmaniaIIDX favourite song list editor-----------".to_string(),
        "==========================COMMANDS============================".to_string(),
        format!("{}: edit favourite song", key("e")),
        format!("{}: list favourite song", key("l")),
        format!("{}: rename or modify mode favourite list", key("r")),
        format!(
            "{}: search from songlist.exp:'s {{id}}/{{artist}}/{{songname}}'",
            key("s")
        ),
        format!(
            "{}: search from favlist.exp:'f {{id}}/{{artist}}/{{songname}}'",
            key("f")
        ),
        format!("{}: exit", key("q")),
    ]
}

/// Listing of the playlist tree, restricted to the requested levels.
pub fn playlist_lines(set: &PlaylistSet, levels: Levels) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, file) in set.files.iter().enumerate() {
        if levels.files {
            lines.push(file_line(i, file));
        }
        for (j, folder) in file.folders.iter().enumerate() {
            if levels.folders {
                lines.push(format!(
                    "  {}.{}.{}",
                    badge(j, Color::Cyan),
                    folder.name,
                    folder.play_style
                ));
            }
            if levels.charts {
                for chart in &folder.charts {
                    lines.push(format!(
                        "    {}.{}.{}",
                        badge(chart.entry_id, Color::White),
                        level_label(&chart.difficulty, &chart.title),
                        chart.artist
                    ));
                }
            }
        }
    }
    lines
}

/// Summary line for one file: index, path, folder count and chart count.
pub fn file_line(index: usize, file: &PlaylistFile) -> String {
    format!(
        "{}.{}, folders: {}, songs: {}",
        badge(index, Color::Blue),
        file.display_name(),
        file.folders.len(),
        file.chart_count
    )
}

/// Folders of one file, numbered for selection.
pub fn folder_lines(file: &PlaylistFile) -> Vec<String> {
    file.folders
        .iter()
        .enumerate()
        .map(|(i, folder)| {
            format!(
                "{}.{}.{}.{}(songs)",
                badge(i, Color::DarkBlue),
                folder.name,
                folder.play_style,
                folder.charts.len()
            )
        })
        .collect()
}

/// Charts of one folder, keyed by catalog id rather than position.
pub fn chart_lines(folder: &Folder) -> Vec<String> {
    folder
        .charts
        .iter()
        .map(|chart| {
            format!(
                "{}.{}.{}",
                badge(chart.entry_id, Color::DarkBlue),
                level_label(&chart.difficulty, &chart.title),
                chart.artist
            )
        })
        .collect()
}

/// One line per playlist document that failed to load, with the reason.
pub fn skipped_lines(set: &PlaylistSet) -> Vec<String> {
    set.skipped
        .iter()
        .map(|skipped| format!("skipped {}: {}", skipped.path.display(), skipped.reason))
        .collect()
}

/// One catalog search result with the matching field highlighted.
pub fn catalog_hit_line(hit: &CatalogHit<'_>) -> String {
    let song = hit.song;
    match hit.field {
        MatchField::Id => format!(
            "{}.{}.{}",
            highlight(&song.id.to_string()),
            song.title,
            song.artist
        ),
        MatchField::Title => format!("{}.{}.{}", song.id, highlight(&song.title), song.artist),
        MatchField::Artist => format!("{}.{}.{}", song.id, song.title, highlight(&song.artist)),
    }
}

/// One playlist search result: where the chart lives, then the chart with the
/// matching field highlighted.
pub fn playlist_hit_line(hit: &PlaylistHit<'_>) -> String {
    let chart = hit.chart;
    let id = chart.entry_id.to_string();
    let (id, title, artist) = match hit.field {
        MatchField::Id => (
            highlight(&id),
            level_label(&chart.difficulty, &chart.title),
            chart.artist.clone(),
        ),
        MatchField::Title => (
            id,
            matched_level_label(&chart.difficulty, &chart.title),
            chart.artist.clone(),
        ),
        MatchField::Artist => (
            id,
            level_label(&chart.difficulty, &chart.title),
            highlight(&chart.artist),
        ),
    };
    format!(
        "{}:{}({}).{}.{}.{}",
        hit.file.display(),
        hit.folder.name,
        hit.folder.play_style,
        id,
        title,
        artist
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chart, SkippedFile, Song};

    fn set() -> PlaylistSet {
        let song = Song {
            id: 1,
            title: "Song A".into(),
            artist: "Artist X".into(),
        };
        PlaylistSet {
            files: vec![PlaylistFile::new(
                "playlists/p.json",
                vec![Folder {
                    name: "F1".into(),
                    play_style: "SP".into(),
                    charts: vec![Chart::from_song(&song, Difficulty::Another)],
                }],
            )],
            skipped: vec![SkippedFile {
                path: "playlists/bad.json".into(),
                reason: "expected value".into(),
            }],
        }
    }

    #[test]
    fn difficulty_palette() {
        assert_eq!(difficulty_color(&Difficulty::Beginner), Some(Color::Green));
        assert_eq!(difficulty_color(&Difficulty::Normal), Some(Color::Blue));
        assert_eq!(difficulty_color(&Difficulty::Hyper), Some(Color::Yellow));
        assert_eq!(difficulty_color(&Difficulty::Another), Some(Color::Red));
        assert_eq!(difficulty_color(&Difficulty::Leggendaria), Some(Color::Magenta));
        assert_eq!(difficulty_color(&Difficulty::Other("basic".into())), None);
        assert_eq!(level_label(&Difficulty::Other("basic".into()), "t"), "t");
    }

    #[test]
    fn levels_toggle_independently() {
        let set = set();
        assert_eq!(playlist_lines(&set, Levels::FILES).len(), 1);
        assert_eq!(playlist_lines(&set, Levels::ALL).len(), 3);

        let charts_only = Levels {
            files: false,
            folders: false,
            charts: true,
        };
        let lines = playlist_lines(&set, charts_only);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Song A"));
        assert!(lines[0].ends_with(".Artist X"));
    }

    #[test]
    fn file_line_reports_counts() {
        let set = set();
        let line = file_line(0, &set.files[0]);
        assert!(line.ends_with("playlists/p.json, folders: 1, songs: 1"));
    }

    #[test]
    fn folder_and_chart_listings() {
        let set = set();
        let folders = folder_lines(&set.files[0]);
        assert_eq!(folders.len(), 1);
        assert!(folders[0].ends_with(".F1.SP.1(songs)"));

        let charts = chart_lines(&set.files[0].folders[0]);
        assert_eq!(charts.len(), 1);
        assert!(charts[0].contains("Song A"));
    }

    #[test]
    fn skipped_files_are_listed() {
        let lines = skipped_lines(&set());
        assert_eq!(lines, vec!["skipped playlists/bad.json: expected value".to_string()]);
    }

    #[test]
    fn playlist_hits_highlight_the_matched_field() {
        let set = set();
        let file = &set.files[0];
        let folder = &file.folders[0];
        let hit = |field| PlaylistHit {
            file: &file.path,
            folder,
            chart: &folder.charts[0],
            field,
        };
        let plain_title = level_label(&Difficulty::Another, "Song A");

        let by_artist = playlist_hit_line(&hit(MatchField::Artist));
        assert!(by_artist.starts_with("playlists/p.json:F1(SP).1."));
        assert!(by_artist.contains(&plain_title));
        assert!(by_artist.ends_with(&highlight("Artist X")));

        let by_id = playlist_hit_line(&hit(MatchField::Id));
        assert!(by_id.contains(&format!("({}).{}.", "SP", highlight("1"))));
        assert!(by_id.ends_with(".Artist X"));

        let by_title = playlist_hit_line(&hit(MatchField::Title));
        assert!(by_title.contains(&matched_level_label(&Difficulty::Another, "Song A")));
        assert!(!by_title.contains(&plain_title));
        assert!(by_title.ends_with(".Artist X"));
    }

    #[test]
    fn level_menu_numbers_from_one() {
        assert_eq!(
            level_menu(),
            "beginner(1),normal(2),hyper(3),another(4),leggendaria(5)"
        );
    }
}
