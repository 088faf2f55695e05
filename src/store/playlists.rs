use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::StoreError;
use crate::models::{Chart, Difficulty, Folder, PlaylistFile, PlaylistSet, SkippedFile, Song};

use super::catalog::Catalog;

/// `strftime` pattern used for generated file and folder names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// Playlist documents are written with a single space per indent level.
const INDENT: &[u8] = b" ";

/// Load every playlist document in `dir` (non-recursive) and enrich its charts
/// from the catalog.
///
/// Only a failure to list the directory is returned as an error. A file that
/// cannot be read or parsed is logged, recorded in `PlaylistSet::skipped`, and
/// the rest of the directory still loads. Files are ordered by name.
pub fn load_playlists(dir: &Path, catalog: &Catalog) -> Result<PlaylistSet, StoreError> {
    let read_dir_error = |source| StoreError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    let mut set = PlaylistSet::default();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => continue,
            Ok(_) => paths.push(path),
            Err(err) => {
                warn!("read file {} error: {err}", path.display());
                set.skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }
    paths.sort();

    for path in paths {
        match load_playlist_file(&path, catalog) {
            Ok(file) => set.files.push(file),
            Err(err) => {
                let reason = error_reason(&err);
                warn!("read file {} error: {reason}", path.display());
                set.skipped.push(SkippedFile { path, reason });
            }
        }
    }

    debug!(
        "loaded {} playlists from {} ({} skipped)",
        set.files.len(),
        dir.display(),
        set.skipped.len()
    );
    Ok(set)
}

/// Read and enrich a single playlist document.
pub fn load_playlist_file(path: &Path, catalog: &Catalog) -> Result<PlaylistFile, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let folders: Vec<Folder> =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut file = PlaylistFile::new(path, folders);
    enrich(&mut file, catalog);
    Ok(file)
}

/// Overwrite every chart's title and artist from the catalog, whatever they
/// held before, and recompute the chart count.
pub fn enrich(file: &mut PlaylistFile, catalog: &Catalog) {
    for folder in &mut file.folders {
        for chart in &mut folder.charts {
            chart.enrich(&catalog.resolve(chart.entry_id));
        }
    }
    file.recount();
}

/// Overwrite the file's document with its current folders. Derived chart
/// fields are not written.
pub fn save_playlist(file: &PlaylistFile) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    file.folders
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Serialize {
            path: file.path.clone(),
            source,
        })?;

    fs::write(&file.path, buf).map_err(|source| StoreError::Write {
        path: file.path.clone(),
        source,
    })?;
    info!("saved {} ({} charts)", file.display_name(), file.chart_count);
    Ok(())
}

/// Format `now` the way generated names expect, e.g. `20240131-235959`.
pub fn timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Create and persist `<timestamp>.json` in `dir` with one SP and one DP
/// folder, each seeded with the catalog's lowest-id song on `another`.
pub fn create_playlist_file(
    dir: &Path,
    catalog: &Catalog,
    now: NaiveDateTime,
) -> Result<PlaylistFile, StoreError> {
    let seed = catalog.seed_song().ok_or(StoreError::EmptyCatalog)?;
    let stamp = timestamp(now);
    let path = dir.join(format!("{stamp}.json"));
    if path.exists() {
        return Err(StoreError::AlreadyExists(path));
    }

    let file = PlaylistFile::new(
        path,
        vec![
            seeded_folder(format!("Favourite-SP-{stamp}"), "SP", seed),
            seeded_folder(format!("Favourite-DP-{stamp}"), "DP", seed),
        ],
    );
    save_playlist(&file)?;
    info!("created playlist {}", file.display_name());
    Ok(file)
}

/// Append a seeded SP folder to `file` and persist it, returning the new
/// folder's index.
///
/// The folder stays in memory even when the write fails; the error is still
/// returned so the caller can report it.
pub fn create_folder(
    file: &mut PlaylistFile,
    catalog: &Catalog,
    now: NaiveDateTime,
) -> Result<usize, StoreError> {
    let seed = catalog.seed_song().ok_or(StoreError::EmptyCatalog)?;
    let name = format!("Favourite-SP-{}", timestamp(now));
    file.push_folder(seeded_folder(name, "SP", seed));
    info!("created folder in {}", file.display_name());
    save_playlist(file)?;
    Ok(file.folders.len() - 1)
}

fn seeded_folder(name: String, play_style: &str, seed: &Song) -> Folder {
    Folder {
        name,
        play_style: play_style.to_string(),
        charts: vec![Chart::from_song(seed, Difficulty::Another)],
    }
}

/// Innermost cause of a store error, which is the part worth showing.
fn error_reason(err: &StoreError) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason = cause.to_string();
        source = cause.source();
    }
    reason
}
