//! File → folder → chart selection as an explicit state machine.
//!
//! Every prompt belongs to one `State`. `Navigator::advance` consumes one line
//! of input and answers with a `Transition`: move to another state, ask the
//! same question again, or leave the navigator. "back" always unwinds exactly
//! one level and keeps the selections made further out.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use log::error;

use crate::models::{Difficulty, Folder, PlaylistFile, PlaylistSet, Song};
use crate::store::{create_folder, create_playlist_file, save_playlist, Catalog};

use super::helpers::{accepted, declined, is_back, parse_index, parse_number, surface_error};
use super::render::{chart_lines, folder_lines, level_label, level_menu, playlist_lines, Levels};
use super::terminal::Console;

/// Which top-level command is driving the navigator. Only editing creates
/// files and folders when the selection runs past the end of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Edit,
    Rename,
}

/// A selected folder inside a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderRef {
    pub file: usize,
    pub folder: usize,
}

/// Position in the navigation flow. Each variant carries the selection made so
/// far and any pending answer that still needs confirming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    SelectFile,
    SelectFolder {
        file: usize,
    },
    SelectChart(FolderRef),
    /// Existing chart picked; asking which catalog id it should point at.
    ReplaceTarget {
        at: FolderRef,
        chart: usize,
        origin: Song,
    },
    ReplaceLevel {
        at: FolderRef,
        chart: usize,
        origin: Song,
        target: Song,
    },
    ReplaceConfirm {
        at: FolderRef,
        chart: usize,
        origin: Song,
        target: Song,
        difficulty: Difficulty,
    },
    /// Id not in the folder yet; asking for the new chart's difficulty.
    CreateLevel {
        at: FolderRef,
        song: Song,
    },
    CreateConfirm {
        at: FolderRef,
        song: Song,
        difficulty: Difficulty,
    },
    DeleteConfirm {
        at: FolderRef,
        chart: usize,
    },
    RenameFolder(FolderRef),
    RenameConfirm {
        at: FolderRef,
        name: String,
    },
    RenameStyle {
        at: FolderRef,
        name: String,
    },
    RenameStyleConfirm {
        at: FolderRef,
        name: String,
        style: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Next(State),
    /// Ask the current question again.
    Stay,
    /// Leave the navigator and return to the command menu.
    Exit,
}

/// How a navigator session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user backed out of file selection.
    Back,
    /// Input ended; the program should stop.
    Quit,
}

/// Drives one edit or rename session over a fresh copy of the playlists,
/// saving each confirmed change before moving on.
pub struct Navigator<'a> {
    catalog: &'a Catalog,
    playlist_dir: &'a Path,
    playlists: PlaylistSet,
    flow: Flow,
    notices: Vec<String>,
}

impl<'a> Navigator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        playlist_dir: &'a Path,
        playlists: PlaylistSet,
        flow: Flow,
    ) -> Self {
        Self {
            catalog,
            playlist_dir,
            playlists,
            flow,
            notices: Vec::new(),
        }
    }

    pub fn playlists(&self) -> &PlaylistSet {
        &self.playlists
    }

    /// Messages produced by the last transition, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Drive the state machine from file selection until the user backs out
    /// or the input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<Outcome> {
        let mut state = State::SelectFile;
        loop {
            console.say_all(self.screen(&state))?;
            let Some(input) = console.prompt(&self.prompt(&state))? else {
                return Ok(Outcome::Quit);
            };
            let transition = self.advance(&state, &input);
            console.say_all(self.take_notices())?;
            match transition {
                Transition::Next(next) => state = next,
                Transition::Stay => {}
                Transition::Exit => return Ok(Outcome::Back),
            }
        }
    }

    /// Listing shown before a state's prompt.
    pub fn screen(&self, state: &State) -> Vec<String> {
        match state {
            State::SelectFile => playlist_lines(&self.playlists, Levels::FILES),
            State::SelectFolder { file } => self.file(*file).map(folder_lines).unwrap_or_default(),
            State::SelectChart(at) => self.folder(*at).map(chart_lines).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn prompt(&self, state: &State) -> String {
        match state {
            State::SelectFile => match self.flow {
                Flow::Edit => concat!(
                    "'b' to menu\n",
                    "input file number(default 0, past the end creates a new list):"
                )
                .to_string(),
                Flow::Rename => "'b' to menu\ninput file number(default 0):".to_string(),
            },
            State::SelectFolder { .. } => match self.flow {
                Flow::Edit => concat!(
                    "'b' to select file\n",
                    "input folder number(default 0, past the end creates a new folder):"
                )
                .to_string(),
                Flow::Rename => "'b' to select file\ninput folder number(default 0):".to_string(),
            },
            State::SelectChart(_) => {
                "'b' to select folder, 'd {id}' to delete\ninput song id:".to_string()
            }
            State::ReplaceTarget { origin, .. } => format!(
                "'b' to select chart\n{origin} switch to id(default {}):",
                origin.id
            ),
            State::ReplaceLevel { target, .. } => format!(
                "'b' to select target\n{target}(default: another(4)) {}:",
                level_menu()
            ),
            State::ReplaceConfirm {
                origin,
                target,
                difficulty,
                ..
            } => format!(
                "{} switch to {}(Y/n):",
                origin.title,
                level_label(difficulty, &target.title)
            ),
            State::CreateLevel { song, .. } => format!(
                "'b' to select chart\n{song}(default: another(4)) {}:",
                level_menu()
            ),
            State::CreateConfirm {
                song, difficulty, ..
            } => format!("add {}(Y/n):", level_label(difficulty, &song.title)),
            State::DeleteConfirm { at, chart } => {
                let label = self
                    .folder(*at)
                    .and_then(|folder| folder.charts.get(*chart))
                    .map(|chart| level_label(&chart.difficulty, &chart.title))
                    .unwrap_or_default();
                format!("remove {label}(y/N):")
            }
            State::RenameFolder(at) => format!(
                "'b' to select folder\ninput new folder name(current: {}):",
                level_label(&Difficulty::Another, self.folder_name(*at))
            ),
            State::RenameConfirm { at, name } => format!(
                "{} rename to {}(Y/n):",
                self.folder_name(*at),
                level_label(&Difficulty::Beginner, name)
            ),
            State::RenameStyle { at, .. } => format!(
                "'b' to input name\ninput folder mode(default: {}):",
                self.folder(*at)
                    .map(|folder| folder.play_style.as_str())
                    .unwrap_or_default()
            ),
            State::RenameStyleConfirm { at, style, .. } => format!(
                "{} switch mode to {}(Y/n):",
                self.folder(*at)
                    .map(|folder| folder.play_style.as_str())
                    .unwrap_or_default(),
                level_label(&Difficulty::Beginner, style)
            ),
        }
    }

    /// Apply one line of input to `state`.
    pub fn advance(&mut self, state: &State, input: &str) -> Transition {
        match state {
            State::SelectFile => self.select_file(input),
            State::SelectFolder { file } => self.select_folder(*file, input),
            State::SelectChart(at) => self.select_chart(*at, input),
            State::ReplaceTarget { at, chart, origin } => {
                if is_back(input) {
                    return Transition::Next(State::SelectChart(*at));
                }
                let id = match parse_number(input) {
                    0 => origin.id,
                    id => id,
                };
                Transition::Next(State::ReplaceLevel {
                    at: *at,
                    chart: *chart,
                    origin: origin.clone(),
                    target: self.catalog.resolve(id),
                })
            }
            State::ReplaceLevel {
                at,
                chart,
                origin,
                target,
            } => {
                if is_back(input) {
                    return Transition::Next(State::ReplaceTarget {
                        at: *at,
                        chart: *chart,
                        origin: origin.clone(),
                    });
                }
                Transition::Next(State::ReplaceConfirm {
                    at: *at,
                    chart: *chart,
                    origin: origin.clone(),
                    target: target.clone(),
                    difficulty: Difficulty::from_level(parse_number(input)),
                })
            }
            State::ReplaceConfirm {
                at,
                chart,
                origin,
                target,
                difficulty,
            } => {
                if is_back(input) {
                    return Transition::Next(State::ReplaceLevel {
                        at: *at,
                        chart: *chart,
                        origin: origin.clone(),
                        target: target.clone(),
                    });
                }
                if declined(input) {
                    self.notices.push("modify cancelled".to_string());
                } else if let Some(file) = self.playlists.files.get_mut(at.file) {
                    if file.replace_chart(at.folder, *chart, target, difficulty.clone()) {
                        self.persist(at.file, "modify");
                    }
                }
                Transition::Next(State::SelectChart(*at))
            }
            State::CreateLevel { at, song } => {
                if is_back(input) {
                    return Transition::Next(State::SelectChart(*at));
                }
                Transition::Next(State::CreateConfirm {
                    at: *at,
                    song: song.clone(),
                    difficulty: Difficulty::from_level(parse_number(input)),
                })
            }
            State::CreateConfirm {
                at,
                song,
                difficulty,
            } => {
                if is_back(input) {
                    return Transition::Next(State::CreateLevel {
                        at: *at,
                        song: song.clone(),
                    });
                }
                if declined(input) {
                    self.notices.push("add cancelled".to_string());
                } else if let Some(file) = self.playlists.files.get_mut(at.file) {
                    if file.push_chart(at.folder, song, difficulty.clone()) {
                        self.persist(at.file, "add");
                    }
                }
                Transition::Next(State::SelectChart(*at))
            }
            State::DeleteConfirm { at, chart } => {
                if is_back(input) {
                    return Transition::Next(State::SelectChart(*at));
                }
                if !accepted(input) {
                    self.notices.push("remove cancelled".to_string());
                } else if let Some(file) = self.playlists.files.get_mut(at.file) {
                    if file.remove_chart(at.folder, *chart).is_some() {
                        self.persist(at.file, "remove");
                    }
                }
                Transition::Next(State::SelectChart(*at))
            }
            State::RenameFolder(at) => {
                if is_back(input) {
                    return Transition::Next(State::SelectFolder { file: at.file });
                }
                let name = match input.trim() {
                    "" => self.folder_name(*at).to_string(),
                    name => name.to_string(),
                };
                Transition::Next(State::RenameConfirm { at: *at, name })
            }
            State::RenameConfirm { at, name } => {
                if is_back(input) {
                    return Transition::Next(State::RenameFolder(*at));
                }
                if declined(input) {
                    self.notices.push("rename cancelled".to_string());
                    return Transition::Next(State::SelectFolder { file: at.file });
                }
                Transition::Next(State::RenameStyle {
                    at: *at,
                    name: name.clone(),
                })
            }
            State::RenameStyle { at, name } => {
                if is_back(input) {
                    return Transition::Next(State::RenameFolder(*at));
                }
                let style = input.trim().to_uppercase();
                if style.is_empty() {
                    self.apply_rename(*at, name, None);
                    return Transition::Next(State::SelectFolder { file: at.file });
                }
                Transition::Next(State::RenameStyleConfirm {
                    at: *at,
                    name: name.clone(),
                    style,
                })
            }
            State::RenameStyleConfirm { at, name, style } => {
                if is_back(input) {
                    return Transition::Next(State::RenameStyle {
                        at: *at,
                        name: name.clone(),
                    });
                }
                let style = (!declined(input)).then_some(style.as_str());
                self.apply_rename(*at, name, style);
                Transition::Next(State::SelectFolder { file: at.file })
            }
        }
    }

    fn select_file(&mut self, input: &str) -> Transition {
        if is_back(input) || input.trim().is_empty() {
            return Transition::Exit;
        }
        if parse_number(input) < 0 {
            self.notices.push("invalid file number".to_string());
            return Transition::Stay;
        }
        let index = parse_index(input);
        if index < self.playlists.len() {
            return Transition::Next(State::SelectFolder { file: index });
        }

        match self.flow {
            Flow::Rename => {
                self.notices.push(format!("no file number {index}"));
                Transition::Stay
            }
            Flow::Edit => match create_playlist_file(self.playlist_dir, self.catalog, now()) {
                Ok(file) => {
                    self.notices.push("create new fav list...".to_string());
                    self.playlists.files.push(file);
                    Transition::Next(State::SelectFolder {
                        file: self.playlists.len() - 1,
                    })
                }
                Err(err) => {
                    error!("failed to create playlist: {err}");
                    self.notices
                        .push(format!("create fav list failed: {}", surface_error(&err.into())));
                    Transition::Stay
                }
            },
        }
    }

    fn select_folder(&mut self, file: usize, input: &str) -> Transition {
        if is_back(input) {
            return Transition::Next(State::SelectFile);
        }
        let Some(folder_count) = self.file(file).map(|file| file.folders.len()) else {
            return Transition::Next(State::SelectFile);
        };
        if parse_number(input) < 0 {
            self.notices.push("invalid folder number".to_string());
            return Transition::Stay;
        }
        let index = parse_index(input);
        if index < folder_count {
            let at = FolderRef {
                file,
                folder: index,
            };
            return Transition::Next(match self.flow {
                Flow::Edit => State::SelectChart(at),
                Flow::Rename => State::RenameFolder(at),
            });
        }

        if self.flow == Flow::Rename {
            self.notices.push(format!("no folder number {index}"));
            return Transition::Stay;
        }

        let catalog = self.catalog;
        let Some(target) = self.playlists.files.get_mut(file) else {
            return Transition::Next(State::SelectFile);
        };
        match create_folder(target, catalog, now()) {
            Ok(folder) => {
                self.notices.push("create new folder".to_string());
                Transition::Next(State::SelectChart(FolderRef { file, folder }))
            }
            Err(err) => {
                error!("failed to create folder: {err}");
                self.notices
                    .push(format!("create folder failed: {}", surface_error(&err.into())));
                // A failed write still leaves the new folder in memory.
                if target.folders.len() > folder_count {
                    Transition::Next(State::SelectChart(FolderRef {
                        file,
                        folder: folder_count,
                    }))
                } else {
                    Transition::Stay
                }
            }
        }
    }

    fn select_chart(&mut self, at: FolderRef, input: &str) -> Transition {
        if is_back(input) {
            return Transition::Next(State::SelectFolder { file: at.file });
        }

        let trimmed = input.trim();
        if let Some(rest) = trimmed.strip_prefix(['d', 'D']) {
            let id = parse_number(rest);
            return match self.file(at.file).and_then(|file| file.find_chart(at.folder, id)) {
                Some(chart) => Transition::Next(State::DeleteConfirm { at, chart }),
                None => {
                    self.notices.push(format!("{id} is not in this folder"));
                    Transition::Stay
                }
            };
        }

        let id = parse_number(trimmed);
        if id == 0 {
            return Transition::Stay;
        }
        match self.file(at.file).and_then(|file| file.find_chart(at.folder, id)) {
            Some(chart) => {
                let origin = self
                    .folder(at)
                    .and_then(|folder| folder.charts.get(chart))
                    .map(|chart| Song {
                        id: chart.entry_id,
                        title: chart.title.clone(),
                        artist: chart.artist.clone(),
                    })
                    .unwrap_or_else(|| Song::unknown(id));
                Transition::Next(State::ReplaceTarget { at, chart, origin })
            }
            None => Transition::Next(State::CreateLevel {
                at,
                song: self.catalog.resolve(id),
            }),
        }
    }

    fn apply_rename(&mut self, at: FolderRef, name: &str, style: Option<&str>) {
        let Some(folder) = self
            .playlists
            .files
            .get_mut(at.file)
            .and_then(|file| file.folders.get_mut(at.folder))
        else {
            return;
        };
        folder.name = name.to_string();
        if let Some(style) = style {
            folder.play_style = style.to_string();
        }
        self.persist(at.file, "rename");
    }

    /// Write one file back to disk. A failure is reported but the in-memory
    /// change stays; the next successful save or reload settles it.
    fn persist(&mut self, file: usize, action: &str) {
        let Some(target) = self.playlists.files.get(file) else {
            return;
        };
        match save_playlist(target) {
            Ok(()) => self.notices.push(format!("{action} fav list saved")),
            Err(err) => {
                error!("{action} fav list not saved: {err}");
                self.notices.push(format!(
                    "{action} fav list not saved: {}",
                    surface_error(&err.into())
                ));
            }
        }
    }

    fn file(&self, index: usize) -> Option<&PlaylistFile> {
        self.playlists.files.get(index)
    }

    fn folder(&self, at: FolderRef) -> Option<&Folder> {
        self.file(at.file)?.folders.get(at.folder)
    }

    fn folder_name(&self, at: FolderRef) -> &str {
        self.folder(at)
            .map(|folder| folder.name.as_str())
            .unwrap_or_default()
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
