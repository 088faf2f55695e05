use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, error};

use crate::config::Config;
use crate::models::PlaylistSet;
use crate::search::{search_catalog, search_playlists};
use crate::store::{load_playlists, Catalog};

use super::helpers::surface_error;
use super::navigator::{Flow, Navigator, Outcome};
use super::render::{
    catalog_hit_line, help_lines, playlist_hit_line, playlist_lines, skipped_lines, Levels,
};
use super::terminal::Console;

/// Top-level commands, selected by the first character of the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit,
    Rename,
    List,
    SearchCatalog(String),
    SearchPlaylists(String),
    Quit,
}

impl Command {
    /// Split `line` into a command letter and its argument. Returns `None` for
    /// blank lines and unknown letters.
    pub fn parse(line: &str) -> Option<Self> {
        let mut chars = line.trim_start().chars();
        let letter = chars.next()?;
        let arg = chars.as_str().trim().to_string();
        match letter.to_ascii_lowercase() {
            'e' => Some(Command::Edit),
            'r' => Some(Command::Rename),
            'l' => Some(Command::List),
            's' => Some(Command::SearchCatalog(arg)),
            'f' => Some(Command::SearchPlaylists(arg)),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Owns everything a session needs: the catalog (read-only for the whole run),
/// the paths, and the console. Playlists are not cached here; every command
/// reloads them from disk.
pub struct App<R, W> {
    catalog: Catalog,
    config: Config,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(catalog: Catalog, config: Config, console: Console<R, W>) -> Self {
        Self {
            catalog,
            config,
            console,
        }
    }

    /// Show the menu and dispatch commands until `q` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.console.say_all(help_lines())?;
            let Some(line) = self.console.prompt("")? else {
                return Ok(());
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if self.handle_command(command)? {
                return Ok(());
            }
        }
    }

    /// Run one command. Returns `true` when the program should exit.
    pub fn handle_command(&mut self, command: Command) -> Result<bool> {
        debug!("command {command:?}");
        match command {
            Command::Edit => self.navigate(Flow::Edit),
            Command::Rename => self.navigate(Flow::Rename),
            Command::List => {
                self.list()?;
                Ok(false)
            }
            Command::SearchCatalog(term) => {
                let lines: Vec<String> = search_catalog(&self.catalog, &term)
                    .iter()
                    .map(catalog_hit_line)
                    .collect();
                self.console.say_all(lines)?;
                Ok(false)
            }
            Command::SearchPlaylists(term) => {
                self.search_playlists(&term)?;
                Ok(false)
            }
            Command::Quit => Ok(true),
        }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    fn navigate(&mut self, flow: Flow) -> Result<bool> {
        let Some(playlists) = self.reload()? else {
            return Ok(false);
        };
        let mut navigator =
            Navigator::new(&self.catalog, &self.config.playlist_dir, playlists, flow);
        let outcome = navigator
            .run(&mut self.console)
            .context("playlist navigation failed")?;
        Ok(outcome == Outcome::Quit)
    }

    fn list(&mut self) -> Result<()> {
        let Some(playlists) = self.reload()? else {
            return Ok(());
        };
        self.console.say_all(playlist_lines(&playlists, Levels::ALL))?;
        self.console.say_all(skipped_lines(&playlists))
    }

    fn search_playlists(&mut self, term: &str) -> Result<()> {
        if term.trim().is_empty() {
            return Ok(());
        }
        let Some(playlists) = self.reload()? else {
            return Ok(());
        };
        let lines: Vec<String> = search_playlists(&playlists, term)
            .iter()
            .map(playlist_hit_line)
            .collect();
        self.console.say_all(lines)
    }

    /// Load the playlist directory afresh. A directory that cannot be listed
    /// is reported and the command is abandoned; the loop keeps running.
    fn reload(&mut self) -> Result<Option<PlaylistSet>> {
        match load_playlists(&self.config.playlist_dir, &self.catalog) {
            Ok(playlists) => Ok(Some(playlists)),
            Err(err) => {
                let err = anyhow::Error::new(err);
                error!("{err:#}");
                self.console
                    .say(format!("cannot load playlists: {}", surface_error(&err)))?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_letters_and_arguments() {
        assert_eq!(Command::parse("e"), Some(Command::Edit));
        assert_eq!(Command::parse("R"), Some(Command::Rename));
        assert_eq!(Command::parse("l"), Some(Command::List));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(
            Command::parse("s  Artist X "),
            Some(Command::SearchCatalog("Artist X".into()))
        );
        assert_eq!(
            Command::parse("f 1000"),
            Some(Command::SearchPlaylists("1000".into()))
        );
        assert_eq!(Command::parse("s"), Some(Command::SearchCatalog(String::new())));
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("x"), None);
    }
}
