//! Line-oriented terminal front-end: the command loop, the navigator state
//! machine, and the formatting of everything they print.

mod app;
mod helpers;
mod navigator;
mod render;
mod terminal;

pub use app::{App, Command};
pub use navigator::{Flow, FolderRef, Navigator, Outcome, State, Transition};
pub use render::{difficulty_color, level_label, Levels};
pub use terminal::Console;
