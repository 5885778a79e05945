pub mod git;
pub mod terminal;

pub use git::{CommandError, CommandGateway, GitRepo};
pub use terminal::{KeyCode, KeyEvent, KeyModifiers, Terminal, TerminalEvent};
