//! Terminal port (trait).
//! Keeps the app loop independent of crossterm.

use anyhow::Result;
use ratatui::Frame;
use std::time::Duration;

/// Events the app reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Up,
    Down,
    Tab,
    BackTab,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
}

/// Port for terminal operations.
pub trait Terminal {
    /// Draw a frame to the terminal.
    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame);

    /// Poll for an event with timeout.
    /// Returns None if no event within timeout.
    fn poll_event(&self, timeout: Duration) -> Result<Option<TerminalEvent>>;
}
