//! Crossterm implementation of the Terminal port.

use crate::ports::{KeyCode, KeyEvent, KeyModifiers, Terminal, TerminalEvent};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode as CtKeyCode, KeyEventKind, KeyModifiers as CtKeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal as RatatuiTerminal};
use std::io::{self, Stdout};
use std::time::Duration;

pub struct CrosstermTerminal {
    terminal: RatatuiTerminal<CrosstermBackend<Stdout>>,
}

impl CrosstermTerminal {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = RatatuiTerminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

impl Terminal for CrosstermTerminal {
    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    fn poll_event(&self, timeout: Duration) -> Result<Option<TerminalEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let event = match event::read()? {
            // Windows reports releases too; a confirm prompt must not see the key twice
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                convert_key_code(key.code).map(|code| {
                    TerminalEvent::Key(KeyEvent {
                        code,
                        modifiers: KeyModifiers {
                            ctrl: key.modifiers.contains(CtKeyModifiers::CONTROL),
                        },
                    })
                })
            }
            Event::Resize(w, h) => Some(TerminalEvent::Resize(w, h)),
            _ => None,
        };
        Ok(event)
    }
}

fn convert_key_code(code: CtKeyCode) -> Option<KeyCode> {
    match code {
        CtKeyCode::Char(c) => Some(KeyCode::Char(c)),
        CtKeyCode::Enter => Some(KeyCode::Enter),
        CtKeyCode::Esc => Some(KeyCode::Esc),
        CtKeyCode::Up => Some(KeyCode::Up),
        CtKeyCode::Down => Some(KeyCode::Down),
        CtKeyCode::Tab => Some(KeyCode::Tab),
        CtKeyCode::BackTab => Some(KeyCode::BackTab),
        CtKeyCode::Home => Some(KeyCode::Home),
        CtKeyCode::End => Some(KeyCode::End),
        _ => None,
    }
}
