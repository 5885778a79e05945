//! Color scheme.
//! Uses basic terminal colors for maximum compatibility.

use ratatui::style::{Color, Modifier, Style};

pub const BG_SELECTED: Color = Color::DarkGray;
pub const BG_POPUP: Color = Color::Black;

pub const FG_DEFAULT: Color = Color::White;
pub const FG_MUTED: Color = Color::Gray;
pub const FG_HASH: Color = Color::Yellow;
pub const FG_KEY: Color = Color::Yellow;
pub const FG_STAGED: Color = Color::Green;
pub const FG_UNSTAGED: Color = Color::Red;
pub const FG_TITLE: Color = Color::Cyan;
pub const FG_ERROR: Color = Color::Red;
pub const FG_FOCUSED_BORDER: Color = Color::Green;

pub fn style_default() -> Style {
    Style::default().fg(FG_DEFAULT)
}

pub fn style_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

pub fn style_hash() -> Style {
    Style::default().fg(FG_HASH)
}

pub fn style_merged_hash() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::DIM)
}

pub fn style_key() -> Style {
    Style::default().fg(FG_KEY)
}

pub fn style_staged() -> Style {
    Style::default().fg(FG_STAGED)
}

pub fn style_unstaged() -> Style {
    Style::default().fg(FG_UNSTAGED)
}

pub fn style_title() -> Style {
    Style::default().fg(FG_TITLE).add_modifier(Modifier::BOLD)
}

pub fn style_error_title() -> Style {
    Style::default().fg(FG_ERROR).add_modifier(Modifier::BOLD)
}

pub fn style_selected() -> Style {
    Style::default().bg(BG_SELECTED)
}

pub fn style_popup() -> Style {
    Style::default().bg(BG_POPUP)
}

pub fn style_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(FG_FOCUSED_BORDER)
    } else {
        Style::default()
    }
}
