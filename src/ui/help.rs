//! Pure render function for the help view.

use super::styles;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j / ↓", "Move down"),
            ("k / ↑", "Move up"),
            ("g", "Go to top"),
            ("G", "Go to bottom"),
            ("Tab", "Switch between files and commits"),
        ],
    ),
    (
        "Actions",
        &[
            ("f", "Find the base commit for a fixup of the current changes"),
            ("b", "Show the merge base of HEAD with the main branches"),
            ("r", "Refresh files and commits"),
        ],
    ),
    (
        "General",
        &[("?", "Toggle this help"), ("q", "Quit")],
    ),
];

/// Render the help overlay.
pub fn render(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled("Keyboard Shortcuts", styles::style_title())),
        Line::from(""),
    ];
    for (section, bindings) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *section,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, description) in *bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<9}", key), styles::style_key()),
                Span::raw(*description),
            ]));
        }
        help_text.push(Line::from(""));
    }
    help_text.push(Line::from(Span::styled(
        "Press any key to close",
        styles::style_muted(),
    )));

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .padding(Padding::uniform(1))
                .style(styles::style_popup()),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help, popup_area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
