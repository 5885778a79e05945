//! Pure render function for message and confirmation popups.

use super::help::centered_rect;
use super::styles;
use crate::app::Dialog;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    let popup_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup_area);

    let (title, body, footer, title_style) = match dialog {
        Dialog::Message {
            title,
            body,
            is_error,
        } => (
            title.as_str(),
            body.as_str(),
            "Press any key to close",
            if *is_error {
                styles::style_error_title()
            } else {
                styles::style_title()
            },
        ),
        Dialog::Confirm { title, prompt, .. } => (
            title.as_str(),
            prompt.as_str(),
            "[y/Enter] Continue  [n/Esc] Cancel",
            styles::style_title(),
        ),
    };

    let mut lines: Vec<Line> = body.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(footer, styles::style_muted())));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", title), title_style))
                .borders(Borders::ALL)
                .padding(Padding::uniform(1))
                .style(styles::style_popup()),
        );

    frame.render_widget(paragraph, popup_area);
}
