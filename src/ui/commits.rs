//! Pure render functions for the commits view.

use super::styles;
use crate::domain::Commit;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Padding, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Render the commits list view.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    commits: &[Commit],
    selected: usize,
    branch: &str,
    focused: bool,
    table_state: &mut TableState,
) {
    let title = format!(" Commits: {} ({} shown) ", branch, commits.len());

    let header = Row::new(vec![
        Cell::from("Hash").style(styles::style_muted()),
        Cell::from("Message").style(styles::style_muted()),
        Cell::from("Author").style(styles::style_muted()),
        Cell::from("Time").style(styles::style_muted()),
    ])
    .height(1);

    let rows: Vec<Row> = commits
        .iter()
        .map(|commit| {
            let (hash_style, text_style) = if commit.is_merged() {
                (styles::style_merged_hash(), styles::style_muted())
            } else {
                (styles::style_hash(), styles::style_default())
            };

            Row::new(vec![
                Cell::from(Span::styled(commit.short_hash.as_str(), hash_style)),
                Cell::from(Span::styled(truncate(commit.summary(), 60), text_style)),
                Cell::from(Span::styled(truncate(&commit.author, 16), text_style)),
                Cell::from(Span::styled(commit.relative_time(), styles::style_muted())),
            ])
        })
        .collect();

    if commits.is_empty() {
        table_state.select(None);
    } else {
        table_state.select(Some(selected));
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(30),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(styles::style_border(focused))
            .padding(Padding::horizontal(1)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(table, area, table_state);
}

/// Render the key hint bar at the bottom.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(key, styles::style_key()),
            Span::raw(label),
        ]
    };

    let help = Line::from(
        [
            hint("[Tab]", " Switch view  "),
            hint("[f]", " Find fixup base  "),
            hint("[b]", " Merge base  "),
            hint("[r]", " Refresh  "),
            hint("[q]", " Quit  "),
            hint("[?]", " Help"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>(),
    );

    frame.render_widget(help, area);
}

/// Cut `s` to at most `max_width` columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for (i, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) {
            let rest_width: usize = s[i..].chars().map(|c| c.width().unwrap_or(0)).sum();
            if width + rest_width <= max_width {
                out.push_str(&s[i..]);
            } else {
                out.push('…');
            }
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate("fix bug", 10), "fix bug");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }

    #[test]
    fn wide_characters_do_not_split() {
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
    }
}
