//! Pure render function for the working tree files view.

use super::styles;
use crate::domain::FileChange;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    files: &[FileChange],
    selected: usize,
    focused: bool,
    list_state: &mut ListState,
) {
    let staged = files.iter().filter(|f| f.status.has_staged()).count();
    let title = format!(" Files ({} changed, {} staged) ", files.len(), staged);

    let items: Vec<ListItem> = if files.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "Working tree clean",
            styles::style_muted(),
        )))]
    } else {
        files
            .iter()
            .map(|file| {
                let status_style = if file.status.has_staged() {
                    styles::style_staged()
                } else {
                    styles::style_unstaged()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(file.status.to_string(), status_style),
                    Span::raw(" "),
                    Span::styled(file.path.as_str(), styles::style_default()),
                ]))
            })
            .collect()
    };

    if files.is_empty() {
        list_state.select(None);
    } else {
        list_state.select(Some(selected));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(styles::style_border(focused))
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(styles::style_selected());

    frame.render_stateful_widget(list, area, list_state);
}
