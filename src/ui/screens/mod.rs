pub(crate) mod dashboard;
pub(crate) mod entry_form;
pub(crate) mod settings;
pub(crate) mod transactions;

use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ledger::LoadState;
use crate::ui::theme;

/// Single-message body for a view that has no rows to show, or `None` when
/// rows should be rendered.
pub(crate) fn load_placeholder(load: &LoadState, is_empty: bool) -> Option<Vec<Line<'static>>> {
    match load {
        LoadState::Loading => Some(vec![
            Line::from(""),
            Line::from(Span::styled("Loading entries…", theme::dim_style())),
        ]),
        LoadState::Failed(reason) => Some(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Failed to load transactions. Check API connection.",
                theme::error_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(reason.clone(), theme::dim_style())),
            Line::from(Span::styled(
                "Press r to retry or s to edit API settings",
                theme::dim_style(),
            )),
        ]),
        LoadState::Loaded if is_empty => Some(vec![
            Line::from(""),
            Line::from(Span::styled("No entries yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add your first entry",
                theme::dim_style(),
            )),
        ]),
        LoadState::Loaded => None,
    }
}

pub(crate) fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

pub(crate) fn placeholder(lines: Vec<Line<'static>>, title: String) -> Paragraph<'static> {
    Paragraph::new(lines).centered().block(titled_block(title))
}
