use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Row, Table},
    Frame,
};

use super::{load_placeholder, placeholder, titled_block};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let rows = &app.view.summary.rows;

    if let Some(lines) = load_placeholder(&app.view.load, rows.is_empty()) {
        f.render_widget(placeholder(lines, " Transactions (0) ".into()), area);
        return;
    }

    let header_cells = ["Date", "Name", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    // Two lines per row: name and description.
    let page = (area.height.saturating_sub(3) / 2).max(1) as usize;

    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(app.entry_scroll)
        .take(page)
        .map(|(i, row)| {
            let amount_style = if row.is_income {
                theme::income_style()
            } else {
                theme::expense_style()
            };

            let style = if i == app.entry_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let category = if row.category.is_empty() {
                "—".to_string()
            } else {
                truncate(&row.category, 18)
            };

            let name_cell = Cell::from(vec![
                Line::from(truncate(&row.name, 40)),
                Line::from(Span::styled(
                    truncate(&row.description, 40),
                    theme::dim_style(),
                )),
            ]);

            Row::new(vec![
                Cell::from(format!("  {}", row.date)),
                name_cell,
                Cell::from(category),
                Cell::from(Span::styled(
                    format_signed(row.display_amount, row.is_income),
                    amount_style,
                )),
            ])
            .height(2)
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(16),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(titled_block(format!(" Transactions ({}) ", rows.len())));

    f.render_widget(table, area);
}
