use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{load_placeholder, placeholder, titled_block};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_signed, truncate};

const RECENT_ENTRIES: usize = 5;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(8),    // Spending chart
            Constraint::Length(RECENT_ENTRIES as u16 + 2),
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_spending_chart(f, chunks[1], app);
    render_recent(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let summary = &app.view.summary;

    render_card(
        f,
        cards[0],
        "Balance",
        format_amount(summary.balance),
        if summary.balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        format!("{} entries", app.view.entries.len()),
    );
    render_card(
        f,
        cards[1],
        "Income",
        format_amount(summary.income),
        theme::GREEN,
        format!("{} entries", summary.income_count),
    );
    render_card(
        f,
        cards[2],
        "Expense",
        format_amount(summary.expense),
        theme::RED,
        format!("{} entries", summary.expense_count),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    display: String,
    color: ratatui::style::Color,
    subtitle: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_spending_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = " Spending by Category ".to_string();
    let categories = &app.view.summary.expense_by_category;

    if let Some(lines) = load_placeholder(&app.view.load, categories.is_empty()) {
        f.render_widget(placeholder(lines, title), area);
        return;
    }

    let bars: Vec<Bar> = categories
        .iter()
        .take(12)
        .map(|(name, amt)| {
            let val = amt.to_u64().unwrap_or(0);
            Bar::default()
                .value(val)
                .label(Line::from(truncate(name, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let title = " Recent Entries ".to_string();
    let rows = &app.view.summary.rows;

    if !matches!(app.view.load, crate::ledger::LoadState::Loaded) || rows.is_empty() {
        let line = Line::from(Span::styled("Nothing to show", theme::dim_style()));
        f.render_widget(placeholder(vec![line], title), area);
        return;
    }

    let lines: Vec<Line> = rows
        .iter()
        .take(RECENT_ENTRIES)
        .map(|row| {
            let style = if row.is_income {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            Line::from(vec![
                Span::styled(format!(" {}  ", row.date), theme::dim_style()),
                Span::styled(format!("{:<30}", truncate(&row.name, 30)), theme::normal_style()),
                Span::styled(format_signed(row.display_amount, row.is_income), style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(titled_block(title)), area);
}
