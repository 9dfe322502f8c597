use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::app::{App, ENTRY_FORM_HEIGHT, ENTRY_FORM_WIDTH};
use crate::ui::form::EntryField;
use crate::ui::theme;
use crate::ui::util::centered_rect;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let popup = centered_rect(area, ENTRY_FORM_WIDTH, ENTRY_FORM_HEIGHT);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in EntryField::all().iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            theme::focused_field_style()
        } else {
            theme::dim_style()
        };
        let marker = if focused { "›" } else { " " };

        let value = match field {
            EntryField::Kind => {
                let style = if form.kind == crate::models::EntryKind::Income {
                    theme::income_style()
                } else {
                    theme::expense_style()
                };
                Span::styled(format!("< {} >", form.kind), style)
            }
            _ => Span::styled(form.value(*field), theme::normal_style()),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {:<12}", field.label()), label_style),
            value,
        ]));
    }

    lines.push(Line::from(""));
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(err.clone(), theme::error_style()))),
        None => lines.push(Line::from(Span::styled(
            "Tab next field | Space toggles type | Enter save | Esc cancel",
            theme::dim_style(),
        ))),
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(form.title(), theme::focused_field_style()))
            .style(theme::modal_style()),
    );
    f.render_widget(body, popup);

    // Cursor after the focused text value.
    let field = form.focused();
    if field != EntryField::Kind {
        let x = popup.x + 1 + 14 + form.value(field).chars().count() as u16;
        let y = popup.y + 1 + form.focus as u16;
        if x < popup.x + popup.width.saturating_sub(1) && y < popup.y + popup.height {
            f.set_cursor_position((x, y));
        }
    }
}
