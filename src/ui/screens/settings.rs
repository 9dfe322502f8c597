use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::mask;
use crate::ui::app::App;
use crate::ui::form::SettingsField;
use crate::ui::theme;
use crate::ui::util::centered_rect;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.settings_form;
    let popup = centered_rect(area, 64, 9);
    f.render_widget(Clear, popup);

    let field_line = |field: SettingsField, label: &str, value: String| {
        let focused = form.focused() == field;
        let style = if focused {
            theme::focused_field_style()
        } else {
            theme::dim_style()
        };
        let marker = if focused { "›" } else { " " };
        Line::from(vec![
            Span::styled(format!("{marker} {label:<10}"), style),
            Span::styled(value, theme::normal_style()),
        ])
    };

    let lines = vec![
        Line::from(""),
        field_line(SettingsField::Endpoint, "API URL", form.endpoint.clone()),
        field_line(SettingsField::Credential, "API Key", mask(&form.credential)),
        Line::from(""),
        Line::from(Span::styled(
            "Empty values fall back to the built-in defaults",
            theme::dim_style(),
        )),
        Line::from(Span::styled(
            "Tab switch field | Enter save | Esc cancel",
            theme::dim_style(),
        )),
    ];

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(" API Settings ", theme::focused_field_style()))
            .style(theme::modal_style()),
    );
    f.render_widget(body, popup);
}
