//! Create/edit form with the three required fields.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::controller::FormField;
use crate::app::{AppState, InputMode};

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.input_mode == InputMode::Form;
    let title = match (app.controller.editing(), active) {
        (Some(u), _) => format!("Edit user #{}  Enter: update; Esc: cancel", u.id),
        (None, true) => "Add user  Enter: add; Esc: cancel".to_string(),
        (None, false) => "Add user (n)".to_string(),
    };

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = active && *field == app.form_focus;
            let marker = if focused { "▶ " } else { "  " };
            let value = app.controller.form.field(*field);
            let value_style = if focused {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<6} ", format!("{}:", field.label())),
                    Style::default().fg(app.theme.title),
                ),
                Span::styled(format!("{value}{cursor}"), value_style),
            ])
        })
        .collect();

    let border = if active { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}
