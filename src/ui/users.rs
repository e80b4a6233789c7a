use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::app::{AppState, ModalState};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let view = app.controller.derived_view();

    let rows = view.rows.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_row {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone.clone()),
            Cell::from("[e]dit [d]elete"),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Length(16),
    ];

    let header = Row::new(vec!["ID", "Name", "Email", "Phone", "Actions"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let title = if app.controller.search().is_empty() {
        format!("Users ({})", app.controller.users().len())
    } else {
        format!(
            "Users ({} of {} match)",
            view.filtered_count,
            app.controller.users().len()
        )
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, area);

    if let Some(marker) = view.marker() {
        // Below the border and the header row.
        let rect = Rect {
            x: area.x + 1,
            y: area.y + 2,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(3).min(1),
        };
        let p = Paragraph::new(marker)
            .alignment(ratatui::layout::Alignment::Center)
            .style(Style::default().fg(app.theme.muted));
        f.render_widget(p, rect);
    }
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => format!(
            "ID: {}\nName: {}\nUsername: {}\nEmail: {}\nPhone: {}\nWebsite: {}\nCompany: {}",
            u.id,
            u.name,
            u.extra_str("username").unwrap_or("-"),
            u.email,
            u.phone,
            u.extra_str("website").unwrap_or("-"),
            u.company_name().unwrap_or("-"),
        ),
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// `Prev  page / total  Next`, with unavailable directions dimmed.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let view = app.controller.derived_view();
    let enabled = Style::default()
        .fg(app.theme.title)
        .add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(app.theme.muted);
    let line = Line::from(vec![
        Span::styled("◀ Prev", if view.has_prev() { enabled } else { disabled }),
        Span::styled(
            format!("   {} / {}   ", view.page, view.total_pages),
            Style::default().fg(app.theme.text),
        ),
        Span::styled("Next ▶", if view.has_next() { enabled } else { disabled }),
    ]);
    let p = Paragraph::new(line).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(p, area);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm { id, name, selected } = state {
        let rect = crate::ui::components::centered_rect(50, 7, area);
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!("Delete user '{name}' (id {id})?\n\n  {yes}    {no}");
        let p = Paragraph::new(body).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
