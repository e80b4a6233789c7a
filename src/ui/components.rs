//! Shared UI components (search box, status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};

/// Render the search input; highlighted while search mode is active.
pub fn render_search_box(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.input_mode == InputMode::Search;
    let query = app.controller.search();
    let text = if query.is_empty() && !active {
        Span::styled("Search by name (/)", Style::default().fg(app.theme.muted))
    } else {
        let cursor = if active { "_" } else { "" };
        Span::styled(format!("{query}{cursor}"), Style::default().fg(app.theme.text))
    };
    let border = if active { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

/// Render the bottom status bar with mode, counts and the last status message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form if app.controller.is_editing() => "EDIT",
        InputMode::Form => "ADD",
        InputMode::Modal => "MODAL",
    };
    let mut msg = format!(
        "mode: {mode}  users:{}  rows/page:{}",
        app.controller.users().len(),
        app.controller.page_size(),
    );
    if let Some(status) = &app.status {
        msg.push_str("  | ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let key_style = Style::default().add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Main screen",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for action in KeyAction::ALL {
        if action == KeyAction::Ignore {
            continue;
        }
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<22}", action.describe())),
            Span::styled(keys.join(", "), key_style),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Search box",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in [("Keep search", "Enter"), ("Clear search", "Esc")] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<22}")),
            Span::styled(keys, key_style),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Form",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in [
        ("Next field", "Tab, Down"),
        ("Previous field", "BackTab, Up"),
        ("Add / update", "Enter"),
        ("Cancel", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<22}")),
            Span::styled(keys, key_style),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / Enter", key_style),
    ]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
