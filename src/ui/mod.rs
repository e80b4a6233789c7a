pub mod components;
pub mod form;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(7),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(root[3]);

    let p = Paragraph::new(format!(
        "{}  /: search; n: add; e: edit; d: delete; r: reload; ?: help; q: quit",
        app.api_url
    ))
    .block(
        Block::default()
            .title("userlist-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    components::render_search_box(f, root[1], app);
    form::render_form(f, root[2], app);
    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    users::render_pagination(f, root[4], app);
    components::render_status_bar(f, root[5], app);

    if app.input_mode == InputMode::Modal
        && let Some(state) = &app.modal
    {
        let area = f.area();
        match state {
            ModalState::DeleteConfirm { .. } => users::render_delete_confirm(f, area, app, state),
            ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
        }
    }
}
