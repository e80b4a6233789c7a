use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::info;

use crate::api::UserBackend;
use crate::app::controller::{FormField, SubmitOutcome};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::ui;

/// Whether the event loop should keep running after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    api: &dyn UserBackend,
) -> Result<()> {
    app.status = Some("Loading users...".to_string());
    terminal.draw(|f| ui::render(f, app))?;
    load_users(app, api);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, api, key) == Flow::Quit
        {
            break;
        }
    }

    info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

/// Apply one key press to the application state.
pub fn handle_key(app: &mut AppState, api: &dyn UserBackend, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, api, key),
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Form => handle_form_key(app, api, key.code),
        InputMode::Modal => handle_modal_key(app, api, key.code),
    }
    Flow::Continue
}

/// Fetch the whole collection and report the result in the status bar.
pub fn load_users(app: &mut AppState, api: &dyn UserBackend) {
    match app.controller.load_all(api) {
        Ok(count) => app.status = Some(format!("Loaded {count} users")),
        Err(e) => app.status = Some(format!("Loading users failed: {e}")),
    }
    app.clamp_selection();
}

fn handle_normal_key(app: &mut AppState, api: &dyn UserBackend, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NewUser => {
            if app.controller.is_editing() {
                app.controller.cancel_edit();
            }
            app.form_focus = FormField::Name;
            app.input_mode = InputMode::Form;
        }
        KeyAction::EditSelection => match app.selected_user().cloned() {
            Some(user) => {
                app.controller.begin_edit(&user);
                app.form_focus = FormField::Name;
                app.input_mode = InputMode::Form;
            }
            None => app.status = Some("No user selected".to_string()),
        },
        KeyAction::DeleteSelection => match app.selected_user().map(|u| (u.id, u.name.clone())) {
            Some((id, name)) => {
                app.modal = Some(ModalState::DeleteConfirm {
                    id,
                    name,
                    selected: 1,
                });
                app.input_mode = InputMode::Modal;
            }
            None => app.status = Some("No user selected".to_string()),
        },
        KeyAction::Refresh => load_users(app, api),
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::MoveUp => {
            app.selected_row = app.selected_row.saturating_sub(1);
        }
        KeyAction::MoveDown => {
            let rows = app.controller.derived_view().rows.len();
            if app.selected_row + 1 < rows {
                app.selected_row += 1;
            }
        }
        KeyAction::PrevPage => {
            app.controller.prev_page();
            app.selected_row = 0;
        }
        KeyAction::NextPage => {
            app.controller.next_page();
            app.selected_row = 0;
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.controller.set_search("");
            app.selected_row = 0;
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut query = app.controller.search().to_string();
            query.pop();
            app.controller.set_search(query);
            app.selected_row = 0;
        }
        KeyCode::Char(c) => {
            let mut query = app.controller.search().to_string();
            query.push(c);
            app.controller.set_search(query);
            app.selected_row = 0;
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, api: &dyn UserBackend, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => app.form_focus = app.form_focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.form_focus = app.form_focus.prev(),
        KeyCode::Enter => submit_form(app, api),
        KeyCode::Esc => {
            app.controller.cancel_edit();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.controller.form.field_mut(app.form_focus).pop();
        }
        KeyCode::Char(c) => app.controller.form.field_mut(app.form_focus).push(c),
        _ => {}
    }
}

fn submit_form(app: &mut AppState, api: &dyn UserBackend) {
    match app.controller.submit(api) {
        Ok(SubmitOutcome::Created(id)) => {
            app.status = Some(format!("Added user #{id}"));
            app.input_mode = InputMode::Normal;
        }
        Ok(SubmitOutcome::Updated(id)) => {
            app.status = Some(format!("Updated user #{id}"));
            app.input_mode = InputMode::Normal;
        }
        // Form stays open with its values so the user can retry.
        Err(e) => app.status = Some(format!("Not saved: {e}")),
    }
    app.clamp_selection();
}

fn handle_modal_key(app: &mut AppState, api: &dyn UserBackend, code: KeyCode) {
    let Some(modal) = app.modal.clone() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match modal {
        ModalState::DeleteConfirm { id, name, selected } => match code {
            KeyCode::Esc | KeyCode::Char('n') => close_modal(app),
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                app.modal = Some(ModalState::DeleteConfirm {
                    id,
                    name,
                    selected: 1 - selected.min(1),
                });
            }
            KeyCode::Char('y') => confirm_delete(app, api, id),
            KeyCode::Enter => {
                if selected == 0 {
                    confirm_delete(app, api, id);
                } else {
                    close_modal(app);
                }
            }
            _ => {}
        },
        ModalState::Help { scroll } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                close_modal(app)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_sub(1),
                });
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_add(1),
                });
            }
            _ => {}
        },
    }
}

fn confirm_delete(app: &mut AppState, api: &dyn UserBackend, id: u64) {
    close_modal(app);
    match app.controller.remove(api, id) {
        Ok(()) => app.status = Some(format!("Deleted user #{id}")),
        Err(e) => app.status = Some(format!("Delete failed: {e}")),
    }
    app.clamp_selection();
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
