// Integration tests for userlist-manager

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use common::{FakeBackend, sample_users};
use userlist_manager::app::update::{Flow, handle_key, load_users};
use userlist_manager::app::{AppState, InputMode, ModalState};

fn press(app: &mut AppState, api: &FakeBackend, code: KeyCode) -> Flow {
    handle_key(app, api, KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut AppState, api: &FakeBackend, text: &str) {
    for c in text.chars() {
        press(app, api, KeyCode::Char(c));
    }
}

fn loaded_app(api: &FakeBackend) -> AppState {
    let mut app = AppState::default();
    load_users(&mut app, api);
    app
}

fn tmp_path(tag: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("ulm_{tag}_{}_{}.conf", std::process::id(), nonce));
    path.to_string_lossy().to_string()
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf};
    use userlist_manager::app::Theme;

    let path = tmp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.muted), format!("{:?}", t2.muted));
    assert_eq!(format!("{:?}", t.header_bg), format!("{:?}", t2.header_bg));

    // Unknown keys and bad colors are ignored
    fs::write(&path, "title = #102030\nbogus = #FFFFFF\nborder = nope\n").unwrap();
    let t3 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t3.title), "Rgb(16, 32, 48)");
    assert_eq!(format!("{:?}", t3.border), format!("{:?}", Theme::mocha().border));

    let init = tmp_path("theme_init");
    let _ = fs::remove_file(&init);
    let _created = Theme::load_or_init(&init);
    assert!(PathBuf::from(&init).exists());

    let _ = fs::remove_file(&path);
    let _ = fs::remove_file(&init);
}

// 2) Keymap file roundtrip and overrides
#[test]
fn keymap_roundtrip_and_override() {
    use std::fs;
    use userlist_manager::app::keymap::{KeyAction, Keymap};

    let path = tmp_path("keys");
    let km = Keymap::default();
    km.write_file(&path).expect("write keymap");
    let loaded = Keymap::from_file(&path).expect("read keymap");
    let mut a = km.all_bindings();
    let mut b = loaded.all_bindings();
    a.sort_by_key(|(k, act)| (format!("{k:?}"), *act));
    b.sort_by_key(|(k, act)| (format!("{k:?}"), *act));
    assert_eq!(a, b);

    fs::write(&path, "# custom\nRefresh = Ctrl+r\nx = Quit\nGarbage line\n").unwrap();
    let custom = Keymap::from_file(&path).expect("read keymap");
    let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert_eq!(custom.resolve(&ctrl_r), Some(KeyAction::Refresh));
    let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    assert_eq!(custom.resolve(&x), Some(KeyAction::Quit));

    let _ = fs::remove_file(&path);
}

// 3) Explicit config paths win over the config directory
#[test]
fn explicit_config_path_is_used_verbatim() {
    use userlist_manager::app::resolve_config_path;
    assert_eq!(resolve_config_path(Some("/tmp/my-theme.conf"), "theme.conf"), "/tmp/my-theme.conf");
}

// 4) Live search narrows the table and resets paging
#[test]
fn typing_in_search_filters_and_resets_page() {
    let api = FakeBackend::new(sample_users(10));
    let mut app = loaded_app(&api);
    assert_eq!(app.status.as_deref(), Some("Loaded 10 users"));

    press(&mut app, &api, KeyCode::Right);
    assert_eq!(app.controller.page(), 2);

    press(&mut app, &api, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Search);
    type_text(&mut app, &api, "clem");
    assert_eq!(app.controller.search(), "clem");
    assert_eq!(app.controller.page(), 1);
    let names: Vec<String> = app
        .controller
        .derived_view()
        .rows
        .iter()
        .map(|u| u.name.clone())
        .collect();
    assert_eq!(names, vec!["Clementine Bauch", "Clementina DuBuque"]);

    press(&mut app, &api, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.controller.search(), "clem");

    press(&mut app, &api, KeyCode::Char('/'));
    press(&mut app, &api, KeyCode::Esc);
    assert_eq!(app.controller.search(), "");
    assert_eq!(app.controller.derived_view().filtered_count, 10);
}

// 5) Add a user through the form
#[test]
fn add_user_through_form() {
    let api = FakeBackend::new(sample_users(7));
    let mut app = loaded_app(&api);

    press(&mut app, &api, KeyCode::Char('n'));
    assert_eq!(app.input_mode, InputMode::Form);
    type_text(&mut app, &api, "Ada Lovelace");
    press(&mut app, &api, KeyCode::Tab);
    type_text(&mut app, &api, "ada@example.org");
    press(&mut app, &api, KeyCode::Tab);
    type_text(&mut app, &api, "555-0199");
    press(&mut app, &api, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status.as_deref(), Some("Added user #11"));
    assert_eq!(app.controller.users().len(), 8);
    assert!(app.controller.form.is_empty());
    assert_eq!(api.calls(), vec!["GET /users", "POST /users"]);
}

// 6) Incomplete form stays open and sends nothing
#[test]
fn incomplete_form_is_rejected() {
    let api = FakeBackend::new(sample_users(3));
    let mut app = loaded_app(&api);

    press(&mut app, &api, KeyCode::Char('n'));
    type_text(&mut app, &api, "Ada");
    press(&mut app, &api, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.status.as_deref(), Some("Not saved: Email is required"));
    assert_eq!(app.controller.form.name, "Ada");
    assert_eq!(api.calls(), vec!["GET /users"]);
}

// 7) Edit the selected user, and cancel an edit
#[test]
fn edit_selected_user_and_cancel() {
    let api = FakeBackend::new(sample_users(5));
    let mut app = loaded_app(&api);

    press(&mut app, &api, KeyCode::Down);
    press(&mut app, &api, KeyCode::Down);
    press(&mut app, &api, KeyCode::Char('e'));
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.controller.editing().map(|u| u.id), Some(3));
    assert_eq!(app.controller.form.name, "Clementine Bauch");

    press(&mut app, &api, KeyCode::Esc);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(!app.controller.is_editing());
    assert!(app.controller.form.is_empty());

    press(&mut app, &api, KeyCode::Enter);
    for _ in 0.."Clementine Bauch".len() {
        press(&mut app, &api, KeyCode::Backspace);
    }
    type_text(&mut app, &api, "X");
    press(&mut app, &api, KeyCode::Enter);

    assert_eq!(app.status.as_deref(), Some("Updated user #3"));
    assert_eq!(app.controller.users()[2].name, "X");
    assert_eq!(app.controller.users()[1].name, "Ervin Howell");
    assert!(!app.controller.is_editing());
}

// 8) Delete asks for confirmation, defaulting to No
#[test]
fn delete_requires_confirmation() {
    let api = FakeBackend::new(sample_users(3));
    let mut app = loaded_app(&api);

    press(&mut app, &api, KeyCode::Char('d'));
    assert_eq!(app.input_mode, InputMode::Modal);
    assert!(matches!(
        app.modal,
        Some(ModalState::DeleteConfirm { id: 1, selected: 1, .. })
    ));
    press(&mut app, &api, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.controller.users().len(), 3);

    press(&mut app, &api, KeyCode::Char('d'));
    press(&mut app, &api, KeyCode::Left);
    press(&mut app, &api, KeyCode::Enter);
    assert_eq!(app.status.as_deref(), Some("Deleted user #1"));
    assert_eq!(app.controller.users().len(), 2);
    assert_eq!(api.calls(), vec!["GET /users", "DELETE /users/1"]);
}

// 9) Failing service: state is untouched and the status bar says so
#[test]
fn failing_service_leaves_state_untouched() {
    let api = FakeBackend::new(sample_users(4));
    let mut app = loaded_app(&api);
    api.fail.set(true);

    press(&mut app, &api, KeyCode::Char('r'));
    assert_eq!(app.controller.users().len(), 4);
    assert!(app.status.as_deref().unwrap().starts_with("Loading users failed"));

    press(&mut app, &api, KeyCode::Char('d'));
    press(&mut app, &api, KeyCode::Char('y'));
    assert_eq!(app.controller.users().len(), 4);
    assert!(app.status.as_deref().unwrap().starts_with("Delete failed"));
}

// 10) Paging keys, help modal and quit
#[test]
fn paging_help_and_quit() {
    let api = FakeBackend::new(sample_users(7));
    let mut app = loaded_app(&api);

    press(&mut app, &api, KeyCode::Down);
    press(&mut app, &api, KeyCode::PageDown);
    assert_eq!(app.controller.page(), 2);
    assert_eq!(app.selected_row, 0);
    assert_eq!(app.selected_user().map(|u| u.id), Some(6));
    press(&mut app, &api, KeyCode::Char('l'));
    assert_eq!(app.controller.page(), 2);
    press(&mut app, &api, KeyCode::Char('h'));
    assert_eq!(app.controller.page(), 1);

    press(&mut app, &api, KeyCode::Char('?'));
    assert_eq!(app.modal, Some(ModalState::Help { scroll: 0 }));
    press(&mut app, &api, KeyCode::Down);
    assert_eq!(app.modal, Some(ModalState::Help { scroll: 1 }));
    press(&mut app, &api, KeyCode::Esc);
    assert_eq!(app.modal, None);

    assert_eq!(press(&mut app, &api, KeyCode::Char('q')), Flow::Quit);
}
