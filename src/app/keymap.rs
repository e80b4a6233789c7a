//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages keyboard shortcuts for the main screen. It supports:
//! - Loading custom keybindings from a config file (`keybinds.conf`)
//! - Providing sensible defaults if no config is present
//! - Resolving key presses (with modifiers) to semantic actions
//! - Exporting the current keymap back to a file for reference or customization

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action (e.g. both `j` and
/// Down move the cursor down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Focus the search box.
    StartSearch,
    /// Open an empty form to create a user.
    NewUser,
    /// Load the selected user into the form for editing.
    EditSelection,
    /// Ask to delete the selected user.
    DeleteSelection,
    /// Re-fetch the whole collection.
    Refresh,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Move the cursor up one row.
    MoveUp,
    /// Move the cursor down one row.
    MoveDown,
    /// Go to the previous page.
    PrevPage,
    /// Go to the next page.
    NextPage,
    /// Swallow the key.
    Ignore,
}

impl KeyAction {
    /// Every action, in the order the help dialog lists them.
    pub const ALL: [KeyAction; 12] = [
        KeyAction::Quit,
        KeyAction::StartSearch,
        KeyAction::NewUser,
        KeyAction::EditSelection,
        KeyAction::DeleteSelection,
        KeyAction::Refresh,
        KeyAction::OpenHelp,
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::PrevPage,
        KeyAction::NextPage,
        KeyAction::Ignore,
    ];

    /// Short human label for help output.
    pub fn describe(self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::StartSearch => "Search by name",
            KeyAction::NewUser => "Add user",
            KeyAction::EditSelection => "Edit selected user",
            KeyAction::DeleteSelection => "Delete selected user",
            KeyAction::Refresh => "Reload users",
            KeyAction::OpenHelp => "Help",
            KeyAction::MoveUp => "Move up",
            KeyAction::MoveDown => "Move down",
            KeyAction::PrevPage => "Previous page",
            KeyAction::NextPage => "Next page",
            KeyAction::Ignore => "Ignored",
        }
    }
}

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    ///
    /// Arrow keys and vim-style keys (hjkl) navigate; Left/Right and
    /// PageUp/PageDown change page.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        // Navigation
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        // Vim-like keys
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);

        Self { bindings }
    }

    /// Load a keymap from `path`, writing the defaults there if it doesn't exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(%path, error = %e, "could not write default keybindings");
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// Lines use `<Action> = <KeySpec>`; the legacy `<KeySpec> = <Action>`
    /// order is also accepted. Bindings are layered over the defaults.
    ///
    /// Returns `None` if the file cannot be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            tracing::warn!(%path, line, "ignoring unrecognized keybinding");
        }
        Some(map)
    }

    /// Write every current binding to `path`, sorted by action then key.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str(
            "# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Up, Down, Left, Right,\n",
        );
        buf.push_str("#   PageUp, PageDown, Delete, /, n, e, d, r, j, k, h, l\n");
        buf.push_str(
            "# Actions: Quit, StartSearch, NewUser, EditSelection, DeleteSelection, Refresh,\n",
        );
        buf.push_str("#   OpenHelp, MoveUp, MoveDown, PrevPage, NextPage, Ignore\n\n");

        let mut lines: Vec<(KeyAction, String)> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| (*action, Self::format_key(*mods, *code)))
            .collect();
        lines.sort();
        for (action, key) in lines {
            let _ = writeln!(&mut buf, "{} = {}", format_action(action), key);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action.
    ///
    /// Terminals disagree on whether shifted characters like `?` carry the
    /// SHIFT modifier, so a `Char` key with only SHIFT also matches an
    /// unmodified binding.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        if let Some(action) = self.bindings.get(&(key.modifiers, key.code)) {
            return Some(*action);
        }
        match key.code {
            KeyCode::Char(_) if key.modifiers == KeyModifiers::SHIFT => {
                self.bindings.get(&(KeyModifiers::NONE, key.code)).copied()
            }
            _ => None,
        }
    }

    /// Return a snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key (modifiers + code) into a spec like "Ctrl+q" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    KeyAction::ALL
        .into_iter()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::Refresh => "Refresh",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::Ignore => "Ignore",
    }
}
