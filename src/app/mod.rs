//! Application state types and entry glue.
//!
//! Defines the UI-owned state (`AppState`) wrapping the user list controller,
//! theme configuration, config file lookup, and the application loop
//! (re-exported as `run`).
//!
pub mod controller;
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::PathBuf;
use std::time::Instant;

use crate::api::{DEFAULT_API_URL, User};
use controller::{FormField, UserListController};
use keymap::Keymap;

/// Directory name used under the user's config home.
pub const APP_DIR: &str = "userlist-manager";

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),      // text
            muted: Color::Rgb(0x6c, 0x70, 0x86),     // overlay0
            title: Color::Rgb(0x89, 0xb4, 0xfa),     // blue
            border: Color::Rgb(0x58, 0x5b, 0x70),    // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44), // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe), // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4), // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors: best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);

        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the defaults there first if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(%path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Per-user config directory: `$XDG_CONFIG_HOME/userlist-manager` or
/// `$HOME/.config/userlist-manager`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

/// Resolve a config file path: an explicit path wins, then the config
/// directory (created on demand), then the working directory.
pub fn resolve_config_path(explicit: Option<&str>, file_name: &str) -> String {
    if let Some(p) = explicit {
        return p.to_string();
    }
    if let Some(dir) = config_dir()
        && std::fs::create_dir_all(&dir).is_ok()
    {
        return dir.join(file_name).to_string_lossy().into_owned();
    }
    file_name.to_string()
}

/// Modal dialogs layered over the main screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// `selected`: 0 = Yes, 1 = No.
    DeleteConfirm {
        id: u64,
        name: String,
        selected: usize,
    },
    Help {
        scroll: u16,
    },
}

pub struct AppState {
    pub started_at: Instant,
    pub controller: UserListController,
    /// Row index within the current page.
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub form_focus: FormField,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub status: Option<String>,
    pub api_url: String,
}

impl AppState {
    pub fn new(api_url: impl Into<String>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            controller: UserListController::new(),
            selected_row: 0,
            input_mode: InputMode::Normal,
            form_focus: FormField::Name,
            theme,
            keymap,
            modal: None,
            status: None,
            api_url: api_url.into(),
        }
    }

    /// The user under the cursor on the current page.
    pub fn selected_user(&self) -> Option<&User> {
        self.controller
            .derived_view()
            .rows
            .get(self.selected_row)
            .copied()
    }

    /// Keep the cursor on an existing row of the current page.
    pub fn clamp_selection(&mut self) {
        let rows = self.controller.derived_view().rows.len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Theme::mocha(), Keymap::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
