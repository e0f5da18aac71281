//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod form;
pub mod update;

use ratatui::style::Color;

use crate::model::Client;
use form::FormState;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
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
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = if let Some(h) = lower.strip_prefix('#') {
            h
        } else {
            lower.as_str()
        };
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

    /// Load from a config file if it exists, otherwise use the defaults.
    pub fn load(path: &str) -> Self {
        Self::from_file(path).unwrap_or_else(Self::mocha)
    }
}

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    Form(FormState),
    DeleteConfirm {
        id: i64,
        name: String,
        selected: usize,
    },
    Info {
        message: String,
    },
}

/// API work queued from key handlers, executed between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingAction {
    /// Re-fetch the list with the current search term.
    Refresh,
    /// Submit the open form's draft (create or update by draft id).
    Save,
    Delete { id: i64 },
}

pub struct AppState {
    pub clients: Vec<Client>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub modal: Option<ModalState>,
    pub pending: Option<PendingAction>,
    pub loading: bool,
}

impl AppState {
    /// Fresh state with the initial list fetch queued.
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme: Theme::load("theme.conf"),
            modal: None,
            pending: Some(PendingAction::Refresh),
            loading: true,
        }
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.clients.get(self.selected_index)
    }

    /// Queue API work; a refresh also raises the loading flag so the next
    /// frame shows the loading view.
    pub fn queue(&mut self, action: PendingAction) {
        if matches!(action, PendingAction::Refresh) {
            self.loading = true;
        }
        self.pending = Some(action);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
