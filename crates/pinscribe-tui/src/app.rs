use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent};
use pinscribe_core::{TranscriptState, UiCommand};
use ratatui::style::Color;

/// Palette selected by `display.theme`; unknown names fall back to light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Highlight color for the selected tab and list cursors.
    pub fn accent(&self) -> Color {
        match self {
            Theme::Light => Color::Yellow,
            Theme::Dark => Color::Cyan,
        }
    }

    /// Muted color for timestamps and idle placeholders.
    pub fn dim(&self) -> Color {
        match self {
            Theme::Light => Color::DarkGray,
            Theme::Dark => Color::Gray,
        }
    }
}

/// Selectable recognition locales: value sent to the engine + label shown
/// in the settings view. The composite entry asks for both languages.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("zh-CN", "中文 (Chinese)"),
    ("en-US", "English"),
    ("zh-CN,en-US", "Both"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transcript,
    Settings,
    Logs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    None,
    Quit,
    Command(UiCommand),
}

pub struct App {
    pub tab: Tab,
    pub theme: Theme,
    pub state: TranscriptState,
    pub selected_language: usize,
    pub max_entries: usize,
    pub should_quit: bool,
    pub logs: Arc<Mutex<VecDeque<String>>>,
    pub log_scroll: usize,
    pub log_auto_scroll: bool,
}

impl App {
    pub fn new(logs: Arc<Mutex<VecDeque<String>>>, max_entries: usize) -> Self {
        Self {
            tab: Tab::Transcript,
            theme: Theme::Light,
            state: TranscriptState::default(),
            selected_language: 0,
            max_entries,
            should_quit: false,
            logs,
            log_scroll: 0,
            log_auto_scroll: true,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn update_state(&mut self, new_state: TranscriptState) {
        self.state = new_state;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Global keys
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return AppAction::Quit;
            }
            KeyCode::Char('1') => {
                self.tab = Tab::Transcript;
                return AppAction::None;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Settings;
                return AppAction::None;
            }
            KeyCode::Char('3') => {
                self.tab = Tab::Logs;
                return AppAction::None;
            }
            KeyCode::Char('r') => {
                return AppAction::Command(UiCommand::ToggleRecording);
            }
            KeyCode::Char('c') => {
                return AppAction::Command(UiCommand::Reset);
            }
            _ => {}
        }

        match self.tab {
            Tab::Settings => self.handle_settings_key(key),
            Tab::Logs => self.handle_logs_key(key),
            Tab::Transcript => AppAction::None,
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                if self.selected_language > 0 {
                    self.selected_language -= 1;
                }
                AppAction::None
            }
            KeyCode::Down => {
                if self.selected_language + 1 < LANGUAGES.len() {
                    self.selected_language += 1;
                }
                AppAction::None
            }
            KeyCode::Enter => {
                let (locale, _) = LANGUAGES[self.selected_language];
                if locale == self.state.language {
                    AppAction::None
                } else {
                    AppAction::Command(UiCommand::SwitchLanguage(locale.to_string()))
                }
            }
            _ => AppAction::None,
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                self.log_scroll = self.log_scroll.saturating_add(1);
                self.log_auto_scroll = false;
                AppAction::None
            }
            KeyCode::Down => {
                self.log_scroll = self.log_scroll.saturating_sub(1);
                AppAction::None
            }
            KeyCode::Char('G') => {
                self.log_scroll = 0;
                self.log_auto_scroll = true;
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}
