use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;
use crate::navigation::DEFAULT_SWIPE_THRESHOLD;

/// A single parsed binding such as `ctrl+q` or `left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn parse(binding: &str) -> Option<Self> {
        let binding = binding.trim().to_lowercase();
        let mut modifiers = KeyModifiers::NONE;
        let mut code = None;

        for part in binding.split('+') {
            match part {
                "ctrl" => modifiers.insert(KeyModifiers::CONTROL),
                "alt" | "opt" => modifiers.insert(KeyModifiers::ALT),
                "shift" => modifiers.insert(KeyModifiers::SHIFT),
                "enter" => code = Some(KeyCode::Enter),
                "esc" => code = Some(KeyCode::Esc),
                "tab" => code = Some(KeyCode::Tab),
                "backtab" => code = Some(KeyCode::BackTab),
                "space" => code = Some(KeyCode::Char(' ')),
                "up" => code = Some(KeyCode::Up),
                "down" => code = Some(KeyCode::Down),
                "left" => code = Some(KeyCode::Left),
                "right" => code = Some(KeyCode::Right),
                "home" => code = Some(KeyCode::Home),
                "end" => code = Some(KeyCode::End),
                "pageup" => code = Some(KeyCode::PageUp),
                "pagedown" => code = Some(KeyCode::PageDown),
                single if single.chars().count() == 1 => {
                    code = single.chars().next().map(KeyCode::Char);
                }
                _ => return None,
            }
        }

        code.map(|code| Self { code, modifiers })
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        let code_matches = match (key.code, self.code) {
            (KeyCode::Char(pressed), KeyCode::Char(bound)) => {
                pressed.to_lowercase().next() == Some(bound)
            }
            (pressed, bound) => pressed == bound,
        };
        if !code_matches {
            return false;
        }

        // Shift only counts when the binding asks for it, so `?` works without `shift+?`.
        let mut pressed = key.modifiers;
        if !self.modifiers.contains(KeyModifiers::SHIFT) {
            pressed.remove(KeyModifiers::SHIFT);
        }
        pressed == self.modifiers
    }
}

pub fn key_match(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| KeyChord::parse(binding))
        .any(|chord| chord.matches(key))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "meghendra", "timetable")
}

pub fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("TIMETABLE_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".timetable")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TIMETABLE_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".timetable-config.toml")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub ui: UiConfig,
    pub navigation: NavigationConfig,
    pub keybindings: KeyBindings,
    pub theme: Theme,
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    /// File path or http(s) URL of the timetable JSON.
    pub location: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "timetable.json".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub rows_per_hour: u16,
    pub auto_scroll: bool,
    pub show_clock: bool,
    pub tick_millis: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            rows_per_hour: 12,
            auto_scroll: true,
            show_clock: true,
            tick_millis: 1000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NavigationConfig {
    pub swipe_threshold: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub next_day: Vec<String>,
    pub prev_day: Vec<String>,
    pub today: Vec<String>,
    pub reload: Vec<String>,
    pub scroll_up: Vec<String>,
    pub scroll_down: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "ctrl+q".to_string(), "ctrl+c".to_string()],
            help: vec!["?".to_string()],
            next_day: vec!["l".to_string(), "right".to_string(), "tab".to_string()],
            prev_day: vec!["h".to_string(), "left".to_string(), "backtab".to_string()],
            today: vec!["t".to_string(), "home".to_string()],
            reload: vec!["r".to_string()],
            scroll_up: vec!["k".to_string(), "up".to_string()],
            scroll_down: vec!["j".to_string(), "down".to_string()],
            page_up: vec!["ctrl+u".to_string(), "pageup".to_string()],
            page_down: vec!["ctrl+d".to_string(), "pagedown".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    pub border: String,
    pub tab_active: String,
    pub tab_inactive: String,
    pub lesson: String,
    pub free_period: String,
    pub break_period: String,
    pub short_gap: String,
    pub corner_tag: String,
    pub gutter: String,
    pub indicator: String,
    pub status: String,
    pub error: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: "Reset".to_string(),
            tab_active: "Cyan".to_string(),
            tab_inactive: "DarkGray".to_string(),
            lesson: "30,60,110".to_string(),
            free_period: "45,45,45".to_string(),
            break_period: "70,50,20".to_string(),
            short_gap: "20,20,20".to_string(),
            corner_tag: "Yellow".to_string(),
            gutter: "Blue".to_string(),
            indicator: "Red".to_string(),
            status: "Gray".to_string(),
            error: "LightRed".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `TIMETABLE_LOG` is unset.
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: default_data_dir().join("timetable.log"),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let path = config_path();
        let config = Self::load_from_path(&path);
        if !path.exists()
            && let Err(e) = config.save_to_path(&path)
        {
            eprintln!("{e}");
        }
        config
    }

    pub fn load_from_path(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Config::default();
        };
        match toml::from_str::<Config>(&content) {
            Ok(mut config) => {
                config.normalize();
                config
            }
            Err(e) => {
                eprintln!("Failed to parse config.toml ({path:?}), using defaults: {e}");
                Config::default()
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), AppError> {
        let save_error = |source| AppError::ConfigSave {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(save_error)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| save_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(path, content).map_err(save_error)
    }

    fn normalize(&mut self) {
        if self.ui.rows_per_hour == 0 {
            self.ui.rows_per_hour = UiConfig::default().rows_per_hour;
        }
        if self.ui.tick_millis == 0 {
            self.ui.tick_millis = UiConfig::default().tick_millis;
        }
        if !self.navigation.swipe_threshold.is_finite() || self.navigation.swipe_threshold < 0.0 {
            self.navigation.swipe_threshold = DEFAULT_SWIPE_THRESHOLD;
        }
        if self.logging.file.as_os_str().is_empty() {
            self.logging.file = LoggingConfig::default().file;
        } else if self.logging.file.is_relative() {
            self.logging.file = default_data_dir().join(&self.logging.file);
        }
    }
}
