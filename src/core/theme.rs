//! # Theme Preference
//!
//! The `Shell` owns the light/dark preference. It is read from the local
//! store once at startup and written back on every toggle. The TUI derives
//! its palette from [`Shell::is_dark`].

use std::fmt;
use std::sync::Arc;

use log::{info, warn};

use crate::core::storage::{PreferenceStore, THEME_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parses a stored value. Anything other than `"dark"`/`"light"` is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Shell {
    theme: Theme,
    store: Arc<dyn PreferenceStore>,
}

impl Shell {
    /// Reads the stored theme, defaulting to light when absent or unrecognized.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let theme = store
            .get(THEME_KEY)
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default();
        info!("Theme at startup: {}", theme);
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Flips the theme and persists it. A failed write keeps the new theme in memory.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.set(THEME_KEY, self.theme.as_str()) {
            warn!("Failed to persist theme preference: {}", e);
        }
        info!("Theme toggled to {}", self.theme);
        self.theme
    }
}
