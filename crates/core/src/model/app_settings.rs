use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display theme, the one preference that survives restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
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

impl FromStr for Theme {
    type Err = AppSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(AppSettingsError::InvalidTheme(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppSettings {
    theme: Theme,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub theme: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid theme: {0}")]
    InvalidTheme(String),
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// A missing or blank theme falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError::InvalidTheme` for an unknown theme name.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let theme = match normalize_optional(self.theme) {
            Some(raw) => raw.parse()?,
            None => Theme::default(),
        };
        Ok(AppSettings { theme })
    }
}

impl AppSettings {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Rebuild settings from a persisted draft.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the stored values fail validation.
    pub fn from_persisted(draft: AppSettingsDraft) -> Result<Self, AppSettingsError> {
        draft.validate()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
